//! Pipeline stages for PDF-to-mosaic conversion.
//!
//! Each submodule implements exactly one transformation step, so each can
//! be tested on its own and layout/compositing never need a pdfium library.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ layout ──▶ compose ──▶ encode
//! (path)    (pdfium)   (grid)     (canvas)    (png/jpeg)
//! ```
//!
//! 1. [`input`]   — check the path exists, is readable, and starts with `%PDF`
//! 2. [`render`]  — bind pdfium, open the document, rasterise pages at an
//!    exact pixel width
//! 3. [`layout`]  — compute rows, per-page offsets and canvas size
//! 4. [`compose`] — paste every page onto a background-filled canvas
//! 5. [`encode`]  — choose the format from the extension and write atomically

pub mod compose;
pub mod encode;
pub mod input;
pub mod layout;
pub mod render;
