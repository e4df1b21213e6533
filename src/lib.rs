//! # pdf-mosaic
//!
//! Render every page of a PDF and tile the pages into one grid image.
//!
//! Handy for rulebooks, slide decks and zines: one picture that shows the
//! whole document at a glance. Each page is rasterised by pdfium at a chosen
//! pixel width (height follows the page's aspect ratio), then the pages are
//! pasted row by row onto a single canvas and saved as PNG or JPEG.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path, permissions and %PDF magic
//!  ├─ 2. Params   columns + page width (flags, code, or interactive prompt)
//!  ├─ 3. Render   rasterise selected pages via pdfium at exact width
//!  ├─ 4. Layout   rows = ⌈pages / columns⌉, per-page offsets, canvas size
//!  ├─ 5. Compose  paste pages onto a background-filled RGB canvas
//!  └─ 6. Encode   PNG / JPEG by extension, atomic write
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_mosaic::{create_mosaic_to_file, FixedParameters, MosaicConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MosaicConfig::default();
//!     // 4 columns, each page 300 px wide, written to rulebook.png
//!     let summary = create_mosaic_to_file(
//!         "rulebook.pdf",
//!         None,
//!         FixedParameters::new(4, 300),
//!         &config,
//!     )?;
//!     eprintln!(
//!         "{} pages → {}x{} px",
//!         summary.stats.rendered_pages,
//!         summary.stats.canvas_width,
//!         summary.stats.canvas_height
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-mosaic` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-mosaic = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! pdfium is loaded at runtime. [`MosaicConfig::pdfium_library`] points at
//! a specific copy; otherwise the platform library is looked up in the
//! working directory and then on the system library path.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Alignment, BackgroundColor, MosaicConfig, MosaicConfigBuilder, PageSelection};
pub use convert::{build_mosaic, create_mosaic, create_mosaic_to_file, default_output_path, inspect};
pub use error::{ErrorKind, MosaicError};
pub use output::{DocumentInfo, MosaicOutput, MosaicStats, MosaicSummary, PageDimensions};
pub use params::{
    FallbackParameters, FixedParameters, GridParameters, InteractivePrompt, ParameterSource,
};
pub use pipeline::compose::MosaicImage;
pub use pipeline::encode::OutputFormat;
pub use pipeline::layout::{LayoutPlan, Placement};
pub use pipeline::render::{PageBitmap, PageRasterizer, PdfDocumentSource};
pub use progress::{MosaicProgressCallback, NoopProgressCallback, ProgressCallback};
