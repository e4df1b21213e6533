//! Progress-callback trait for mosaic rendering events.
//!
//! Inject an [`Arc<dyn MosaicProgressCallback>`] via
//! [`crate::config::MosaicConfigBuilder::progress_callback`] to be told when
//! the document is opened, as each page is rasterised, and when the canvas
//! has been composed. The library never prints anything itself; the CLI
//! turns these events into a terminal progress bar.
//!
//! # Example
//!
//! ```rust
//! use pdf_mosaic::{MosaicConfig, MosaicProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     rendered: AtomicUsize,
//! }
//!
//! impl MosaicProgressCallback for CountingCallback {
//!     fn on_page_rendered(&self, page_num: usize, total: usize, width: u32, height: u32) {
//!         self.rendered.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page_num}/{total}: {width}x{height}");
//!     }
//! }
//!
//! let cb = Arc::new(CountingCallback { rendered: AtomicUsize::new(0) });
//! let config = MosaicConfig::builder()
//!     .progress_callback(cb as Arc<dyn MosaicProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the pipeline as it moves through a run.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive on the thread that drives the run.
pub trait MosaicProgressCallback: Send + Sync {
    /// Called once the PDF is open, before grid parameters are collected.
    fn on_document_opened(&self, page_count: usize) {
        let _ = page_count;
    }

    /// Called once before the first page is rasterised.
    ///
    /// `total_pages` is the number of *selected* pages, not the document
    /// page count.
    fn on_render_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after each page is rasterised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number in the document
    /// * `total_pages` — number of selected pages
    /// * `width`, `height` — rendered size in pixels
    fn on_page_rendered(&self, page_num: usize, total_pages: usize, width: u32, height: u32) {
        let _ = (page_num, total_pages, width, height);
    }

    /// Called once after every selected page has been rasterised.
    fn on_render_complete(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after all pages have been pasted onto the canvas.
    fn on_mosaic_composed(&self, width: u32, height: u32) {
        let _ = (width, height);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl MosaicProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::MosaicConfig`].
pub type ProgressCallback = Arc<dyn MosaicProgressCallback>;
