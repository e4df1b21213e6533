//! Result types returned by the mosaic entry points.

use crate::pipeline::compose::MosaicImage;
use crate::pipeline::layout::LayoutPlan;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A finished mosaic held in memory.
#[derive(Debug, Clone)]
pub struct MosaicOutput {
    /// The composed canvas.
    pub image: MosaicImage,
    /// Geometry the canvas was composed from.
    pub plan: LayoutPlan,
    /// 0-based indices of the pages in the mosaic, in placement order.
    pub page_indices: Vec<usize>,
    /// Run statistics.
    pub stats: MosaicStats,
}

/// Statistics for one mosaic run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicStats {
    /// Pages in the source document.
    pub total_pages: usize,
    /// Pages placed on the canvas.
    pub rendered_pages: usize,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Target width of every page, in pixels.
    pub page_width: u32,
    /// Final canvas width in pixels.
    pub canvas_width: u32,
    /// Final canvas height in pixels.
    pub canvas_height: u32,
    /// Wall-clock time spent rasterising.
    pub render_duration_ms: u64,
    /// Wall-clock time spent planning and compositing.
    pub compose_duration_ms: u64,
}

/// Summary of a mosaic written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicSummary {
    /// Input PDF path.
    pub input: PathBuf,
    /// Image file that was written.
    pub output: PathBuf,
    /// Image format name, e.g. `png`.
    pub format: String,
    /// Size of the written file in bytes.
    pub file_size: u64,
    #[serde(flatten)]
    pub stats: MosaicStats,
    /// Wall-clock time spent encoding and writing.
    pub encode_duration_ms: u64,
    /// Wall-clock time for the whole run, excluding time spent waiting on
    /// interactive input.
    pub total_duration_ms: u64,
}

/// Intrinsic size of one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageDimensions {
    /// 1-based page number.
    pub page: usize,
    /// Width in PDF points (1/72 inch).
    pub width_pt: f32,
    /// Height in PDF points.
    pub height_pt: f32,
}

/// What [`crate::inspect`] reports about a PDF without rendering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub path: PathBuf,
    pub page_count: usize,
    pub pdf_version: String,
    pub pages: Vec<PageDimensions>,
}
