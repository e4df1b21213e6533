//! Grid layout: where each page goes and how big the canvas must be.
//!
//! Pages fill rows left-to-right, top-to-bottom in document order, so slot
//! `i` lands in row `i / columns` and column `i % columns`. Columns have no
//! fixed width. A page's x offset is the sum of the widths of the pages
//! before it in the same row, and its y offset is the sum of the heights of
//! the rows above. A row is as tall as its tallest page.
//!
//! ```text
//!  columns = 3, five pages
//!
//!  (0,0)    (w0,0)      (w0+w1,0)
//!  ┌────────┬───────────┬──────┐
//!  │   0    │     1     │  2   │   row 0: height = max(h0, h1, h2)
//!  ├────────┴──┬────────┴──────┘
//!  │     3     │   4   │           row 1: height = max(h3, h4)
//!  └───────────┴───────┘
//!  (0,H0)      (w3,H0)
//!
//!  canvas width  = max(w0+w1+w2, w3+w4)
//!  canvas height = H0 + H1
//! ```
//!
//! Arithmetic is done in `u64` and checked against `u32` at the end, so an
//! absurd width × page count is reported as
//! [`MosaicError::CanvasTooLarge`] instead of wrapping.

use crate::config::Alignment;
use crate::error::MosaicError;
use crate::pipeline::render::PageBitmap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The region one page occupies on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    /// Position in the planned sequence (0-based).
    pub slot: usize,
    pub row: u32,
    pub column: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Whether the two regions share at least one pixel.
    pub fn overlaps(&self, other: &Placement) -> bool {
        u64::from(self.x) < other.right()
            && u64::from(other.x) < self.right()
            && u64::from(self.y) < other.bottom()
            && u64::from(other.y) < self.bottom()
    }
}

/// Planned geometry for a mosaic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPlan {
    /// Requested column count.
    pub columns: u32,
    /// `ceil(pages / columns)`.
    pub rows: u32,
    /// Height of each row: the tallest page in it.
    pub row_heights: Vec<u32>,
    /// Sum of page widths in each row.
    pub row_widths: Vec<u32>,
    /// One entry per page, in input order.
    pub placements: Vec<Placement>,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl LayoutPlan {
    /// Number of pages placed.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// Plan a grid for pages of the given `(width, height)` pixel sizes.
///
/// # Errors
/// * [`MosaicError::InvalidConfig`] if `columns` is zero
/// * [`MosaicError::NoPages`] if `dimensions` is empty
/// * [`MosaicError::CanvasTooLarge`] if the canvas exceeds `u32` in either axis
pub fn plan(
    dimensions: &[(u32, u32)],
    columns: u32,
    alignment: Alignment,
) -> Result<LayoutPlan, MosaicError> {
    if columns < 1 {
        return Err(MosaicError::InvalidConfig(
            "Column count must be ≥ 1, got 0".into(),
        ));
    }
    if dimensions.is_empty() {
        return Err(MosaicError::NoPages { total: 0 });
    }

    let cols = columns as usize;
    let rows = dimensions.len().div_ceil(cols);

    let mut row_widths = Vec::with_capacity(rows);
    let mut row_heights = Vec::with_capacity(rows);
    for row in dimensions.chunks(cols) {
        row_widths.push(row.iter().map(|&(w, _)| u64::from(w)).sum::<u64>());
        row_heights.push(row.iter().map(|&(_, h)| u64::from(h)).max().unwrap_or(0));
    }

    let canvas_width = row_widths.iter().copied().max().unwrap_or(0);
    let canvas_height: u64 = row_heights.iter().sum();
    if canvas_width > u64::from(u32::MAX) || canvas_height > u64::from(u32::MAX) {
        return Err(MosaicError::CanvasTooLarge {
            width: canvas_width,
            height: canvas_height,
        });
    }

    // Every row width and height is bounded by the canvas, so the narrowing
    // casts below cannot truncate.
    let mut placements = Vec::with_capacity(dimensions.len());
    let mut y = 0u64;
    for (row_idx, row) in dimensions.chunks(cols).enumerate() {
        let row_height = row_heights[row_idx];
        let mut x = match alignment {
            Alignment::Start => 0,
            Alignment::Center => (canvas_width - row_widths[row_idx]) / 2,
        };
        for (col_idx, &(width, height)) in row.iter().enumerate() {
            let dy = match alignment {
                Alignment::Start => 0,
                Alignment::Center => (row_height - u64::from(height)) / 2,
            };
            placements.push(Placement {
                slot: row_idx * cols + col_idx,
                row: row_idx as u32,
                column: col_idx as u32,
                x: x as u32,
                y: (y + dy) as u32,
                width,
                height,
            });
            x += u64::from(width);
        }
        y += row_height;
    }

    let plan = LayoutPlan {
        columns,
        rows: rows as u32,
        row_heights: row_heights.into_iter().map(|h| h as u32).collect(),
        row_widths: row_widths.into_iter().map(|w| w as u32).collect(),
        placements,
        canvas_width: canvas_width as u32,
        canvas_height: canvas_height as u32,
    };

    debug!(
        "Planned {} pages into {}x{} grid, canvas {}x{} px",
        plan.len(),
        plan.rows,
        plan.columns,
        plan.canvas_width,
        plan.canvas_height
    );

    Ok(plan)
}

/// [`plan`] over rendered bitmaps, in the order given.
pub fn plan_bitmaps(
    bitmaps: &[PageBitmap],
    columns: u32,
    alignment: Alignment,
) -> Result<LayoutPlan, MosaicError> {
    let dimensions: Vec<(u32, u32)> = bitmaps.iter().map(PageBitmap::dimensions).collect();
    plan(&dimensions, columns, alignment)
}
