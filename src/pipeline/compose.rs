//! Compositing: paste rendered pages onto one canvas.

use crate::config::BackgroundColor;
use crate::error::MosaicError;
use crate::pipeline::layout::LayoutPlan;
use crate::pipeline::render::PageBitmap;
use image::{imageops, DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// The composed mosaic.
///
/// Always opaque RGB so it can be written as either PNG or JPEG.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicImage {
    image: RgbImage,
}

impl MosaicImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Borrow the pixel buffer.
    pub fn as_rgb(&self) -> &RgbImage {
        &self.image
    }

    /// Take the pixel buffer.
    pub fn into_rgb(self) -> RgbImage {
        self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgb8(self.image)
    }
}

/// Paste every bitmap at its planned offset on a canvas filled with
/// `background`.
///
/// `bitmaps[i]` goes to `plan.placements[i]`. Placements never overlap, so
/// paste order does not affect the result; pages are pasted in document
/// order anyway.
///
/// # Errors
/// [`MosaicError::Internal`] if the bitmaps do not match the plan they are
/// supposed to have been planned from.
pub fn compose(
    bitmaps: &[PageBitmap],
    plan: &LayoutPlan,
    background: BackgroundColor,
) -> Result<MosaicImage, MosaicError> {
    if bitmaps.len() != plan.placements.len() {
        return Err(MosaicError::Internal(format!(
            "layout planned {} pages but {} bitmaps were supplied",
            plan.placements.len(),
            bitmaps.len()
        )));
    }

    let mut canvas = RgbImage::from_pixel(plan.canvas_width, plan.canvas_height, Rgb(background.0));

    for (bitmap, placement) in bitmaps.iter().zip(&plan.placements) {
        if bitmap.dimensions() != (placement.width, placement.height) {
            return Err(MosaicError::Internal(format!(
                "page {} is {}x{} px but was planned as {}x{}",
                bitmap.index + 1,
                bitmap.width(),
                bitmap.height(),
                placement.width,
                placement.height
            )));
        }
        imageops::replace(
            &mut canvas,
            &bitmap.image,
            i64::from(placement.x),
            i64::from(placement.y),
        );
        debug!(
            "Placed page {} at ({}, {})",
            bitmap.index + 1,
            placement.x,
            placement.y
        );
    }

    Ok(MosaicImage { image: canvas })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Alignment;
    use crate::pipeline::layout::plan_bitmaps;

    fn solid(index: usize, w: u32, h: u32, rgb: [u8; 3]) -> PageBitmap {
        PageBitmap::new(index, RgbImage::from_pixel(w, h, Rgb(rgb)))
    }

    #[test]
    fn pages_land_at_planned_offsets() {
        let bitmaps = vec![
            solid(0, 4, 6, [255, 0, 0]),
            solid(1, 4, 3, [0, 255, 0]),
            solid(2, 4, 6, [0, 0, 255]),
        ];
        let plan = plan_bitmaps(&bitmaps, 2, Alignment::Start).unwrap();
        let mosaic = compose(&bitmaps, &plan, BackgroundColor::WHITE).unwrap();
        let img = mosaic.as_rgb();

        assert_eq!(mosaic.dimensions(), (8, 12));
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(3, 5), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(4, 0), &Rgb([0, 255, 0]));
        assert_eq!(img.get_pixel(7, 2), &Rgb([0, 255, 0]));
        // Below the short page in row 0: background.
        assert_eq!(img.get_pixel(5, 4), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(0, 6), &Rgb([0, 0, 255]));
        // Empty cell in the last row: background.
        assert_eq!(img.get_pixel(6, 9), &Rgb([255, 255, 255]));
    }

    #[test]
    fn background_colour_fills_gaps() {
        let bitmaps = vec![solid(0, 2, 2, [9, 9, 9]), solid(1, 2, 5, [9, 9, 9])];
        let plan = plan_bitmaps(&bitmaps, 2, Alignment::Start).unwrap();
        let mosaic = compose(&bitmaps, &plan, BackgroundColor::BLACK).unwrap();
        assert_eq!(mosaic.as_rgb().get_pixel(0, 4), &Rgb([0, 0, 0]));
        assert_eq!(mosaic.as_rgb().get_pixel(3, 4), &Rgb([9, 9, 9]));
    }

    #[test]
    fn every_canvas_pixel_is_a_page_or_background() {
        let bitmaps: Vec<PageBitmap> = (0..5)
            .map(|i| solid(i, 3 + i as u32, 2 + (i as u32 % 3), [10 * i as u8 + 1, 0, 0]))
            .collect();
        let plan = plan_bitmaps(&bitmaps, 3, Alignment::Start).unwrap();
        let mosaic = compose(&bitmaps, &plan, BackgroundColor::WHITE).unwrap();

        let covered: u64 = bitmaps
            .iter()
            .map(|b| u64::from(b.width()) * u64::from(b.height()))
            .sum();
        let page_pixels = mosaic
            .as_rgb()
            .pixels()
            .filter(|p| **p != Rgb([255, 255, 255]))
            .count() as u64;
        assert_eq!(page_pixels, covered);
    }

    #[test]
    fn mismatched_bitmap_count_is_internal_error() {
        let bitmaps = vec![solid(0, 2, 2, [0, 0, 0]), solid(1, 2, 2, [0, 0, 0])];
        let plan = plan_bitmaps(&bitmaps, 2, Alignment::Start).unwrap();
        let err = compose(&bitmaps[..1], &plan, BackgroundColor::WHITE).unwrap_err();
        assert!(matches!(err, MosaicError::Internal(_)));
    }

    #[test]
    fn mismatched_bitmap_size_is_internal_error() {
        let planned = vec![solid(0, 2, 2, [0, 0, 0])];
        let plan = plan_bitmaps(&planned, 1, Alignment::Start).unwrap();
        let other = vec![solid(0, 3, 2, [0, 0, 0])];
        assert!(compose(&other, &plan, BackgroundColor::WHITE).is_err());
    }
}
