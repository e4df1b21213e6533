//! PDF rasterisation: render pages to RGB bitmaps of an exact pixel width.
//!
//! ## Why compute the height ourselves?
//!
//! Given only a target width, pdfium-render derives the height by truncating
//! `width × page_height / page_width`. The mosaic contract is *rounded* to
//! the nearest pixel, so [`scaled_height`] computes it and both dimensions
//! are passed to pdfium explicitly. That also keeps the rendered size a pure
//! function of the page box, which is what makes layout geometry repeatable.
//!
//! ## Why a trait?
//!
//! Everything downstream of rasterisation (selection, layout, compositing,
//! encoding) only needs "how many pages" and "give me page i at width w".
//! [`PageRasterizer`] captures exactly that, so the pipeline can be driven by
//! [`PdfDocumentSource`] in production and by synthetic pages in tests,
//! without a pdfium library on the test machine.

use crate::error::MosaicError;
use crate::output::PageDimensions;
use crate::pipeline::input::ResolvedPdf;
use image::{imageops, RgbImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A rasterised page.
#[derive(Debug, Clone)]
pub struct PageBitmap {
    /// 0-based page index in the source document.
    pub index: usize,
    /// Opaque RGB pixels; `image.width()` is the requested target width.
    pub image: RgbImage,
}

impl PageBitmap {
    pub fn new(index: usize, image: RgbImage) -> Self {
        Self { index, image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// A source of rasterisable pages.
pub trait PageRasterizer {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Render the 0-based page `index` so the bitmap is exactly
    /// `target_width` pixels wide, preserving the page aspect ratio.
    ///
    /// # Errors
    /// * [`MosaicError::PageOutOfRange`] if `index >= page_count()`
    /// * [`MosaicError::InvalidConfig`] if `target_width` is zero
    /// * [`MosaicError::RasterisationFailed`] if the page cannot be drawn
    fn render_page(&self, index: usize, target_width: u32) -> Result<PageBitmap, MosaicError>;
}

/// Height in pixels of a page rendered `target_width` pixels wide, rounded
/// to the nearest pixel and never less than 1.
pub fn scaled_height(page_width: f32, page_height: f32, target_width: u32) -> Option<u32> {
    if !(page_width.is_finite() && page_height.is_finite()) || page_width <= 0.0 || page_height <= 0.0
    {
        return None;
    }
    let h = (f64::from(target_width) * f64::from(page_height) / f64::from(page_width)).round();
    if h > f64::from(u32::MAX) {
        return None;
    }
    Some((h as u32).max(1))
}

/// Bind the pdfium shared library.
///
/// Resolution order: `library_path` if given (no fallback, so a typo is
/// reported rather than silently replaced), then the platform library in the
/// current directory, then the system library search path.
pub fn bind_engine(library_path: Option<&Path>) -> Result<Pdfium, MosaicError> {
    let bindings = match library_path {
        Some(path) => {
            debug!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(path)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| MosaicError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// An open PDF document backed by pdfium.
pub struct PdfDocumentSource<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
    page_count: usize,
}

impl<'a> PdfDocumentSource<'a> {
    /// Open a PDF that already passed [`crate::pipeline::input::resolve_input`].
    ///
    /// # Errors
    /// * [`MosaicError::CorruptPdf`]
    /// * [`MosaicError::PasswordRequired`] / [`MosaicError::WrongPassword`]
    pub fn open(
        pdfium: &'a Pdfium,
        input: &ResolvedPdf,
        password: Option<&'a str>,
    ) -> Result<Self, MosaicError> {
        let path = input.path().to_path_buf();

        let document = pdfium.load_pdf_from_file(&path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    MosaicError::WrongPassword { path: path.clone() }
                } else {
                    MosaicError::PasswordRequired { path: path.clone() }
                }
            } else {
                MosaicError::CorruptPdf {
                    path: path.clone(),
                    detail: err_str,
                }
            }
        })?;

        let page_count = document.pages().len() as usize;
        info!("PDF loaded: {} pages", page_count);

        Ok(Self {
            path,
            document,
            page_count,
        })
    }

    /// Path the document was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// PDF version as reported by pdfium, e.g. `Pdf1_7`.
    pub fn version(&self) -> String {
        format!("{:?}", self.document.version())
    }

    /// Intrinsic size of every page, in PDF points.
    pub fn page_dimensions(&self) -> Result<Vec<PageDimensions>, MosaicError> {
        let pages = self.document.pages();
        (0..self.page_count)
            .map(|idx| {
                let page = pages
                    .get(idx as u16)
                    .map_err(|e| MosaicError::RasterisationFailed {
                        page: idx + 1,
                        detail: format!("{:?}", e),
                    })?;
                Ok(PageDimensions {
                    page: idx + 1,
                    width_pt: page.width().value,
                    height_pt: page.height().value,
                })
            })
            .collect()
    }
}

impl PageRasterizer for PdfDocumentSource<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, index: usize, target_width: u32) -> Result<PageBitmap, MosaicError> {
        if index >= self.page_count {
            return Err(MosaicError::PageOutOfRange {
                index,
                total: self.page_count,
            });
        }
        if target_width == 0 {
            return Err(MosaicError::InvalidConfig(
                "Page width must be ≥ 1 pixel, got 0".into(),
            ));
        }

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| MosaicError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let (page_w, page_h) = (page.width().value, page.height().value);
        let target_height =
            scaled_height(page_w, page_h, target_width).ok_or_else(|| {
                MosaicError::RasterisationFailed {
                    page: index + 1,
                    detail: format!("unusable page size {page_w}x{page_h} pt at width {target_width}"),
                }
            })?;

        let too_large = || MosaicError::InvalidConfig(format!(
            "Page {} would render at {}x{} px, beyond pdfium's bitmap limit",
            index + 1,
            target_width,
            target_height
        ));
        let render_config = PdfRenderConfig::new()
            .set_target_width(i32::try_from(target_width).map_err(|_| too_large())?)
            .set_target_height(i32::try_from(target_height).map_err(|_| too_large())?);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            MosaicError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let mut image = bitmap.as_image().into_rgb8();
        if image.dimensions() != (target_width, target_height) {
            warn!(
                "pdfium rendered page {} at {}x{} px, resampling to {}x{}",
                index + 1,
                image.width(),
                image.height(),
                target_width,
                target_height
            );
            image = imageops::resize(
                &image,
                target_width,
                target_height,
                imageops::FilterType::Triangle,
            );
        }

        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        Ok(PageBitmap::new(index, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_height_preserves_aspect_ratio() {
        // US Letter: 612 x 792 pt.
        assert_eq!(scaled_height(612.0, 792.0, 300), Some(388));
        // A4: 595.28 x 841.89 pt.
        assert_eq!(scaled_height(595.28, 841.89, 1000), Some(1414));
        // Square.
        assert_eq!(scaled_height(500.0, 500.0, 321), Some(321));
        // Landscape.
        assert_eq!(scaled_height(792.0, 612.0, 300), Some(232));
    }

    #[test]
    fn scaled_height_rounds_to_nearest() {
        // 100 * 1.005 = 100.5 → 101 (round half away from zero)
        assert_eq!(scaled_height(200.0, 201.0, 100), Some(101));
        // 100 * 1.004 = 100.4 → 100
        assert_eq!(scaled_height(250.0, 251.0, 100), Some(100));
    }

    #[test]
    fn scaled_height_never_zero() {
        // An extremely wide strip still yields a 1 px tall bitmap.
        assert_eq!(scaled_height(10_000.0, 1.0, 10), Some(1));
    }

    #[test]
    fn scaled_height_rejects_degenerate_pages() {
        assert_eq!(scaled_height(0.0, 792.0, 300), None);
        assert_eq!(scaled_height(612.0, 0.0, 300), None);
        assert_eq!(scaled_height(-1.0, 792.0, 300), None);
        assert_eq!(scaled_height(f32::NAN, 792.0, 300), None);
    }

    #[test]
    fn scaled_height_is_within_one_pixel() {
        for &(w, h) in &[(612.0f32, 792.0f32), (595.28, 841.89), (419.53, 595.28)] {
            for target in [1u32, 17, 300, 1024, 2481] {
                let got = scaled_height(w, h, target).unwrap() as f64;
                let exact = target as f64 * h as f64 / w as f64;
                assert!((got - exact).abs() <= 1.0, "{w}x{h}@{target}: {got} vs {exact}");
            }
        }
    }

    #[test]
    fn page_bitmap_dimensions() {
        let bmp = PageBitmap::new(3, RgbImage::new(300, 388));
        assert_eq!(bmp.index, 3);
        assert_eq!(bmp.dimensions(), (300, 388));
        assert_eq!(bmp.width(), 300);
        assert_eq!(bmp.height(), 388);
    }
}
