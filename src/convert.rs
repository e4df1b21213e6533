//! Mosaic entry points.
//!
//! [`create_mosaic_to_file`] is what the CLI calls: resolve input and
//! output, open the PDF, ask for grid parameters, render, compose, write.
//! [`create_mosaic`] stops before writing and hands back the image.
//! [`build_mosaic`] is the pdfium-free core. It takes any
//! [`PageRasterizer`] and already-known parameters, which is what the
//! integration tests drive.

use crate::config::MosaicConfig;
use crate::error::MosaicError;
use crate::output::{DocumentInfo, MosaicOutput, MosaicStats, MosaicSummary};
use crate::params::{GridParameters, ParameterSource};
use crate::pipeline::encode::{self, OutputFormat};
use crate::pipeline::render::{self, PageRasterizer, PdfDocumentSource};
use crate::pipeline::input::{self, ResolvedPdf};
use crate::pipeline::{compose, layout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Render the selected pages of `source` and compose them into a mosaic.
///
/// # Errors
/// * [`MosaicError::NoPages`] if the page selection matches nothing
/// * [`MosaicError::InvalidConfig`] for a zero column count or page width
/// * [`MosaicError::CanvasTooLarge`] if the grid cannot fit in an image
/// * any error from [`PageRasterizer::render_page`]
pub fn build_mosaic<S: PageRasterizer + ?Sized>(
    source: &S,
    params: GridParameters,
    config: &MosaicConfig,
) -> Result<MosaicOutput, MosaicError> {
    let params = GridParameters::new(params.columns, params.page_width)?;
    let total_pages = source.page_count();

    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(MosaicError::NoPages { total: total_pages });
    }
    debug!("Selected {} of {} pages", page_indices.len(), total_pages);

    // The widest row is at least `page_width × min(columns, pages)`. Catch
    // an impossible canvas before spending time rasterising.
    let min_row_width =
        u64::from(params.page_width) * u64::from(params.columns).min(page_indices.len() as u64);
    if min_row_width > u64::from(u32::MAX) {
        return Err(MosaicError::CanvasTooLarge {
            width: min_row_width,
            height: 0,
        });
    }

    // ── Rasterise ────────────────────────────────────────────────────────
    let selected = page_indices.len();
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(selected);
    }

    let render_start = Instant::now();
    let mut bitmaps = Vec::with_capacity(selected);
    for &idx in &page_indices {
        let bitmap = source.render_page(idx, params.page_width)?;
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_rendered(idx + 1, selected, bitmap.width(), bitmap.height());
        }
        bitmaps.push(bitmap);
    }
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!("Rendered {} pages in {}ms", bitmaps.len(), render_duration_ms);

    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(selected);
    }

    // ── Plan and compose ─────────────────────────────────────────────────
    let compose_start = Instant::now();
    let plan = layout::plan_bitmaps(&bitmaps, params.columns, config.alignment)?;
    let image = compose::compose(&bitmaps, &plan, config.background)?;
    drop(bitmaps);
    let compose_duration_ms = compose_start.elapsed().as_millis() as u64;

    info!(
        "Composed {}x{} mosaic ({} rows × {} columns) in {}ms",
        image.width(),
        image.height(),
        plan.rows,
        plan.columns,
        compose_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_mosaic_composed(image.width(), image.height());
    }

    let stats = MosaicStats {
        total_pages,
        rendered_pages: selected,
        columns: plan.columns,
        rows: plan.rows,
        page_width: params.page_width,
        canvas_width: plan.canvas_width,
        canvas_height: plan.canvas_height,
        render_duration_ms,
        compose_duration_ms,
    };

    Ok(MosaicOutput {
        image,
        plan,
        page_indices,
        stats,
    })
}

/// Open the PDF at `input`, collect grid parameters, and build the mosaic.
///
/// `parameters` is asked only after the document opened successfully, and
/// after `on_document_opened` has fired, so an interactive front-end can
/// show the page count first.
pub fn create_mosaic(
    input: impl AsRef<Path>,
    parameters: impl ParameterSource,
    config: &MosaicConfig,
) -> Result<MosaicOutput, MosaicError> {
    let pdf = input::resolve_input(input)?;
    open_and_build(&pdf, parameters, config).map(|(output, _)| output)
}

/// Build the mosaic and write it to `output`, or to
/// [`default_output_path`] when `output` is `None`.
///
/// The output format is resolved from the extension before the PDF is
/// opened. The file is written atomically, so nothing is created on failure.
pub fn create_mosaic_to_file(
    input: impl AsRef<Path>,
    output: Option<&Path>,
    parameters: impl ParameterSource,
    config: &MosaicConfig,
) -> Result<MosaicSummary, MosaicError> {
    let start = Instant::now();
    let input = input.as_ref();

    let pdf = input::resolve_input(input)?;
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => default_output_path(&pdf),
    };
    let format = OutputFormat::from_path(&output_path)?;
    info!(
        "Creating mosaic: {} → {} ({})",
        pdf.path().display(),
        output_path.display(),
        format
    );

    let (mosaic, waited) = open_and_build(&pdf, parameters, config)?;

    let encode_start = Instant::now();
    let file_size = encode::write_image(&mosaic.image, &output_path, format, config.jpeg_quality)?;
    let encode_duration_ms = encode_start.elapsed().as_millis() as u64;

    Ok(MosaicSummary {
        input: pdf.into_path_buf(),
        output: output_path,
        format: format.to_string(),
        file_size,
        stats: mosaic.stats,
        encode_duration_ms,
        total_duration_ms: start.elapsed().saturating_sub(waited).as_millis() as u64,
    })
}

/// Report page count, PDF version and page sizes without rendering.
pub fn inspect(input: impl AsRef<Path>, config: &MosaicConfig) -> Result<DocumentInfo, MosaicError> {
    let pdf = input::resolve_input(input)?;
    let engine = render::bind_engine(config.pdfium_library.as_deref())?;
    let source = PdfDocumentSource::open(&engine, &pdf, config.password.as_deref())?;

    Ok(DocumentInfo {
        page_count: source.page_count(),
        pdf_version: source.version(),
        pages: source.page_dimensions()?,
        path: pdf.into_path_buf(),
    })
}

/// Output path used when none is given: the input's file stem with a
/// `.png` extension, in the current working directory.
///
/// `docs/rules.pdf` → `rules.png`
pub fn default_output_path(input: impl AsRef<Path>) -> PathBuf {
    // Append rather than `set_extension`, which would eat the `.v2` of
    // `archive.v2.pdf`'s stem.
    let mut name = input
        .as_ref()
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "mosaic".into());
    name.push(".");
    name.push(OutputFormat::Png.extension());
    PathBuf::from(name)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Shared body of [`create_mosaic`] and [`create_mosaic_to_file`]. Also
/// returns how long `parameters` took, so time spent at an interactive
/// prompt is not reported as processing time.
fn open_and_build(
    pdf: &ResolvedPdf,
    mut parameters: impl ParameterSource,
    config: &MosaicConfig,
) -> Result<(MosaicOutput, Duration), MosaicError> {
    let engine = render::bind_engine(config.pdfium_library.as_deref())?;
    let source = PdfDocumentSource::open(&engine, pdf, config.password.as_deref())?;

    let page_count = source.page_count();
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_opened(page_count);
    }
    if page_count == 0 {
        return Err(MosaicError::NoPages { total: 0 });
    }

    let ask_start = Instant::now();
    let params = parameters.collect()?;
    let waited = ask_start.elapsed();
    info!(
        "Grid parameters: {} columns, {} px page width",
        params.columns, params.page_width
    );

    let output = build_mosaic(&source, params, config)?;
    Ok((output, waited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::params::FixedParameters;

    #[test]
    fn default_output_path_replaces_extension() {
        assert_eq!(default_output_path("rules.pdf"), PathBuf::from("rules.png"));
        assert_eq!(
            default_output_path("/tmp/games/Core Rules.PDF"),
            PathBuf::from("Core Rules.png")
        );
        assert_eq!(
            default_output_path("archive.v2.pdf"),
            PathBuf::from("archive.v2.png")
        );
        assert_eq!(default_output_path("noext"), PathBuf::from("noext.png"));
    }

    #[test]
    fn missing_input_is_not_found_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");
        let err = create_mosaic_to_file(
            dir.path().join("missing.pdf"),
            Some(&out),
            FixedParameters::new(2, 300),
            &MosaicConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!out.exists());
    }

    #[test]
    fn create_mosaic_checks_input_first() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.pdf");
        std::fs::write(&text, b"plain text").unwrap();

        let err = create_mosaic(&text, FixedParameters::new(2, 300), &MosaicConfig::default())
            .unwrap_err();
        assert!(matches!(err, MosaicError::NotAPdf { .. }));
    }

    #[test]
    fn unsupported_output_is_rejected_before_opening() {
        let mut pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        std::io::Write::write_all(&mut pdf, b"%PDF-1.4\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.gif");

        // No pdfium library is needed: the format check runs first.
        let err = create_mosaic_to_file(
            pdf.path(),
            Some(&out),
            FixedParameters::new(2, 300),
            &MosaicConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MosaicError::UnsupportedOutputFormat { .. }));
        assert!(!out.exists());
    }
}
