//! End-to-end tests against a real pdfium library.
//!
//! Fixture PDFs are generated on the fly with pdfium itself, so no test
//! files need to be checked in. Every test skips (prints `SKIP` and passes)
//! when no pdfium library can be bound from the working directory or the
//! system library path.
//!
//! Run with:
//!   LD_LIBRARY_PATH=. cargo test --test e2e -- --nocapture

use pdf_mosaic::params::{COLUMNS_PROMPT, WIDTH_PROMPT};
use pdf_mosaic::pipeline::input::resolve_input;
use pdf_mosaic::pipeline::render::bind_engine;
use pdf_mosaic::{
    create_mosaic, create_mosaic_to_file, inspect, ErrorKind, FallbackParameters,
    FixedParameters, InteractivePrompt, MosaicConfig, MosaicError, PageRasterizer,
    PageSelection, PdfDocumentSource,
};
use pdfium_render::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// pdfium initialises and tears down process-global state per binding, so
/// the tests take turns.
static PDFIUM: Mutex<()> = Mutex::new(());

const LETTER: (f32, f32) = (612.0, 792.0);
const A5_LANDSCAPE: (f32, f32) = (595.0, 420.0);

/// Write a blank PDF with one page per entry of `sizes` (in points).
/// Returns `false` when pdfium cannot be bound.
fn write_fixture(path: &Path, sizes: &[(f32, f32)]) -> bool {
    let pdfium = match bind_engine(None) {
        Ok(p) => p,
        Err(e) => {
            println!("SKIP — {e}");
            return false;
        }
    };

    let mut document = pdfium.create_new_pdf().expect("create document");
    for &(w, h) in sizes {
        document
            .pages_mut()
            .create_page_at_end(PdfPagePaperSize::Custom(
                PdfPoints::new(w),
                PdfPoints::new(h),
            ))
            .expect("create page");
    }
    document.save_to_file(path).expect("save fixture");
    true
}

/// Build a fixture in a fresh temp dir, or skip the test.
macro_rules! fixture_or_skip {
    ($sizes:expr) => {{
        let dir = tempfile::tempdir().unwrap();
        let pdf: PathBuf = dir.path().join("fixture.pdf");
        if !write_fixture(&pdf, $sizes) {
            return;
        }
        (dir, pdf)
    }};
}

fn assert_close(actual: u32, expected: u32, what: &str) {
    assert!(
        actual.abs_diff(expected) <= 1,
        "{what}: expected {expected} ± 1, got {actual}"
    );
}

// ── Mosaic ───────────────────────────────────────────────────────────────────

#[test]
fn test_four_letter_pages_two_columns() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, pdf) = fixture_or_skip!(&[LETTER; 4]);
    let out = dir.path().join("grid.png");

    let summary = create_mosaic_to_file(
        &pdf,
        Some(&out),
        FixedParameters::new(2, 300),
        &MosaicConfig::default(),
    )
    .expect("mosaic should succeed");

    assert_eq!(summary.stats.total_pages, 4);
    assert_eq!(summary.stats.rows, 2);
    assert_eq!(summary.stats.canvas_width, 600);
    assert_close(summary.stats.canvas_height, 776, "canvas height");
    assert_eq!(summary.format, "png");

    let decoded = image::open(&out).expect("decode output").into_rgb8();
    assert_eq!(
        decoded.dimensions(),
        (summary.stats.canvas_width, summary.stats.canvas_height)
    );
    // Blank pages on a white background: everything is white.
    assert_eq!(decoded.get_pixel(450, 500), &image::Rgb([255, 255, 255]));

    println!("{}", serde_json::to_string_pretty(&summary).unwrap());
}

#[test]
fn test_selected_pages_to_jpeg() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, pdf) = fixture_or_skip!(&[LETTER, A5_LANDSCAPE, LETTER, A5_LANDSCAPE, LETTER]);
    let out = dir.path().join("sub").join("grid.jpg");

    let config = MosaicConfig::builder()
        .pages(PageSelection::Range(2, 4))
        .jpeg_quality(80)
        .build()
        .unwrap();
    let summary = create_mosaic_to_file(&pdf, Some(&out), FixedParameters::new(3, 200), &config)
        .expect("mosaic should succeed");

    assert_eq!(summary.stats.rendered_pages, 3);
    assert_eq!(summary.stats.rows, 1);
    assert_eq!(summary.stats.canvas_width, 600);
    // The letter page is the tallest in the single row.
    assert_close(summary.stats.canvas_height, 259, "canvas height");
    assert_eq!(summary.format, "jpeg");
    assert_eq!(&std::fs::read(&out).unwrap()[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_interactive_parameters_after_page_count() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (_dir, pdf) = fixture_or_skip!(&[LETTER; 3]);

    let input = Cursor::new("0\nabc\n2\n150\n");
    let mut prompt = InteractivePrompt::new(input, Vec::new());
    let mosaic = create_mosaic(
        &pdf,
        FallbackParameters::new(None, None, &mut prompt),
        &MosaicConfig::default(),
    )
    .expect("mosaic should succeed");

    assert_eq!(mosaic.stats.columns, 2);
    assert_eq!(mosaic.stats.page_width, 150);
    assert_eq!(mosaic.image.width(), 300);

    let (_, written) = prompt.into_inner();
    let transcript = String::from_utf8(written).unwrap();
    assert_eq!(transcript.matches(COLUMNS_PROMPT).count(), 3);
    assert_eq!(transcript.matches(WIDTH_PROMPT).count(), 1);
}

#[test]
fn test_nothing_written_on_failure() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, pdf) = fixture_or_skip!(&[LETTER; 2]);
    let out = dir.path().join("never.png");

    let config = MosaicConfig::builder()
        .pages(PageSelection::Single(7))
        .build()
        .unwrap();
    let err = create_mosaic_to_file(&pdf, Some(&out), FixedParameters::new(2, 100), &config)
        .unwrap_err();

    assert!(matches!(err, MosaicError::NoPages { total: 2 }));
    assert!(!out.exists());
}

// ── Inspect and error mapping ────────────────────────────────────────────────

#[test]
fn test_inspect_reports_page_sizes() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (_dir, pdf) = fixture_or_skip!(&[LETTER, A5_LANDSCAPE]);

    let info = inspect(&pdf, &MosaicConfig::default()).expect("inspect should succeed");
    assert_eq!(info.page_count, 2);
    assert_eq!(info.pages.len(), 2);
    assert_eq!(info.pages[1].page, 2);
    assert!((info.pages[0].width_pt - LETTER.0).abs() < 1.0);
    assert!((info.pages[1].height_pt - A5_LANDSCAPE.1).abs() < 1.0);
    assert!(!info.pdf_version.is_empty());
}

#[test]
fn test_resolved_input_opens_without_rechecking() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (_dir, pdf) = fixture_or_skip!(&[LETTER, LETTER, A5_LANDSCAPE]);

    let resolved = resolve_input(&pdf).expect("fixture is a PDF");
    assert_eq!(resolved.path(), pdf.as_path());

    let engine = bind_engine(None).expect("bound once already");
    for _ in 0..2 {
        let source = PdfDocumentSource::open(&engine, &resolved, None).expect("open");
        assert_eq!(source.page_count(), 3);
        assert_eq!(source.path(), pdf.as_path());
        let page = source.render_page(2, 100).expect("render");
        assert_eq!(page.width(), 100);
    }
}

#[test]
fn test_truncated_pdf_is_a_format_error() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (dir, _pdf) = fixture_or_skip!(&[LETTER]);

    let broken = dir.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.7\n1 0 obj << /Type /Catalog").unwrap();

    let err = inspect(&broken, &MosaicConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format, "got {err}");
}

#[test]
fn test_missing_library_path_is_an_engine_error() {
    let _guard = PDFIUM.lock().unwrap_or_else(|e| e.into_inner());
    let (_dir, pdf) = fixture_or_skip!(&[LETTER]);

    let config = MosaicConfig::builder()
        .pdfium_library("/definitely/not/libpdfium.so")
        .build()
        .unwrap();
    let err = inspect(&pdf, &config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Engine);
}
