//! Error types for the pdf-mosaic library.
//!
//! Every failure is fatal for the run: a mosaic with a missing page is not a
//! useful artefact, so there is no per-page error channel. [`MosaicError`]
//! carries the offending path, page or value so the CLI can print an
//! actionable message, and [`MosaicError::kind`] folds the variants into the
//! coarse categories callers branch on (not found, bad format, bad index,
//! bad configuration, I/O, engine).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf-mosaic library.
#[derive(Debug, Error)]
pub enum MosaicError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Interactive input ended (EOF or closed stdin) before a value was given.
    #[error("Input aborted while waiting for {what}")]
    InputAborted { what: &'static str },

    /// The interactive prompt could not be written (closed stdout, broken pipe).
    #[error("Failed to write prompt for {what}: {source}")]
    PromptWriteFailed {
        what: &'static str,
        #[source]
        source: std::io::Error,
    },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// A 0-based page index outside `[0, total)` was requested.
    #[error("Page index {index} is out of range (document has {total} pages)")]
    PageOutOfRange { index: usize, total: usize },

    /// pdfium-render returned an error for a specific page (1-based).
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Layout / config errors ────────────────────────────────────────────
    /// A configuration or parameter value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// There is nothing to lay out: the document is empty or the page
    /// selection matched no pages.
    #[error("No pages to arrange (document has {total} pages)")]
    NoPages { total: usize },

    /// The planned canvas does not fit in an image buffer.
    #[error("Mosaic canvas would be {width}x{height} px, which exceeds the supported maximum\nUse a smaller --width or more --columns.")]
    CanvasTooLarge { width: u64, height: u64 },

    /// The output extension does not map to a supported image format.
    #[error("Unsupported output format for '{path}'\nUse a .png, .jpg or .jpeg file name.")]
    UnsupportedOutputFormat { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The image encoder rejected the mosaic.
    #[error("Failed to encode mosaic as {format}: {detail}")]
    EncodeFailed { format: String, detail: String },

    /// Could not create or write the output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is loaded at runtime. You can:\n\
  • Place libpdfium (pdfium.dll on Windows) next to the working directory.\n\
  • Install it into a system library directory.\n\
  • Pass --pdfium-lib /path/to/libpdfium.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error category, used by callers that only need to know what kind
/// of thing went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input path does not exist.
    NotFound,
    /// The input is not a readable PDF, a page failed to rasterise, or the
    /// output failed to encode.
    Format,
    /// A page index was out of range.
    Index,
    /// Invalid column count, page width, page selection or output format.
    Config,
    /// Permission, interactive input or output I/O failure.
    Io,
    /// The PDFium library could not be loaded.
    Engine,
    /// A broken internal invariant.
    Internal,
}

impl MosaicError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MosaicError::FileNotFound { .. } => ErrorKind::NotFound,
            MosaicError::NotAPdf { .. }
            | MosaicError::CorruptPdf { .. }
            | MosaicError::PasswordRequired { .. }
            | MosaicError::WrongPassword { .. }
            | MosaicError::RasterisationFailed { .. }
            | MosaicError::EncodeFailed { .. } => ErrorKind::Format,
            MosaicError::PageOutOfRange { .. } => ErrorKind::Index,
            MosaicError::InvalidConfig(_)
            | MosaicError::NoPages { .. }
            | MosaicError::CanvasTooLarge { .. }
            | MosaicError::UnsupportedOutputFormat { .. } => ErrorKind::Config,
            MosaicError::PermissionDenied { .. }
            | MosaicError::InputAborted { .. }
            | MosaicError::PromptWriteFailed { .. }
            | MosaicError::OutputWriteFailed { .. } => ErrorKind::Io,
            MosaicError::PdfiumBindingFailed(_) => ErrorKind::Engine,
            MosaicError::Internal(_) => ErrorKind::Internal,
        }
    }
}
