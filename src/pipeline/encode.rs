//! Image encoding: write the mosaic as PNG or JPEG.
//!
//! The format is chosen from the output file extension and resolved before
//! any page is rendered, so a typo in `-o` fails in milliseconds instead of
//! after a long rasterisation pass.
//!
//! Files are written atomically: the encoder streams into a temp file in
//! the destination directory, which is renamed over the target only once
//! encoding succeeded. A failed run never leaves a truncated image behind.

use crate::error::MosaicError;
use crate::pipeline::compose::MosaicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless; keeps small print crisp. (default)
    #[default]
    Png,
    Jpeg,
}

impl OutputFormat {
    /// Pick the format from the extension of `path` (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, MosaicError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("jpg") | Some("jpeg") => Ok(OutputFormat::Jpeg),
            _ => Err(MosaicError::UnsupportedOutputFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Canonical file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
        })
    }
}

/// Encode `image` into `writer`.
///
/// `jpeg_quality` (1–100) only affects JPEG output. PNG output uses the best
/// compression level with adaptive filtering.
pub fn encode_to<W: Write>(
    image: &MosaicImage,
    format: OutputFormat,
    jpeg_quality: u8,
    writer: W,
) -> Result<(), MosaicError> {
    let rgb = image.as_rgb();
    let (w, h) = rgb.dimensions();
    let result = match format {
        OutputFormat::Png => {
            PngEncoder::new_with_quality(writer, CompressionType::Best, FilterType::Adaptive)
                .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8)
        }
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(writer, jpeg_quality.clamp(1, 100))
            .write_image(rgb.as_raw(), w, h, ExtendedColorType::Rgb8),
    };
    result.map_err(|e| MosaicError::EncodeFailed {
        format: format.to_string(),
        detail: e.to_string(),
    })
}

/// Encode `image` into an in-memory buffer.
pub fn encode(
    image: &MosaicImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, MosaicError> {
    let mut buf = Vec::new();
    encode_to(image, format, jpeg_quality, &mut buf)?;
    debug!("Encoded mosaic → {} bytes {}", buf.len(), format);
    Ok(buf)
}

/// Atomically write `image` to `path`. Returns the size of the written file.
pub fn write_image(
    image: &MosaicImage,
    path: &Path,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<u64, MosaicError> {
    let write_err = |source: std::io::Error| MosaicError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = output_dir(path);
    std::fs::create_dir_all(&parent).map_err(write_err)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".pdf-mosaic-")
        .suffix(".tmp")
        .tempfile_in(&parent)
        .map_err(write_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_to(image, format, jpeg_quality, &mut writer)?;
        writer.flush().map_err(write_err)?;
    }

    let file = tmp.persist(path).map_err(|e| write_err(e.error))?;
    let size = file.metadata().map_err(write_err)?.len();

    info!(
        "Wrote {}x{} {} mosaic ({} bytes) to {}",
        image.width(),
        image.height(),
        format,
        size,
        path.display()
    );
    Ok(size)
}

/// Directory a file at `path` will be written into.
fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
