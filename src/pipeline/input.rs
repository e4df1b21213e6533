//! Input resolution: validate the user-supplied PDF path before pdfium sees it.
//!
//! pdfium reports a missing file, an unreadable file and a non-PDF file with
//! the same opaque load error. Checking existence, read permission and the
//! `%PDF` magic bytes up front lets each case surface as its own
//! [`MosaicError`] variant.

use crate::error::MosaicError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A path that passed [`resolve_input`]. Only this module can build one, so
/// holding it means the checks already ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPdf {
    path: PathBuf,
}

impl ResolvedPdf {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.path
    }
}

impl AsRef<Path> for ResolvedPdf {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Validate that `path` names an existing, readable PDF file.
pub fn resolve_input(path: impl AsRef<Path>) -> Result<ResolvedPdf, MosaicError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(MosaicError::FileNotFound { path });
    }
    if path.is_dir() {
        return Err(MosaicError::NotAPdf {
            path,
            magic: [0; 4],
        });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            let n = read_up_to(&mut f, &mut magic);
            if n < magic.len() || &magic != b"%PDF" {
                return Err(MosaicError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(MosaicError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(MosaicError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedPdf { path })
}

/// Fill as much of `buf` as the file provides; short files are not an error.
fn read_up_to(f: &mut std::fs::File, buf: &mut [u8]) -> usize {
    let mut filled = 0;
    while filled < buf.len() {
        match f.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    filled
}
