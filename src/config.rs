//! Configuration types for mosaic rendering.
//!
//! Rendering and output behaviour is controlled through [`MosaicConfig`],
//! built via its [`MosaicConfigBuilder`]. The grid parameters (column count
//! and page width) are deliberately *not* part of the config: they are
//! supplied by a [`crate::params::ParameterSource`] once the document has
//! been opened, so an interactive front-end can show the page count before
//! asking for them.

use crate::error::MosaicError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Configuration for a mosaic run.
///
/// Built via [`MosaicConfig::builder()`] or using [`MosaicConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_mosaic::{Alignment, BackgroundColor, MosaicConfig, PageSelection};
///
/// let config = MosaicConfig::builder()
///     .pages(PageSelection::Range(1, 8))
///     .background(BackgroundColor::BLACK)
///     .alignment(Alignment::Center)
///     .jpeg_quality(90)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct MosaicConfig {
    /// Which pages go into the mosaic. Default: all pages.
    pub pages: PageSelection,

    /// Fill colour for canvas areas no page covers. Default: white.
    pub background: BackgroundColor,

    /// Placement of pages inside their grid cell. Default: [`Alignment::Start`].
    pub alignment: Alignment,

    /// JPEG encoder quality, 1–100. Ignored for PNG output. Default: 95.
    pub jpeg_quality: u8,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library. When `None` the library
    /// is looked up in the working directory, then on the system path.
    pub pdfium_library: Option<PathBuf>,

    /// Optional progress callback for per-page rendering events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            pages: PageSelection::default(),
            background: BackgroundColor::default(),
            alignment: Alignment::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            password: None,
            pdfium_library: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for MosaicConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MosaicConfig")
            .field("pages", &self.pages)
            .field("background", &self.background)
            .field("alignment", &self.alignment)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("pdfium_library", &self.pdfium_library)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn MosaicProgressCallback>"),
            )
            .finish()
    }
}

impl MosaicConfig {
    /// Create a new builder for `MosaicConfig`.
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`MosaicConfig`].
#[derive(Debug)]
pub struct MosaicConfigBuilder {
    config: MosaicConfig,
}

impl MosaicConfigBuilder {
    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn background(mut self, colour: BackgroundColor) -> Self {
        self.config.background = colour;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.config.alignment = alignment;
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MosaicConfig, MosaicError> {
        let c = &self.config;
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(MosaicError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        c.pages.validate()?;
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a page is placed inside the region the grid reserves for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Pages are packed to the top-left: each row starts at x = 0 and every
    /// page sits on the top edge of its row. The canvas is the minimal
    /// bounding box of all pages. (default)
    #[default]
    Start,
    /// Rows narrower than the canvas are centred horizontally and pages
    /// shorter than their row are centred vertically. Canvas size is the
    /// same as for [`Alignment::Start`].
    Center,
}

/// Specifies which pages of the PDF go into the mosaic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// All pages (default).
    #[default]
    All,
    /// A single page (1-indexed).
    Single(usize),
    /// A contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    fn validate(&self) -> Result<(), MosaicError> {
        match self {
            PageSelection::All => Ok(()),
            PageSelection::Single(0) => Err(MosaicError::InvalidConfig(
                "Pages are 1-indexed, minimum is 1 (got 0)".into(),
            )),
            PageSelection::Single(_) => Ok(()),
            PageSelection::Range(start, end) => {
                if *start < 1 {
                    Err(MosaicError::InvalidConfig(format!(
                        "Pages are 1-indexed, minimum is 1 (got {start})"
                    )))
                } else if start > end {
                    Err(MosaicError::InvalidConfig(format!(
                        "Invalid page range '{start}-{end}': start must be <= end"
                    )))
                } else {
                    Ok(())
                }
            }
            PageSelection::Set(pages) => {
                if pages.is_empty() {
                    return Err(MosaicError::InvalidConfig("Empty page set".into()));
                }
                match pages.iter().find(|&&p| p < 1) {
                    Some(p) => Err(MosaicError::InvalidConfig(format!(
                        "Pages are 1-indexed, minimum is 1 (got {p})"
                    ))),
                    None => Ok(()),
                }
            }
        }
    }
}

impl FromStr for PageSelection {
    type Err = MosaicError;

    /// Parse `all`, `5`, `3-15`, `1,3,5,7` or a set with ranges in it,
    /// such as `1-3,5,8-9`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();

        let selection = if s == "all" {
            PageSelection::All
        } else if s.contains(',') {
            let mut pages = Vec::new();
            for part in s.split(',') {
                match part.split_once('-') {
                    Some((start, end)) => {
                        let (start, end) = (page_number(start)?, page_number(end)?);
                        if start > end || end - start > MAX_SET_RANGE {
                            return Err(MosaicError::InvalidConfig(format!(
                                "Invalid page range '{}' in page set",
                                part.trim()
                            )));
                        }
                        pages.extend(start..=end);
                    }
                    None => pages.push(page_number(part)?),
                }
            }
            PageSelection::Set(pages)
        } else if let Some((start, end)) = s.split_once('-') {
            PageSelection::Range(page_number(start)?, page_number(end)?)
        } else {
            PageSelection::Single(page_number(&s)?)
        };

        selection.validate()?;
        Ok(selection)
    }
}

/// Widest range accepted inside a page set; pdfium addresses pages by `u16`.
const MAX_SET_RANGE: usize = u16::MAX as usize;

fn page_number(p: &str) -> Result<usize, MosaicError> {
    p.trim()
        .parse::<usize>()
        .map_err(|_| MosaicError::InvalidConfig(format!("Invalid page number: '{}'", p.trim())))
}

/// Solid RGB fill for the mosaic canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundColor(pub [u8; 3]);

impl BackgroundColor {
    pub const WHITE: BackgroundColor = BackgroundColor([255, 255, 255]);
    pub const BLACK: BackgroundColor = BackgroundColor([0, 0, 0]);
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl FromStr for BackgroundColor {
    type Err = MosaicError;

    /// Parse `white`, `black`, `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "white" => return Ok(Self::WHITE),
            "black" => return Ok(Self::BLACK),
            _ => {}
        }

        let hex = s.strip_prefix('#').unwrap_or(&s);
        let invalid = || {
            MosaicError::InvalidConfig(format!(
                "Invalid background colour '{s}': expected white, black or #RRGGBB"
            ))
        };
        // `from_str_radix` alone would accept a sign, e.g. "+1+2+3".
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(BackgroundColor([channel(0)?, channel(2)?, channel(4)?]))
    }
}
