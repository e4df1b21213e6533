//! Grid parameters: how many columns, and how wide each page is rendered.
//!
//! Both values are supplied through the [`ParameterSource`] trait so the
//! pipeline does not care whether they came from command-line flags, a
//! struct built in code, or an interactive prompt. [`InteractivePrompt`] is
//! generic over its reader and writer; the CLI hands it locked stdin/stdout
//! and tests hand it a `Cursor` and a `Vec<u8>`.

use crate::error::MosaicError;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Column count and target page width for one mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridParameters {
    /// Number of columns in the grid (≥ 1).
    pub columns: u32,
    /// Rendered width of every page, in pixels (≥ 1).
    pub page_width: u32,
}

impl GridParameters {
    /// Validate and construct.
    pub fn new(columns: u32, page_width: u32) -> Result<Self, MosaicError> {
        Ok(Self {
            columns: validate_columns(columns)?,
            page_width: validate_page_width(page_width)?,
        })
    }
}

/// Something that can supply the grid parameters for a run.
pub trait ParameterSource {
    /// Number of grid columns, ≥ 1.
    fn columns(&mut self) -> Result<u32, MosaicError>;

    /// Target page width in pixels, ≥ 1.
    fn page_width(&mut self) -> Result<u32, MosaicError>;

    /// Ask for columns, then width.
    fn collect(&mut self) -> Result<GridParameters, MosaicError> {
        let columns = self.columns()?;
        let page_width = self.page_width()?;
        GridParameters::new(columns, page_width)
    }
}

impl<P: ParameterSource + ?Sized> ParameterSource for &mut P {
    fn columns(&mut self) -> Result<u32, MosaicError> {
        (**self).columns()
    }

    fn page_width(&mut self) -> Result<u32, MosaicError> {
        (**self).page_width()
    }
}

fn validate_columns(columns: u32) -> Result<u32, MosaicError> {
    if columns == 0 {
        return Err(MosaicError::InvalidConfig(
            "Column count must be ≥ 1, got 0".into(),
        ));
    }
    Ok(columns)
}

fn validate_page_width(width: u32) -> Result<u32, MosaicError> {
    if width == 0 {
        return Err(MosaicError::InvalidConfig(
            "Page width must be ≥ 1 pixel, got 0".into(),
        ));
    }
    Ok(width)
}

// ── Fixed values ─────────────────────────────────────────────────────────

/// Parameters known up front. Zero values are rejected when asked for.
#[derive(Debug, Clone, Copy)]
pub struct FixedParameters {
    pub columns: u32,
    pub page_width: u32,
}

impl FixedParameters {
    pub fn new(columns: u32, page_width: u32) -> Self {
        Self {
            columns,
            page_width,
        }
    }
}

impl ParameterSource for FixedParameters {
    fn columns(&mut self) -> Result<u32, MosaicError> {
        validate_columns(self.columns)
    }

    fn page_width(&mut self) -> Result<u32, MosaicError> {
        validate_page_width(self.page_width)
    }
}

impl From<GridParameters> for FixedParameters {
    fn from(p: GridParameters) -> Self {
        Self::new(p.columns, p.page_width)
    }
}

// ── Flags with a fallback ────────────────────────────────────────────────

/// Uses whichever values are already known and asks `fallback` for the rest.
///
/// A value that *is* supplied is validated, not re-asked: `--columns 0` is a
/// configuration error rather than a prompt.
#[derive(Debug)]
pub struct FallbackParameters<P> {
    pub columns: Option<u32>,
    pub page_width: Option<u32>,
    pub fallback: P,
}

impl<P: ParameterSource> FallbackParameters<P> {
    pub fn new(columns: Option<u32>, page_width: Option<u32>, fallback: P) -> Self {
        Self {
            columns,
            page_width,
            fallback,
        }
    }
}

impl<P: ParameterSource> ParameterSource for FallbackParameters<P> {
    fn columns(&mut self) -> Result<u32, MosaicError> {
        match self.columns {
            Some(c) => validate_columns(c),
            None => self.fallback.columns(),
        }
    }

    fn page_width(&mut self) -> Result<u32, MosaicError> {
        match self.page_width {
            Some(w) => validate_page_width(w),
            None => self.fallback.page_width(),
        }
    }
}

// ── Interactive prompt ───────────────────────────────────────────────────

pub const COLUMNS_PROMPT: &str = "How many columns should the grid have? ";
pub const WIDTH_PROMPT: &str = "What should be the horizontal size (width) in pixels of each page? ";
const NOT_A_NUMBER: &str = "Please enter a valid number.";
const NOT_POSITIVE: &str = "Please enter a positive number.";

/// Line-oriented prompt that keeps asking until it gets a positive integer.
///
/// End of input aborts with [`MosaicError::InputAborted`]; every other bad
/// answer is reported on the writer and the question is asked again.
pub struct InteractivePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Ask for the number of grid columns.
    pub fn ask_columns(&mut self) -> Result<u32, MosaicError> {
        self.ask_positive(COLUMNS_PROMPT, "the number of columns")
    }

    /// Ask for the page width in pixels.
    pub fn ask_page_width(&mut self) -> Result<u32, MosaicError> {
        self.ask_positive(WIDTH_PROMPT, "the page width")
    }

    /// Give back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    fn ask_positive(&mut self, prompt: &str, what: &'static str) -> Result<u32, MosaicError> {
        let mut line = String::new();
        loop {
            self.write(prompt)?;
            self.writer
                .flush()
                .map_err(|source| MosaicError::PromptWriteFailed { what, source })?;

            line.clear();
            // A line that is not UTF-8 has been consumed; answer it like any
            // other non-number.
            let answer = match self.reader.read_line(&mut line) {
                Ok(0) => return Err(MosaicError::InputAborted { what }),
                Ok(_) => parse_positive(&line),
                Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(NOT_A_NUMBER),
                Err(_) => return Err(MosaicError::InputAborted { what }),
            };

            match answer {
                Ok(value) => {
                    debug!("Interactive input for {}: {}", what, value);
                    return Ok(value);
                }
                Err(msg) => {
                    self.write(msg)?;
                    self.write("\n")?;
                }
            }
        }
    }

    fn write(&mut self, s: &str) -> Result<(), MosaicError> {
        self.writer
            .write_all(s.as_bytes())
            .map_err(|source| MosaicError::PromptWriteFailed {
                what: "prompt output",
                source,
            })
    }
}

impl<R: BufRead, W: Write> ParameterSource for InteractivePrompt<R, W> {
    fn columns(&mut self) -> Result<u32, MosaicError> {
        self.ask_columns()
    }

    fn page_width(&mut self) -> Result<u32, MosaicError> {
        self.ask_page_width()
    }
}

/// Parse one answer. Negative numbers and zero are "not positive"; anything
/// else that isn't an integer (including values beyond `u32`) is "not a
/// number".
fn parse_positive(line: &str) -> Result<u32, &'static str> {
    let value: i64 = line.trim().parse().map_err(|_| NOT_A_NUMBER)?;
    if value <= 0 {
        return Err(NOT_POSITIVE);
    }
    u32::try_from(value).map_err(|_| NOT_A_NUMBER)
}
