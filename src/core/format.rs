//! Delimited text format shared by fragment stores and the identity map

use crate::domain::{IdFactorError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Default field delimiter for every artifact
pub const DEFAULT_DELIMITER: char = '|';

/// Line termination convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    /// CRLF on Windows, LF elsewhere
    #[default]
    Platform,
    /// `\n`
    Lf,
    /// `\r\n`
    Crlf,
}

impl LineTerminator {
    fn to_csv(self) -> csv::Terminator {
        match self {
            LineTerminator::Platform if cfg!(windows) => csv::Terminator::CRLF,
            LineTerminator::Platform | LineTerminator::Lf => csv::Terminator::Any(b'\n'),
            LineTerminator::Crlf => csv::Terminator::CRLF,
        }
    }
}

impl FromStr for LineTerminator {
    type Err = IdFactorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "platform" => Ok(LineTerminator::Platform),
            "lf" => Ok(LineTerminator::Lf),
            "crlf" => Ok(LineTerminator::Crlf),
            _ => Err(IdFactorError::Configuration(format!(
                "Invalid line terminator '{s}'. Must be one of: platform, lf, crlf"
            ))),
        }
    }
}

/// Field delimiter and line terminator of an output artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedFormat {
    delimiter: u8,
    terminator: LineTerminator,
}

impl DelimitedFormat {
    /// Creates a format with the given single-byte delimiter
    ///
    /// # Errors
    ///
    /// Returns [`IdFactorError::Configuration`] for a delimiter that is not a
    /// single ASCII character, or that would clash with quoting or line breaks.
    pub fn new(delimiter: char, terminator: LineTerminator) -> Result<Self> {
        Ok(Self {
            delimiter: delimiter_byte(delimiter)?,
            terminator,
        })
    }

    /// Delimiter byte
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Line terminator
    pub fn terminator(&self) -> LineTerminator {
        self.terminator
    }

    /// Wraps `sink` in a record writer using this format
    pub fn writer<W: Write>(&self, sink: W) -> csv::Writer<W> {
        csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(self.terminator.to_csv())
            .has_headers(false)
            .from_writer(sink)
    }
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER as u8,
            terminator: LineTerminator::Platform,
        }
    }
}

/// Validates a delimiter and returns it as a byte
pub fn delimiter_byte(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        return Err(IdFactorError::Configuration(format!(
            "Delimiter must be a single ASCII character, got '{delimiter}'"
        )));
    }
    if matches!(delimiter, '"' | '\r' | '\n') {
        return Err(IdFactorError::Configuration(format!(
            "Delimiter cannot be {delimiter:?}"
        )));
    }
    Ok(delimiter as u8)
}

/// Parses a delimiter given as text, which must be exactly one character
pub fn parse_delimiter(text: &str) -> Result<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            delimiter_byte(c)?;
            Ok(c)
        }
        _ => Err(IdFactorError::Configuration(
            "delimiter must be exactly one character".to_string(),
        )),
    }
}
