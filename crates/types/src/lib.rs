//! Shared primitive types for ResumeFodder crates.
//!
//! Small validated wrappers used on both sides of the data boundary: the interchange
//! [`DataFormat`] and the ISO-8601 [`CalendarDate`] used by template date helpers.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Errors that can occur when creating validated primitive types.
#[derive(Debug, thiserror::Error)]
pub enum TypesError {
    /// The input was not a `YYYY-MM-DD` calendar date
    #[error("invalid calendar date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),
    /// The format name or file extension is not a supported interchange format
    #[error("unsupported data format '{0}' (expected json, xml or yaml)")]
    UnsupportedFormat(String),
}

pub type TypesResult<T> = std::result::Result<T, TypesError>;

/// Interchange formats a résumé record can be encoded to and decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFormat {
    Json,
    Xml,
    Yaml,
}

impl DataFormat {
    /// All supported formats, in a stable order.
    pub const ALL: [DataFormat; 3] = [DataFormat::Json, DataFormat::Xml, DataFormat::Yaml];

    /// Chooses a format from a file name's extension (case-insensitive).
    ///
    /// `.json`, `.xml`, `.yaml` and `.yml` are recognised.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::UnsupportedFormat` if the path has no extension or an
    /// unrecognised one.
    pub fn from_path(path: impl AsRef<Path>) -> TypesResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| TypesError::UnsupportedFormat(path.display().to_string()))?;
        extension.parse()
    }

    /// Canonical lower-case name, also the preferred file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Xml => "xml",
            DataFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for DataFormat {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(DataFormat::Json),
            "xml" => Ok(DataFormat::Xml),
            "yaml" | "yml" => Ok(DataFormat::Yaml),
            _ => Err(TypesError::UnsupportedFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A calendar date in strict ISO-8601 `YYYY-MM-DD` form.
///
/// Record fields keep dates as plain strings; this type is only built when a value has to
/// be interpreted, e.g. by the template date helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Parses a `YYYY-MM-DD` string.
    ///
    /// Padding is mandatory (`1998-2-1` is rejected) and the date must exist on the
    /// proleptic Gregorian calendar (`1998-02-30` is rejected).
    ///
    /// # Errors
    ///
    /// Returns `TypesError::InvalidDate` for anything else.
    pub fn parse(input: impl AsRef<str>) -> TypesResult<Self> {
        let input = input.as_ref();
        let bytes = input.as_bytes();
        let shaped = bytes.len() == 10
            && bytes.iter().enumerate().all(|(i, b)| match i {
                4 | 7 => *b == b'-',
                _ => b.is_ascii_digit(),
            });
        if !shaped {
            return Err(TypesError::InvalidDate(input.to_owned()));
        }

        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| TypesError::InvalidDate(input.to_owned()))
    }

    /// Month number and year, unpadded: `1998-02-01` → `2/1998`.
    pub fn month_year(&self) -> String {
        format!("{}/{}", self.0.month(), self.0.year())
    }

    /// English month name and year: `1998-02-01` → `February 1998`.
    pub fn month_name_year(&self) -> String {
        self.0.format("%B %Y").to_string()
    }
}

impl FromStr for CalendarDate {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
