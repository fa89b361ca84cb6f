//! All supported abuse report formats for xarfconv.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for generic format handling across the crate.

pub mod arf;
pub mod csv;
pub mod iodef;
pub mod xarf;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use arf::FeedbackReport;
pub use csv::CsvRecord;
pub use iodef::IodefDocument;

use crate::Error;

/// Represents all supported abuse report formats.
///
/// XARF is the hub: every other format converts to and from it, never directly
/// to one another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// XARF JSON, the canonical normalized form.
    Xarf,
    /// Abuse Reporting Format, a MIME `multipart/report` message.
    Arf,
    /// A header row plus one data row.
    Csv,
    /// A minimal IODEF XML incident document.
    Iodef,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use xarfconv::formats::FormatType;
/// assert_eq!(FormatType::Xarf.to_string(), "xarf");
/// assert_eq!(FormatType::Iodef.to_string(), "iodef");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Xarf => write!(f, "xarf"),
            FormatType::Arf => write!(f, "arf"),
            FormatType::Csv => write!(f, "csv"),
            FormatType::Iodef => write!(f, "iodef"),
        }
    }
}

/// Implements [`std::str::FromStr`] for [`FormatType`].
///
/// Accepts the following case-insensitive strings:
/// - `"xarf"`, `"json"` → `FormatType::Xarf`
/// - `"arf"`, `"eml"` → `FormatType::Arf`
/// - `"csv"` → `FormatType::Csv`
/// - `"iodef"`, `"xml"` → `FormatType::Iodef`
///
/// Returns [`crate::error::Error::InvalidRequest`] for unknown strings.
///
/// # Example
/// ```rust
/// use xarfconv::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("XARF").unwrap(), FormatType::Xarf);
/// assert!(FormatType::from_str("pdf").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "xarf" | "json" => Ok(FormatType::Xarf),
            "arf" | "eml" => Ok(FormatType::Arf),
            "csv" => Ok(FormatType::Csv),
            "iodef" | "xml" => Ok(FormatType::Iodef),
            other => Err(Error::invalid_request(format!(
                "unknown format `{}`, expected one of: xarf, arf, csv, iodef",
                other
            ))),
        }
    }
}

impl FormatType {
    pub const ALL: [FormatType; 4] = [
        FormatType::Xarf,
        FormatType::Arf,
        FormatType::Csv,
        FormatType::Iodef,
    ];

    /// Returns the typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Xarf => "json",
            FormatType::Arf => "eml",
            FormatType::Csv => "csv",
            FormatType::Iodef => "xml",
        }
    }

    /// Whether this is the hub format every route passes through.
    pub fn is_hub(&self) -> bool {
        matches!(self, FormatType::Xarf)
    }
}

/// Infers a [`FormatType`] from a file path's extension.
///
/// Returns `Some(FormatType)` if the extension matches a known format, otherwise `None`.
///
/// # Example
/// ```rust
/// use xarfconv::formats::{FormatType, infer_format_from_extension};
///
/// assert_eq!(infer_format_from_extension("report.json"), Some(FormatType::Xarf));
/// assert_eq!(infer_format_from_extension("report.eml"), Some(FormatType::Arf));
/// assert_eq!(infer_format_from_extension("report.CSV"), Some(FormatType::Csv));
/// assert_eq!(infer_format_from_extension("incident.xml"), Some(FormatType::Iodef));
/// assert_eq!(infer_format_from_extension("notes.txt"), None);
/// ```
pub fn infer_format_from_extension<P: AsRef<Path>>(path: P) -> Option<FormatType> {
    let extension = path.as_ref().extension()?.to_str()?;

    match extension.to_lowercase().as_str() {
        "json" | "xarf" => Some(FormatType::Xarf),
        "eml" | "arf" => Some(FormatType::Arf),
        "csv" => Some(FormatType::Csv),
        "xml" | "iodef" => Some(FormatType::Iodef),
        _ => None,
    }
}
