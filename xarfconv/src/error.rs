//! All error types for the xarfconv crate.
//!
//! These are returned from all fallible operations (parsing, serialization, conversion,
//! validation input handling). Validation *findings* are never errors; they are
//! reported through [`crate::validation::ValidationResult`].

use thiserror::Error;

use crate::formats::FormatType;

#[derive(Error, Debug)]
pub enum Error {
    /// The input is malformed for the declared source format.
    #[error("{format} parse error: {message}")]
    Parse { format: FormatType, message: String },

    /// The request itself is unusable: same source and target, an unknown
    /// format label, or missing required inputs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A well-formed pair of formats that is not one of the hub routes.
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedConversion { from: FormatType, to: FormatType },

    /// The validator was handed something that is not a report at all.
    #[error("validation input error: {0}")]
    ValidationInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new parse error for the given source format.
    pub fn parse(format: FormatType, message: impl Into<String>) -> Self {
        Error::Parse {
            format,
            message: message.into(),
        }
    }

    /// Creates a new invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }
}
