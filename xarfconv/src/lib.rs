#![forbid(unsafe_code)]
//! Abuse report conversion and validation for Rust.
//!
//! Reads and writes XARF JSON, ARF (`multipart/report` email), single-report CSV
//! and a minimal IODEF. Every conversion goes through the normalized [`Report`]
//! with XARF as the hub, and a validator checks reports against the XARF field rules.
//!
//! # Quick Start
//!
//! ```rust
//! use xarfconv::{FormatType, ValidationOptions, convert, samples::sample, validate};
//!
//! let csv = convert(sample(FormatType::Xarf), FormatType::Xarf, FormatType::Csv)?;
//! let json = convert(csv.as_str(), FormatType::Csv, FormatType::Xarf)?;
//!
//! let result = validate(&json, &ValidationOptions::default())?;
//! assert!(result.valid);
//! # Ok::<(), xarfconv::Error>(())
//! ```
//!
//! # Supported Formats
//!
//! - **XARF**: JSON, the canonical form
//! - **ARF**: abuse feedback email (RFC 5965 style)
//! - **CSV**: one header row and one data row
//! - **IODEF**: `IODEF-Document` 2.0 XML, a small subset
//!
//! Only routes with XARF on one side are supported; `csv → arf` and the like
//! are rejected with [`Error::UnsupportedConversion`].

pub mod converter;
pub mod error;
pub mod evidence;
pub mod formats;
pub mod generator;
pub mod samples;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    converter::{convert, convert_auto, convert_by_name, convert_report, parse_report},
    error::Error,
    evidence::EvidenceSource,
    formats::{FormatType, infer_format_from_extension},
    generator::{GenerateOptions, generate_report},
    types::{Evidence, OnBehalfOf, Report, Reporter, Severity},
    validation::{ValidationOptions, ValidationResult, validate, validate_report, validate_value},
};
