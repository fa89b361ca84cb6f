//! Structural validation of XARF reports.
//!
//! Validation works on the raw JSON object rather than on [`Report`], so a
//! missing field and an empty one are told apart only the way a lenient
//! reader would: `null`, `false`, `0` and `""` all count as absent.
//! Findings are data; only input that is not a JSON object is an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::Error, types::Report};

/// Fields every report must carry, in the order they are checked.
const MANDATORY_FIELDS: [&str; 7] = [
    "xarf_version",
    "report_id",
    "timestamp",
    "reporter",
    "source_identifier",
    "category",
    "type",
];

const RECOMMENDED_FIELDS: [&str; 2] = ["description", "evidence"];

/// The top-level XARF categories.
pub const CATEGORIES: [&str; 8] = [
    "abuse",
    "vulnerability",
    "connection",
    "content",
    "copyright",
    "messaging",
    "reputation",
    "infrastructure",
];

const SEVERITIES: [&str; 4] = ["low", "medium", "high", "critical"];

lazy_static! {
    static ref VERSION_RE: Regex = Regex::new(r"^\d+\.\d+\.\d+$").unwrap();
    static ref UUID_V4_RE: Regex = Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"
    )
    .unwrap();
}

/// Knobs for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Reserved for stricter schema checks; accepted but currently has no effect.
    pub strict: bool,
    /// Whether recommended-field and value-range warnings are collected.
    pub include_warnings: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            strict: false,
            include_warnings: true,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_warnings(mut self, include_warnings: bool) -> Self {
        self.include_warnings = include_warnings;
        self
    }
}

/// The outcome of validating one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff `errors` is empty.
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Valid and without warnings.
    pub fn is_clean(&self) -> bool {
        self.valid && self.warnings.is_empty()
    }
}

/// Validates XARF JSON text.
///
/// # Errors
///
/// Returns [`Error::ValidationInput`] when the text is not JSON or not a
/// JSON object. An invalid report is not an error.
///
/// # Example
///
/// ```rust
/// use xarfconv::validation::{validate, ValidationOptions};
///
/// let result = validate(r#"{"category": "abuse"}"#, &ValidationOptions::default())?;
/// assert!(!result.valid);
/// assert!(result.errors.contains(&r#"Missing mandatory field: "report_id""#.to_string()));
/// # Ok::<(), xarfconv::Error>(())
/// ```
pub fn validate(input: &str, options: &ValidationOptions) -> Result<ValidationResult, Error> {
    let value: Value = serde_json::from_str(input.trim())
        .map_err(|e| Error::ValidationInput(format!("input is not valid JSON: {}", e)))?;
    validate_value(&value, options)
}

/// Validates an already-parsed JSON value.
///
/// # Errors
///
/// Returns [`Error::ValidationInput`] when the value is not a JSON object.
pub fn validate_value(value: &Value, options: &ValidationOptions) -> Result<ValidationResult, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::ValidationInput("expected a JSON object".to_string()))?;
    Ok(check(object, options))
}

/// Validates a normalized [`Report`] as it would be emitted in XARF.
///
/// # Errors
///
/// Only fails if the report cannot be rendered as JSON.
pub fn validate_report(report: &Report, options: &ValidationOptions) -> Result<ValidationResult, Error> {
    validate_value(&serde_json::to_value(report)?, options)
}

fn check(report: &Map<String, Value>, options: &ValidationOptions) -> ValidationResult {
    if options.strict {
        debug!("strict validation requested; applying the standard rule set");
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // The version may arrive under either name.
    let version = report
        .get("xarf_version")
        .filter(|v| is_truthy(v))
        .or_else(|| report.get("schema_version"));

    for field in MANDATORY_FIELDS {
        let value = match field {
            "xarf_version" => version,
            _ => report.get(field),
        };
        if !value.is_some_and(is_truthy) {
            errors.push(format!("Missing mandatory field: \"{}\"", field));
        }
    }

    if let Some(version) = version.filter(|v| is_truthy(v))
        && !version.as_str().is_some_and(|v| VERSION_RE.is_match(v))
    {
        errors.push("Invalid xarf_version format. Expected: \"X.Y.Z\" (e.g., \"4.0.0\")".to_string());
    }

    if let Some(id) = truthy(report, "report_id")
        && !id.as_str().is_some_and(|id| UUID_V4_RE.is_match(id))
    {
        errors.push("Invalid report_id format. Expected: UUID v4".to_string());
    }

    if let Some(timestamp) = truthy(report, "timestamp")
        && !is_timestamp(timestamp)
    {
        errors.push(
            "Invalid timestamp format. Expected: ISO 8601 (e.g., \"2024-01-15T10:00:00Z\")"
                .to_string(),
        );
    }

    if let Some(reporter) = truthy(report, "reporter") {
        match reporter.as_object() {
            Some(reporter) => {
                if !reporter.get("contact").is_some_and(is_truthy) {
                    errors.push("Missing mandatory field: \"reporter.contact\"".to_string());
                }
            }
            None => errors.push("Field \"reporter\" must be an object".to_string()),
        }
    }

    if let Some(category) = truthy(report, "category")
        && !category.as_str().is_some_and(|c| CATEGORIES.contains(&c))
    {
        errors.push(format!(
            "Invalid category \"{}\". Must be one of: {}",
            display_scalar(category),
            CATEGORIES.join(", ")
        ));
    }

    if options.include_warnings {
        for field in RECOMMENDED_FIELDS {
            if truthy(report, field).is_none() {
                warnings.push(format!("Missing recommended field: \"{}\"", field));
            }
        }

        if let Some(confidence) = report.get("confidence")
            && !confidence
                .as_f64()
                .is_some_and(|c| (0.0..=1.0).contains(&c))
        {
            warnings.push("Field \"confidence\" should be a number between 0 and 1".to_string());
        }

        if let Some(severity) = truthy(report, "severity")
            && !severity.as_str().is_some_and(|s| SEVERITIES.contains(&s))
        {
            warnings.push(format!(
                "Field \"severity\" should be one of: {}",
                SEVERITIES.join(", ")
            ));
        }
    }

    ValidationResult::from_findings(errors, warnings)
}

fn truthy<'a>(report: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    report.get(field).filter(|v| is_truthy(v))
}

/// JSON truthiness: `null`, `false`, zero and the empty string are falsy;
/// every object and array is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Accepts RFC 3339, RFC 2822, a naive date-time, a plain date, or a
/// numeric epoch in milliseconds.
fn is_timestamp(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        Value::String(s) => parses_as_date(s.trim()),
        _ => false,
    }
}

fn parses_as_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
