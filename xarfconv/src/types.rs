//! Core, format-agnostic types for xarfconv.
//! Readers decode into these; writers and the validator only borrow them.

use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The XARF schema version stamped on every report this crate produces.
pub const SCHEMA_VERSION: &str = "4.0.0";

/// The normalized abuse report every format converts through.
///
/// Field order here is the field order of the emitted XARF JSON.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Report {
    #[serde(alias = "xarf_version")]
    pub schema_version: String,

    pub report_id: String,

    pub timestamp: String,

    pub category: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub source_identifier: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub source_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub destination_identifier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub destination_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub severity: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,

    /// Always present, possibly empty.
    #[serde(default)]
    pub reporter: Reporter,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub evidence: Vec<Evidence>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub confidence: Option<f64>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for Report {
    fn default() -> Self {
        Report {
            schema_version: SCHEMA_VERSION.to_string(),
            report_id: String::new(),
            timestamp: String::new(),
            category: String::new(),
            kind: String::new(),
            source_identifier: String::new(),
            source_port: None,
            destination_identifier: None,
            destination_port: None,
            severity: None,
            description: None,
            reporter: Reporter::default(),
            evidence: Vec::new(),
            confidence: None,
            tags: Vec::new(),
        }
    }
}

impl Report {
    /// Parses `severity` into the fixed enumeration, if it is one of the known levels.
    pub fn severity_level(&self) -> Option<Severity> {
        self.severity.as_deref().and_then(|s| s.parse().ok())
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Report {{ id: {}, category: {}, type: {}, source: {} }}",
            self.report_id, self.category, self.kind, self.source_identifier
        )
    }
}

/// Who filed the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Reporter {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub org: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact: Option<String>,

    /// Set when the reporter files for another organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub on_behalf_of: Option<OnBehalfOf>,
}

impl Reporter {
    pub fn is_empty(&self) -> bool {
        self.org.is_none() && self.contact.is_none() && self.on_behalf_of.is_none()
    }
}

/// The organization a report is filed for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OnBehalfOf {
    pub org: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub contact: Option<String>,
}

impl OnBehalfOf {
    /// Builds the entry from raw input. A blank `org` yields `None`; a blank
    /// `contact` is dropped.
    pub fn new(org: &str, contact: Option<&str>) -> Option<Self> {
        let org = org.trim();
        if org.is_empty() {
            return None;
        }
        Some(OnBehalfOf {
            org: org.to_string(),
            contact: contact
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }
}

/// A single piece of evidence attached to a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Evidence {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub hash_algorithm: Option<String>,

    /// Inline payload, usually base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Report severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(Error::invalid_request(format!(
                "unknown severity `{}`",
                other
            ))),
        }
    }
}

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Treats empty strings as absent.
pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    if value.is_empty() { None } else { Some(value) }
}
