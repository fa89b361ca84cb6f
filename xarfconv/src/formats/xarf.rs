//! Support for XARF JSON, the hub format.
//!
//! Reading is lenient: recognized top-level fields are copied into the
//! [`Report`], loosely typed values (ports as strings, numbers as
//! identifiers) are coerced, and everything else is dropped. Writing emits
//! pretty-printed JSON in the fixed field order of [`Report`].

use std::io::{BufRead, Write};

use log::{trace, warn};
use serde_json::{Map, Value};

use crate::{
    error::Error,
    formats::FormatType,
    traits::{Parser, read_to_string},
    types::{Evidence, OnBehalfOf, Report, Reporter, SCHEMA_VERSION, non_empty},
};

/// Top-level keys this reader understands; anything else is dropped.
const KNOWN_FIELDS: &[&str] = &[
    "schema_version",
    "xarf_version",
    "report_id",
    "timestamp",
    "category",
    "type",
    "source_identifier",
    "source_port",
    "destination_identifier",
    "destination_port",
    "severity",
    "description",
    "reporter",
    "evidence",
    "confidence",
    "tags",
];

impl Parser for Report {
    /// Parse XARF JSON text.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let content = read_to_string(reader)?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| Error::parse(FormatType::Xarf, e.to_string()))?;
        from_value(&value)
    }

    /// Write pretty-printed XARF JSON (2-space indentation).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// Builds a [`Report`] from an already-parsed JSON value.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the value is not a JSON object.
pub fn from_value(value: &Value) -> Result<Report, Error> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::parse(FormatType::Xarf, "expected a JSON object at the top level"))?;

    for key in object.keys().filter(|k| !KNOWN_FIELDS.contains(&k.as_str())) {
        trace!("dropping unrecognized XARF field `{}`", key);
    }

    Ok(Report {
        schema_version: string_field(object, "schema_version")
            .or_else(|| string_field(object, "xarf_version"))
            .unwrap_or_else(|| SCHEMA_VERSION.to_string()),
        report_id: string_field(object, "report_id").unwrap_or_default(),
        timestamp: string_field(object, "timestamp").unwrap_or_default(),
        category: string_field(object, "category").unwrap_or_default(),
        kind: string_field(object, "type").unwrap_or_default(),
        source_identifier: string_field(object, "source_identifier").unwrap_or_default(),
        source_port: port_field(object, "source_port"),
        destination_identifier: string_field(object, "destination_identifier").and_then(non_empty),
        destination_port: port_field(object, "destination_port"),
        severity: string_field(object, "severity").and_then(non_empty),
        description: string_field(object, "description").and_then(non_empty),
        reporter: object
            .get("reporter")
            .and_then(Value::as_object)
            .map(reporter_from_object)
            .unwrap_or_default(),
        evidence: match object.get("evidence") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(evidence_from_object)
                .collect(),
            Some(Value::Object(item)) => vec![evidence_from_object(item)],
            _ => Vec::new(),
        },
        confidence: object.get("confidence").and_then(Value::as_f64),
        tags: object
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
    })
}

fn reporter_from_object(object: &Map<String, Value>) -> Reporter {
    Reporter {
        org: string_field(object, "org").and_then(non_empty),
        contact: string_field(object, "contact").and_then(non_empty),
        on_behalf_of: object
            .get("on_behalf_of")
            .and_then(Value::as_object)
            .and_then(|o| {
                let org = string_field(o, "org")?;
                OnBehalfOf::new(&org, string_field(o, "contact").as_deref())
            }),
    }
}

fn evidence_from_object(object: &Map<String, Value>) -> Evidence {
    Evidence {
        kind: string_field(object, "type").unwrap_or_default(),
        description: string_field(object, "description").and_then(non_empty),
        hash: string_field(object, "hash").and_then(non_empty),
        hash_algorithm: string_field(object, "hash_algorithm").and_then(non_empty),
        data: string_field(object, "data").and_then(non_empty),
        filename: string_field(object, "filename").and_then(non_empty),
        size: match object.get("size") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        },
        content_type: string_field(object, "content_type").and_then(non_empty),
    }
}

/// Reads a scalar as a string. Numbers and booleans are rendered; null,
/// arrays and objects count as absent.
fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn port_field(object: &Map<String, Value>, key: &str) -> Option<u16> {
    let value = object.get(key)?;
    let port = match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) if s.trim().is_empty() => return None,
        Value::String(s) => s.trim().parse().ok(),
        Value::Null => return None,
        _ => None,
    };
    if port.is_none() {
        warn!("ignoring unusable `{}` value: {}", key, value);
    }
    port
}
