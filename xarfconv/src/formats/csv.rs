//! Support for single-report CSV.
//!
//! A CSV report is a header row and one data row. Only the twelve flat
//! columns are carried; evidence, confidence and tags are dropped.
//! Provides parsing, serialization, and conversion to/from the internal `Report` model.

use std::io::{BufRead, Write};

use log::trace;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    formats::FormatType,
    traits::{Parser, read_to_string},
    types::{Report, Reporter, non_empty},
};

/// The fixed column order of every CSV report this crate writes.
pub const CSV_HEADERS: [&str; 12] = [
    "report_id",
    "timestamp",
    "category",
    "type",
    "source_identifier",
    "source_port",
    "destination_identifier",
    "destination_port",
    "severity",
    "reporter_org",
    "reporter_contact",
    "description",
];

/// One CSV report row. Field order matches [`CSV_HEADERS`].
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    pub report_id: String,
    pub timestamp: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source_identifier: String,
    pub source_port: Option<u16>,
    pub destination_identifier: Option<String>,
    pub destination_port: Option<u16>,
    pub severity: Option<String>,
    pub reporter_org: Option<String>,
    pub reporter_contact: Option<String>,
    pub description: Option<String>,
}

impl Parser for CsvRecord {
    /// Parse a header row followed by one data row.
    ///
    /// Headers are matched case-insensitively; `source_ip` and
    /// `destination_ip` are accepted as aliases. Unknown columns are ignored
    /// and rows after the first data row are not read.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let content = read_to_string(reader)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(trim_blank_lines(&content).as_bytes());

        let mut rows = rdr.records();
        let (headers, values) = match (rows.next(), rows.next()) {
            (Some(headers), Some(values)) => (headers.map_err(csv_parse)?, values.map_err(csv_parse)?),
            _ => {
                return Err(Error::parse(
                    FormatType::Csv,
                    "CSV must contain header and at least one data row",
                ));
            }
        };

        if headers.len() != values.len() {
            return Err(Error::parse(
                FormatType::Csv,
                format!(
                    "CSV header and data row have different lengths ({} vs {})",
                    headers.len(),
                    values.len()
                ),
            ));
        }

        let mut record = CsvRecord::default();
        for (header, value) in headers.iter().zip(values.iter()) {
            match header.trim().to_ascii_lowercase().as_str() {
                "report_id" => record.report_id = value.to_string(),
                "timestamp" => record.timestamp = value.to_string(),
                "category" => record.category = value.to_string(),
                "type" => record.kind = value.to_string(),
                "source_identifier" | "source_ip" => record.source_identifier = value.to_string(),
                "source_port" => record.source_port = parse_port(value),
                "destination_identifier" | "destination_ip" => {
                    record.destination_identifier = non_empty(value)
                }
                "destination_port" => record.destination_port = parse_port(value),
                "severity" => record.severity = non_empty(value),
                "reporter_org" => record.reporter_org = non_empty(value),
                "reporter_contact" => record.reporter_contact = non_empty(value),
                "description" => record.description = non_empty(value),
                other => trace!("ignoring unknown CSV column `{}`", other),
            }
        }
        Ok(record)
    }

    /// Write the fixed header and exactly one data row, without a trailing newline.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());
        wtr.serialize(self)?;
        let buf = wtr
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;

        let text = String::from_utf8_lossy(&buf);
        writer.write_all(text.trim_end_matches('\n').as_bytes())?;
        Ok(())
    }
}

/// Drops leading whitespace and trailing blank lines. Spaces that end the
/// last row belong to its final field and are kept.
fn trim_blank_lines(content: &str) -> &str {
    let mut text = content.trim_start();
    loop {
        let trimmed = text.trim_end_matches(['\r', '\n']);
        match trimmed.rfind('\n') {
            Some(at) if trimmed[at + 1..].trim().is_empty() => text = &trimmed[..at],
            _ => return trimmed,
        }
    }
}

fn csv_parse(e: csv::Error) -> Error {
    Error::parse(FormatType::Csv, e.to_string())
}

fn parse_port(value: &str) -> Option<u16> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let port = value.parse().ok();
    if port.is_none() {
        log::warn!("ignoring unusable CSV port value `{}`", value);
    }
    port
}

impl From<CsvRecord> for Report {
    fn from(value: CsvRecord) -> Self {
        Report {
            report_id: value.report_id,
            timestamp: value.timestamp,
            category: value.category,
            kind: value.kind,
            source_identifier: value.source_identifier,
            source_port: value.source_port,
            destination_identifier: value.destination_identifier,
            destination_port: value.destination_port,
            severity: value.severity,
            description: value.description,
            reporter: Reporter {
                org: value.reporter_org,
                contact: value.reporter_contact,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl From<&Report> for CsvRecord {
    fn from(value: &Report) -> Self {
        CsvRecord {
            report_id: value.report_id.clone(),
            timestamp: value.timestamp.clone(),
            category: value.category.clone(),
            kind: value.kind.clone(),
            source_identifier: value.source_identifier.clone(),
            source_port: value.source_port,
            destination_identifier: value.destination_identifier.clone(),
            destination_port: value.destination_port,
            severity: value.severity.clone(),
            reporter_org: value.reporter.org.clone(),
            reporter_contact: value.reporter.contact.clone(),
            description: value.description.clone(),
        }
    }
}
