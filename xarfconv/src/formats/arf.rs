//! Support for the Abuse Reporting Format (RFC 5965 style `multipart/report`).
//!
//! Reading is a line scan, not a MIME parser: once the
//! `Content-Type: message/feedback-report` line has been seen every later
//! `Key: value` line is a candidate feedback field. A `From:` header anywhere
//! also sets the reporter contact, and because the scan is never reset the
//! last of `From:` / `Reported-From:` wins.

use std::io::{BufRead, Write};

use chrono::Utc;
use indoc::indoc;
use log::trace;
use rand::Rng;

use crate::{
    error::Error,
    traits::{Parser, read_to_string},
    types::{Report, Reporter, now_timestamp},
};

/// ARF `Feedback-Type` → XARF category. Unknown types map to `abuse`.
pub const ARF_TO_XARF_CATEGORY: &[(&str, &str)] = &[
    ("abuse", "abuse"),
    ("fraud", "fraud"),
    ("virus", "malware"),
    ("other", "abuse"),
];

/// XARF category → ARF `Feedback-Type`. Unknown categories map to `other`.
pub const XARF_TO_ARF_FEEDBACK_TYPE: &[(&str, &str)] = &[
    ("abuse", "abuse"),
    ("fraud", "fraud"),
    ("legal", "other"),
    ("policy", "abuse"),
    ("malware", "virus"),
    ("security", "abuse"),
];

const FEEDBACK_REPORT_CONTENT_TYPE: &str = "Content-Type: message/feedback-report";
const USER_AGENT: &str = concat!("xarfconv/", env!("CARGO_PKG_VERSION"));

/// Maps an ARF feedback type to a XARF category.
pub fn category_from_feedback_type(feedback_type: &str) -> &'static str {
    lookup(ARF_TO_XARF_CATEGORY, feedback_type).unwrap_or("abuse")
}

/// Maps a XARF category to an ARF feedback type.
pub fn feedback_type_from_category(category: &str) -> &'static str {
    lookup(XARF_TO_ARF_FEEDBACK_TYPE, category).unwrap_or("other")
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// An ARF message, reduced to what a report carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackReport {
    /// MIME boundary; empty for parsed messages.
    pub boundary: String,
    /// `Date:` header value; empty for parsed messages.
    pub date: String,
    pub feedback_type: Option<String>,
    pub incident_id: Option<String>,
    pub arrival_date: Option<String>,
    pub source_ip: Option<String>,
    pub source_port: Option<u16>,
    pub destination_ip: Option<String>,
    pub destination_port: Option<u16>,
    /// Resolved reporter address: the last `From:` or `Reported-From:` line seen.
    pub reporter_contact: Option<String>,
    /// Human-readable part; only filled when writing.
    pub summary: Summary,
}

/// The `text/plain` part of an outgoing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub category: String,
    pub kind: String,
    pub description: Option<String>,
    pub reporter_org: Option<String>,
}

impl Parser for FeedbackReport {
    /// Scan an ARF message. Never fails on malformed content.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let content = read_to_string(reader)?;
        let mut report = FeedbackReport::default();
        let mut in_feedback_report = false;

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.contains(FEEDBACK_REPORT_CONTENT_TYPE) {
                in_feedback_report = true;
                continue;
            }

            if trimmed.starts_with("--") {
                continue;
            }

            if in_feedback_report && let Some((key, value)) = trimmed.split_once(':') {
                let value = value.trim().to_string();
                match key.trim() {
                    "Feedback-Type" => report.feedback_type = Some(value),
                    "Incident-ID" => report.incident_id = Some(value),
                    "Arrival-Date" => report.arrival_date = Some(value),
                    "Source-IP" => report.source_ip = Some(value),
                    "Source-Port" => report.source_port = value.parse().ok(),
                    "Destination-IP" => report.destination_ip = Some(value),
                    "Destination-Port" => report.destination_port = value.parse().ok(),
                    "Reported-From" => report.reporter_contact = Some(value),
                    other => trace!("skipping feedback field `{}`", other),
                }
            }

            if let Some(from) = trimmed.strip_prefix("From:") {
                report.reporter_contact = Some(from.trim().to_string());
            }
        }

        Ok(report)
    }

    /// Write a complete `multipart/report` message.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let contact = self.reporter_contact.as_deref();
        let mut content = format!(
            indoc! {"
            MIME-Version: 1.0
            From: {from}
            To: abuse@target.example
            Subject: Abuse Report - {subject}
            Date: {date}
            Content-Type: multipart/report; report-type=feedback-report;
                boundary=\"{boundary}\"

            --{boundary}
            Content-Type: text/plain; charset=\"UTF-8\"

            This is an automated abuse report.

            Classification: {category}
            Type: {kind}
            Source: {source}
            "},
            from = contact.unwrap_or("abuse@reporter.example"),
            subject = non_blank(&self.summary.kind).unwrap_or("incident"),
            date = self.date,
            boundary = self.boundary,
            category = non_blank(&self.summary.category).unwrap_or("unknown"),
            kind = non_blank(&self.summary.kind).unwrap_or("unknown"),
            source = self.source_ip.as_deref().unwrap_or("unknown"),
        );

        if let Some(description) = &self.summary.description {
            content.push_str(&format!("\nDescription: {}\n", description));
        }

        content.push_str(&format!(
            indoc! {"

            Reporter: {org}

            --{boundary}
            Content-Type: message/feedback-report

            Feedback-Type: {feedback_type}
            User-Agent: {user_agent}
            Version: 1.0
            Incident-ID: {incident_id}
            Arrival-Date: {arrival_date}
            Source-IP: {source}
            "},
            org = self.summary.reporter_org.as_deref().unwrap_or("Unknown Organization"),
            boundary = self.boundary,
            feedback_type = self.feedback_type.as_deref().unwrap_or("other"),
            user_agent = USER_AGENT,
            incident_id = self.incident_id.as_deref().unwrap_or("unknown"),
            arrival_date = self.arrival_date.as_deref().unwrap_or_default(),
            source = self.source_ip.as_deref().unwrap_or("unknown"),
        ));

        if let Some(port) = self.source_port {
            content.push_str(&format!("Source-Port: {}\n", port));
        }
        if let Some(ip) = &self.destination_ip {
            content.push_str(&format!("Destination-IP: {}\n", ip));
        }
        if let Some(port) = self.destination_port {
            content.push_str(&format!("Destination-Port: {}\n", port));
        }
        content.push_str(&format!(
            "Reported-From: {}\n\n--{}--\n",
            contact.unwrap_or("unknown"),
            self.boundary
        ));

        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// A fresh MIME boundary, `----=_Part_` followed by nine base-36 characters.
pub fn generate_boundary() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let token: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("----=_Part_{}", token)
}

impl From<FeedbackReport> for Report {
    fn from(value: FeedbackReport) -> Self {
        Report {
            report_id: value.incident_id.unwrap_or_default(),
            timestamp: value.arrival_date.unwrap_or_else(now_timestamp),
            category: value
                .feedback_type
                .as_deref()
                .map(category_from_feedback_type)
                .unwrap_or("abuse")
                .to_string(),
            kind: "unknown".to_string(),
            source_identifier: value.source_ip.unwrap_or_default(),
            source_port: value.source_port,
            destination_identifier: value.destination_ip,
            destination_port: value.destination_port,
            reporter: Reporter {
                org: None,
                contact: value.reporter_contact,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl From<&Report> for FeedbackReport {
    fn from(value: &Report) -> Self {
        FeedbackReport {
            boundary: generate_boundary(),
            date: Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string(),
            feedback_type: Some(feedback_type_from_category(&value.category).to_string()),
            incident_id: non_blank(&value.report_id).map(str::to_string),
            arrival_date: Some(
                non_blank(&value.timestamp)
                    .map(str::to_string)
                    .unwrap_or_else(now_timestamp),
            ),
            source_ip: non_blank(&value.source_identifier).map(str::to_string),
            source_port: value.source_port,
            destination_ip: value.destination_identifier.clone(),
            destination_port: value.destination_port,
            reporter_contact: value.reporter.contact.clone(),
            summary: Summary {
                category: value.category.clone(),
                kind: value.kind.clone(),
                description: value.description.clone(),
                reporter_org: value.reporter.org.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    const SAMPLE: &str = "MIME-Version: 1.0
From: abuse@reporter.example
To: abuse@target.example
Subject: Abuse Report
Content-Type: multipart/report; report-type=feedback-report;
    boundary=\"----=_Part_123\"

------=_Part_123
Content-Type: text/plain

This is an abuse report for DDoS activity from 192.0.2.100

------=_Part_123
Content-Type: message/feedback-report

Feedback-Type: virus
User-Agent: XARF-Converter/1.0
Version: 1.0
Source-IP: 192.0.2.100
Source-Port: 4444
Incident-ID: 550e8400-e29b-41d4-a716-446655440000
Arrival-Date: 2024-01-15T10:00:00Z

------=_Part_123--";

    #[test]
    fn test_parse_feedback_fields() {
        let arf = FeedbackReport::from_str(SAMPLE).unwrap();
        assert_eq!(arf.feedback_type.as_deref(), Some("virus"));
        assert_eq!(arf.source_ip.as_deref(), Some("192.0.2.100"));
        assert_eq!(arf.source_port, Some(4444));
        assert_eq!(arf.reporter_contact.as_deref(), Some("abuse@reporter.example"));

        let report = Report::from(arf);
        assert_eq!(report.category, "malware");
        assert_eq!(report.kind, "unknown");
        assert_eq!(report.report_id, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(report.timestamp, "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_fields_before_feedback_part_are_ignored() {
        let text = "Source-IP: 10.0.0.1\nContent-Type: message/feedback-report\nSource-IP: 10.0.0.2\n";
        let arf = FeedbackReport::from_str(text).unwrap();
        assert_eq!(arf.source_ip.as_deref(), Some("10.0.0.2"));
    }

    #[test]
    fn test_last_from_or_reported_from_wins() {
        let text = "Content-Type: message/feedback-report\nReported-From: first@example.com\nFrom: second@example.com\n";
        let arf = FeedbackReport::from_str(text).unwrap();
        assert_eq!(arf.reporter_contact.as_deref(), Some("second@example.com"));

        let text = "From: second@example.com\nContent-Type: message/feedback-report\nReported-From: first@example.com\n";
        let arf = FeedbackReport::from_str(text).unwrap();
        assert_eq!(arf.reporter_contact.as_deref(), Some("first@example.com"));
    }

    #[test]
    fn test_empty_input_yields_defaults() {
        let report = Report::from(FeedbackReport::from_str("").unwrap());
        assert_eq!(report.category, "abuse");
        assert_eq!(report.kind, "unknown");
        assert_eq!(report.report_id, "");
        assert_eq!(report.source_identifier, "");
        assert!(!report.timestamp.is_empty());
        assert!(report.reporter.is_empty());
    }

    #[test]
    fn test_category_tables() {
        assert_eq!(category_from_feedback_type("abuse"), "abuse");
        assert_eq!(category_from_feedback_type("fraud"), "fraud");
        assert_eq!(category_from_feedback_type("virus"), "malware");
        assert_eq!(category_from_feedback_type("other"), "abuse");
        assert_eq!(category_from_feedback_type("auth-failure"), "abuse");

        assert_eq!(feedback_type_from_category("malware"), "virus");
        assert_eq!(feedback_type_from_category("legal"), "other");
        assert_eq!(feedback_type_from_category("policy"), "abuse");
        assert_eq!(feedback_type_from_category("security"), "abuse");
        assert_eq!(feedback_type_from_category("copyright"), "other");
    }

    #[test]
    fn test_boundary_shape() {
        let boundary = generate_boundary();
        let token = boundary.strip_prefix("----=_Part_").unwrap();
        assert_eq!(token.len(), 9);
        assert!(token.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_write_message_structure() {
        let report = Report {
            report_id: "r-1".into(),
            timestamp: "2024-01-15T10:00:00Z".into(),
            category: "malware".into(),
            kind: "c2".into(),
            source_identifier: "192.0.2.7".into(),
            destination_identifier: Some("203.0.113.9".into()),
            destination_port: Some(443),
            description: Some("beaconing".into()),
            reporter: Reporter {
                org: Some("SOC".into()),
                contact: Some("soc@example.org".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let arf = FeedbackReport::from(&report);
        let text = arf.to_text().unwrap();

        let delimiter = format!("--{}", arf.boundary);
        assert_eq!(text.matches(&delimiter).count(), 3);
        assert!(text.contains(&format!("boundary=\"{}\"", arf.boundary)));
        assert!(text.contains(&format!("{}--", delimiter)));
        assert!(text.contains("Feedback-Type: virus\n"));
        assert!(text.contains("Description: beaconing\n"));
        assert!(text.contains("Reporter: SOC\n"));
        assert!(text.contains("Destination-IP: 203.0.113.9\n"));
        assert!(text.contains("Destination-Port: 443\n"));
        assert!(!text.contains("Source-Port:"));
        assert!(text.contains("Reported-From: soc@example.org\n"));
    }

    #[test]
    fn test_written_message_reads_back() {
        let report = Report {
            report_id: "r-2".into(),
            timestamp: "2024-02-01T00:00:00Z".into(),
            category: "fraud".into(),
            source_identifier: "198.51.100.4".into(),
            source_port: Some(25),
            ..Default::default()
        };
        let text = FeedbackReport::from(&report).to_text().unwrap();
        let back = Report::from(FeedbackReport::from_str(&text).unwrap());
        assert_eq!(back.report_id, "r-2");
        assert_eq!(back.timestamp, "2024-02-01T00:00:00Z");
        assert_eq!(back.category, "fraud");
        assert_eq!(back.source_identifier, "198.51.100.4");
        assert_eq!(back.source_port, Some(25));
        assert_eq!(back.reporter.contact.as_deref(), Some("unknown"));
    }
}
