//! Support for a minimal subset of IODEF (RFC 7970).
//!
//! Reading extracts a handful of elements by pattern and is not a general
//! XML parser: anything that does not match is left at its default.
//! Writing produces a small, well-formed `IODEF-Document` with quick-xml.

use std::io::{BufRead, Write};

use lazy_static::lazy_static;
use quick_xml::{
    Writer,
    escape::unescape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use regex::Regex;

use crate::{
    error::Error,
    traits::{Parser, read_to_string},
    types::{Report, Reporter, now_timestamp},
};

pub const IODEF_NAMESPACE: &str = "urn:ietf:params:xml:ns:iodef-2.0";

lazy_static! {
    static ref INCIDENT_ID_REGEX: Regex =
        Regex::new(r"<IncidentID[^>]*>([^<]+)</IncidentID>").unwrap();
    static ref START_TIME_REGEX: Regex = Regex::new(r"<StartTime>([^<]+)</StartTime>").unwrap();
    static ref IMPACT_REGEX: Regex =
        Regex::new(r#"<Impact type="([^"]+)" severity="([^"]+)""#).unwrap();
    static ref ADDRESS_REGEX: Regex = Regex::new(r"<Address[^>]*>([^<]+)</Address>").unwrap();
    static ref CONTACT_NAME_REGEX: Regex =
        Regex::new(r"<ContactName>([^<]+)</ContactName>").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"<Email>([^<]+)</Email>").unwrap();
}

/// An IODEF incident, reduced to what a report carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IodefDocument {
    pub incident_id: Option<String>,
    /// `name` attribute of `IncidentID`, the issuing organization.
    pub incident_name: Option<String>,
    pub start_time: Option<String>,
    pub description: Option<String>,
    pub impact: Option<Impact>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub source: Option<FlowSystem>,
    pub target: Option<FlowSystem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Impact {
    pub kind: String,
    pub severity: String,
}

/// One `System` inside `EventData/Flow`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowSystem {
    pub address: String,
    pub port: Option<u16>,
}

impl Parser for IodefDocument {
    /// Extract the known elements. Never fails on malformed XML.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let content = read_to_string(reader)?;
        let capture = |regex: &Regex| -> Option<String> {
            regex
                .captures(&content)
                .and_then(|c| c.get(1))
                .map(|m| unescape_text(m.as_str()))
        };

        Ok(IodefDocument {
            incident_id: capture(&INCIDENT_ID_REGEX),
            incident_name: None,
            start_time: capture(&START_TIME_REGEX),
            description: None,
            impact: IMPACT_REGEX.captures(&content).map(|c| Impact {
                kind: unescape_text(&c[1]),
                severity: unescape_text(&c[2]),
            }),
            contact_name: capture(&CONTACT_NAME_REGEX),
            email: capture(&EMAIL_REGEX),
            source: capture(&ADDRESS_REGEX).map(|address| FlowSystem {
                address,
                port: None,
            }),
            target: None,
        })
    }

    /// Write an `IODEF-Document` with two-space indentation.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut document = BytesStart::new("IODEF-Document");
        document.push_attribute(("version", "2.0"));
        document.push_attribute(("xmlns", IODEF_NAMESPACE));
        xml_writer.write_event(Event::Start(document))?;

        let mut incident = BytesStart::new("Incident");
        incident.push_attribute(("purpose", "reporting"));
        xml_writer.write_event(Event::Start(incident))?;

        let mut incident_id = BytesStart::new("IncidentID");
        incident_id.push_attribute((
            "name",
            self.incident_name.as_deref().unwrap_or("reporter.example"),
        ));
        write_text_element(
            &mut xml_writer,
            incident_id,
            self.incident_id.as_deref().unwrap_or("unknown"),
        )?;
        write_text_element(
            &mut xml_writer,
            BytesStart::new("StartTime"),
            self.start_time.as_deref().unwrap_or_default(),
        )?;
        write_text_element(
            &mut xml_writer,
            BytesStart::new("Description"),
            &format!(
                "XARF Report: {}",
                self.description
                    .as_deref()
                    .unwrap_or("No description provided")
            ),
        )?;

        xml_writer.write_event(Event::Start(BytesStart::new("Assessment")))?;
        let mut impact = BytesStart::new("Impact");
        let (kind, severity) = self
            .impact
            .as_ref()
            .map(|i| (i.kind.as_str(), i.severity.as_str()))
            .unwrap_or(("unknown", "medium"));
        impact.push_attribute(("type", kind));
        impact.push_attribute(("severity", severity));
        xml_writer.write_event(Event::Empty(impact))?;
        xml_writer.write_event(Event::End(BytesEnd::new("Assessment")))?;

        let mut contact = BytesStart::new("Contact");
        contact.push_attribute(("type", "reporter"));
        xml_writer.write_event(Event::Start(contact))?;
        write_text_element(
            &mut xml_writer,
            BytesStart::new("ContactName"),
            self.contact_name
                .as_deref()
                .unwrap_or("Unknown Organization"),
        )?;
        write_text_element(
            &mut xml_writer,
            BytesStart::new("Email"),
            self.email.as_deref().unwrap_or("unknown@example.com"),
        )?;
        xml_writer.write_event(Event::End(BytesEnd::new("Contact")))?;

        xml_writer.write_event(Event::Start(BytesStart::new("EventData")))?;
        xml_writer.write_event(Event::Start(BytesStart::new("Flow")))?;
        let unknown_source = FlowSystem {
            address: "unknown".to_string(),
            port: None,
        };
        write_system(
            &mut xml_writer,
            "source",
            self.source.as_ref().unwrap_or(&unknown_source),
        )?;
        if let Some(target) = &self.target {
            write_system(&mut xml_writer, "target", target)?;
        }
        xml_writer.write_event(Event::End(BytesEnd::new("Flow")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("EventData")))?;

        xml_writer.write_event(Event::End(BytesEnd::new("Incident")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("IODEF-Document")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    start: BytesStart,
    text: &str,
) -> Result<(), Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    xml_writer.write_event(Event::Start(start))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_system<W: Write>(
    xml_writer: &mut Writer<W>,
    category: &str,
    system: &FlowSystem,
) -> Result<(), Error> {
    let mut start = BytesStart::new("System");
    start.push_attribute(("category", category));
    xml_writer.write_event(Event::Start(start))?;
    xml_writer.write_event(Event::Start(BytesStart::new("Node")))?;

    let mut address = BytesStart::new("Address");
    address.push_attribute(("category", "ipv4-addr"));
    write_text_element(xml_writer, address, &system.address)?;

    if let Some(port) = system.port {
        xml_writer.write_event(Event::Start(BytesStart::new("Service")))?;
        write_text_element(xml_writer, BytesStart::new("Port"), &port.to_string())?;
        xml_writer.write_event(Event::End(BytesEnd::new("Service")))?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("Node")))?;
    xml_writer.write_event(Event::End(BytesEnd::new("System")))?;
    Ok(())
}

/// Resolves XML entities; text with a broken entity is kept verbatim.
fn unescape_text(raw: &str) -> String {
    unescape(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

impl From<IodefDocument> for Report {
    fn from(value: IodefDocument) -> Self {
        let (kind, severity) = match value.impact {
            Some(impact) => (impact.kind, Some(impact.severity)),
            None => ("unknown".to_string(), None),
        };
        Report {
            report_id: value.incident_id.unwrap_or_default(),
            timestamp: value.start_time.unwrap_or_else(now_timestamp),
            category: "incident".to_string(),
            kind,
            severity,
            source_identifier: value
                .source
                .as_ref()
                .map(|s| s.address.clone())
                .unwrap_or_default(),
            reporter: Reporter {
                org: value.contact_name,
                contact: value.email,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

impl From<&Report> for IodefDocument {
    fn from(value: &Report) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        IodefDocument {
            incident_id: non_empty(&value.report_id),
            incident_name: value.reporter.org.clone(),
            start_time: Some(non_empty(&value.timestamp).unwrap_or_else(now_timestamp)),
            description: value.description.clone(),
            impact: Some(Impact {
                kind: non_empty(&value.kind).unwrap_or_else(|| "unknown".to_string()),
                severity: value
                    .severity
                    .clone()
                    .unwrap_or_else(|| "medium".to_string()),
            }),
            contact_name: value.reporter.org.clone(),
            email: value.reporter.contact.clone(),
            source: non_empty(&value.source_identifier).map(|address| FlowSystem {
                address,
                port: value.source_port,
            }),
            target: value
                .destination_identifier
                .as_ref()
                .map(|address| FlowSystem {
                    address: address.clone(),
                    port: value.destination_port,
                }),
        }
    }
}
