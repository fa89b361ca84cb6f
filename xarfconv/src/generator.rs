//! Generation of sample XARF reports for testing downstream tooling.

use log::debug;
use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

use crate::{
    error::Error,
    evidence::{HASH_ALGORITHM, sha256_hex},
    types::{Evidence, OnBehalfOf, Report, Reporter, SCHEMA_VERSION, Severity, now_timestamp},
};

/// Event types per category, in presentation order.
pub const EVENT_TYPES: &[(&str, &[&str])] = &[
    ("abuse", &["ddos", "malware", "phishing", "spam", "scanner"]),
    ("vulnerability", &["cve", "misconfiguration", "open_service"]),
    (
        "connection",
        &["compromised", "botnet", "malicious_traffic", "ddos", "port_scan", "login_attack"],
    ),
    (
        "content",
        &["illegal", "malicious", "policy_violation", "phishing", "malware", "fraud"],
    ),
    ("copyright", &["infringement", "dmca", "trademark", "p2p", "cyberlocker"]),
    ("messaging", &["bulk_messaging", "spam"]),
    ("reputation", &["blocklist", "threat_intelligence"]),
    ("infrastructure", &["botnet", "compromised_server"]),
];

const TYPE_DESCRIPTIONS: &[(&str, &str, &str)] = &[
    ("abuse", "ddos", "DDoS attack detected from this IP address"),
    ("abuse", "malware", "Malware distribution or command and control activity detected"),
    ("abuse", "phishing", "Phishing site or credential theft attempt identified"),
    ("abuse", "spam", "Unsolicited bulk email originating from this source"),
    ("abuse", "scanner", "Port scanning or network reconnaissance activity detected"),
    ("vulnerability", "cve", "Known CVE vulnerability detected on this system"),
    ("vulnerability", "misconfiguration", "Security misconfiguration identified"),
    ("vulnerability", "open_service", "Unintended publicly accessible service detected"),
    ("connection", "compromised", "Indicators of compromised system detected"),
    ("connection", "botnet", "Botnet membership or C&C communication identified"),
    ("connection", "malicious_traffic", "Suspicious or malicious network traffic observed"),
    ("connection", "ddos", "Participation in distributed denial of service attack"),
    ("connection", "port_scan", "Systematic port scanning activity detected"),
    ("connection", "login_attack", "Brute force or credential stuffing attack detected"),
    ("content", "illegal", "Illegal content hosted or distributed"),
    ("content", "malicious", "Malicious content distribution detected"),
    ("content", "policy_violation", "Content violates acceptable use policy"),
    ("content", "phishing", "Phishing content or credential theft page"),
    ("content", "malware", "Malware hosting or distribution"),
    ("content", "fraud", "Fraudulent content or scam activity"),
    ("copyright", "infringement", "Copyright infringement detected"),
    ("copyright", "dmca", "DMCA takedown notice issued"),
    ("copyright", "trademark", "Trademark infringement identified"),
    ("copyright", "p2p", "Peer-to-peer copyright infringement"),
    ("copyright", "cyberlocker", "Unauthorized file sharing or hosting"),
    ("messaging", "bulk_messaging", "Unsolicited bulk messaging activity"),
    ("messaging", "spam", "Spam messaging or robocall activity"),
    ("reputation", "blocklist", "Added to security blocklist"),
    ("reputation", "threat_intelligence", "Identified as threat source by intelligence feeds"),
    ("infrastructure", "botnet", "Botnet infrastructure component identified"),
    ("infrastructure", "compromised_server", "Compromised server or infrastructure detected"),
];

const EVIDENCE_TYPES: &[(&str, &[&str])] = &[
    ("abuse", &["pcap", "log", "screenshot"]),
    ("vulnerability", &["scan_result", "log", "screenshot"]),
    ("connection", &["pcap", "log", "netflow"]),
    ("content", &["screenshot", "url", "sample"]),
    ("copyright", &["url", "screenshot", "document"]),
    ("messaging", &["message", "log", "sample"]),
    ("reputation", &["threat_feed", "log", "report"]),
    ("infrastructure", &["pcap", "log", "dns_record"]),
];

const CATEGORY_TAGS: &[(&str, &[&str])] = &[
    ("abuse", &["security", "incident"]),
    ("vulnerability", &["security", "disclosure"]),
    ("connection", &["network", "suspicious"]),
    ("content", &["abuse", "violation"]),
    ("copyright", &["legal", "dmca"]),
    ("messaging", &["spam", "abuse"]),
    ("reputation", &["threat-intel", "blocklist"]),
    ("infrastructure", &["network", "infrastructure"]),
];

/// Base64 payloads used as inline evidence data.
const EVIDENCE_PAYLOADS: [&str; 4] = [
    "VGhpcyBpcyBhIHNhbXBsZSBldmlkZW5jZSBwYXlsb2Fk",
    "U2FtcGxlIG5ldHdvcmsgdHJhZmZpYyBjYXB0dXJl",
    "TG9nIGZpbGUgZXh0cmFjdCB3aXRoIHN1c3BpY2lvdXMgYWN0aXZpdHk=",
    "QmluYXJ5IGRhdGEgZnJvbSBtYWx3YXJlIHNhbXBsZQ==",
];

const TARGET_PORTS: [u16; 4] = [53, 80, 443, 8080];

/// What to generate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub category: String,
    pub kind: String,
    pub source_identifier: String,
    pub reporter_org: Option<String>,
    pub reporter_contact: String,
    /// The organization the reporter files for.
    pub on_behalf_of: Option<OnBehalfOf>,
    /// Attach one evidence item with an inline payload.
    pub include_evidence: bool,
    /// Fill severity, confidence, tags and a destination.
    pub include_optional: bool,
}

impl GenerateOptions {
    pub fn new(
        category: impl Into<String>,
        kind: impl Into<String>,
        source_identifier: impl Into<String>,
        reporter_contact: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            kind: kind.into(),
            source_identifier: source_identifier.into(),
            reporter_contact: reporter_contact.into(),
            ..Default::default()
        }
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.reporter_org = Some(org.into());
        self
    }

    /// Files the report for `org`. A blank `org` leaves the option unset.
    pub fn with_on_behalf_of(mut self, org: &str, contact: Option<&str>) -> Self {
        self.on_behalf_of = OnBehalfOf::new(org, contact);
        self
    }

    pub fn with_evidence(mut self, include: bool) -> Self {
        self.include_evidence = include;
        self
    }

    pub fn with_optional(mut self, include: bool) -> Self {
        self.include_optional = include;
        self
    }
}

/// The event types known for `category`, or an empty slice.
pub fn event_types(category: &str) -> &'static [&'static str] {
    lookup(EVENT_TYPES, category).unwrap_or(&[])
}

/// The canned description for a category/type pair.
pub fn type_description(category: &str, kind: &str) -> Option<&'static str> {
    TYPE_DESCRIPTIONS
        .iter()
        .find(|(c, k, _)| *c == category && *k == kind)
        .map(|(_, _, d)| *d)
}

/// Generates a report using the thread-local RNG.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] when the source identifier or the
/// reporter contact is blank.
///
/// # Example
///
/// ```rust
/// use xarfconv::generator::{generate_report, GenerateOptions};
///
/// let options = GenerateOptions::new("abuse", "spam", "192.0.2.7", "abuse@example.com");
/// let report = generate_report(&options)?;
/// assert_eq!(report.description.as_deref(), Some("Unsolicited bulk email originating from this source"));
/// # Ok::<(), xarfconv::Error>(())
/// ```
pub fn generate_report(options: &GenerateOptions) -> Result<Report, Error> {
    generate_report_with_rng(options, &mut rand::thread_rng())
}

/// Like [`generate_report`], drawing every random choice from `rng`.
pub fn generate_report_with_rng<R: Rng + ?Sized>(
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<Report, Error> {
    let source = options.source_identifier.trim();
    if source.is_empty() {
        return Err(Error::invalid_request("source identifier is required"));
    }
    let contact = options.reporter_contact.trim();
    if contact.is_empty() {
        return Err(Error::invalid_request("reporter contact is required"));
    }
    if !event_types(&options.category).contains(&options.kind.as_str()) {
        debug!(
            "generating report with unlisted type `{}` for category `{}`",
            options.kind, options.category
        );
    }

    let mut report = Report {
        schema_version: SCHEMA_VERSION.to_string(),
        report_id: Uuid::new_v4().to_string(),
        timestamp: now_timestamp(),
        category: options.category.clone(),
        kind: options.kind.clone(),
        source_identifier: source.to_string(),
        description: type_description(&options.category, &options.kind).map(str::to_string),
        reporter: Reporter {
            org: options
                .reporter_org
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string),
            contact: Some(contact.to_string()),
            on_behalf_of: options.on_behalf_of.clone(),
        },
        ..Default::default()
    };

    if options.include_evidence {
        report.evidence.push(sample_evidence(&options.category, &options.kind, rng));
    }

    if options.include_optional {
        report.severity = Severity::ALL.choose(rng).map(|s| s.as_str().to_string());
        report.confidence = Some(confidence(rng));
        report.tags = tags(&options.category, &options.kind);
        report.destination_identifier = Some(format!("203.0.113.{}", rng.gen_range(0..=255u8)));
        report.destination_port = TARGET_PORTS.choose(rng).copied();
    }

    Ok(report)
}

fn sample_evidence<R: Rng + ?Sized>(category: &str, kind: &str, rng: &mut R) -> Evidence {
    let kinds = lookup(EVIDENCE_TYPES, category).unwrap_or(&["log"]);
    let payload = EVIDENCE_PAYLOADS.choose(rng).copied().unwrap_or(EVIDENCE_PAYLOADS[0]);
    Evidence {
        kind: kinds.choose(rng).copied().unwrap_or("log").to_string(),
        description: Some(format!("Evidence showing {} activity", display_name(kind))),
        hash: Some(sha256_hex(payload.as_bytes())),
        hash_algorithm: Some(HASH_ALGORITHM.to_string()),
        data: Some(payload.to_string()),
        ..Default::default()
    }
}

/// A confidence score in [0.70, 0.99], two decimals.
fn confidence<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw: f64 = 0.7 + rng.r#gen::<f64>() * 0.29;
    (raw * 100.0).round() / 100.0
}

fn tags(category: &str, kind: &str) -> Vec<String> {
    [category, kind]
        .into_iter()
        .chain(lookup(CATEGORY_TAGS, category).unwrap_or(&[]).iter().copied())
        .map(str::to_string)
        .collect()
}

/// `login_attack` → `Login Attack`.
fn display_name(kind: &str) -> String {
    kind.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn lookup(
    table: &'static [(&'static str, &'static [&'static str])],
    key: &str,
) -> Option<&'static [&'static str]> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}
