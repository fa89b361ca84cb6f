//! One well-formed sample report per format, describing the same DDoS incident.

use indoc::indoc;

use crate::formats::FormatType;

const XARF_SAMPLE: &str = indoc! {r#"
    {
      "report_id": "550e8400-e29b-41d4-a716-446655440000",
      "timestamp": "2024-01-15T10:00:00Z",
      "category": "abuse",
      "type": "ddos",
      "source_identifier": "192.0.2.100",
      "source_port": 52311,
      "description": "DDoS attack targeting example.com",
      "reporter": {
        "org": "Security Operations",
        "contact": "abuse@reporter.example"
      },
      "severity": "high",
      "evidence": {
        "type": "pcap",
        "hash": "sha256:abc123...",
        "url": "https://evidence.example/report.pcap"
      }
    }"#};

const ARF_SAMPLE: &str = indoc! {r#"
    MIME-Version: 1.0
    From: abuse@reporter.example
    To: abuse@target.example
    Subject: Abuse Report
    Content-Type: multipart/report; report-type=feedback-report;
        boundary="----=_Part_123"

    ------=_Part_123
    Content-Type: text/plain

    This is an abuse report for DDoS activity from 192.0.2.100

    ------=_Part_123
    Content-Type: message/feedback-report

    Feedback-Type: abuse
    User-Agent: XARF-Converter/1.0
    Version: 1.0
    Source-IP: 192.0.2.100
    Incident-ID: 550e8400-e29b-41d4-a716-446655440000
    Arrival-Date: 2024-01-15T10:00:00Z

    ------=_Part_123--"#};

const CSV_SAMPLE: &str = indoc! {r#"
    report_id,timestamp,category,type,source_identifier,source_port,severity,reporter_org,reporter_contact,description
    550e8400-e29b-41d4-a716-446655440000,2024-01-15T10:00:00Z,abuse,ddos,192.0.2.100,52311,high,Security Operations,abuse@reporter.example,"DDoS attack targeting example.com""#};

const IODEF_SAMPLE: &str = indoc! {r#"
    <?xml version="1.0" encoding="UTF-8"?>
    <IODEF-Document version="2.0">
      <Incident purpose="reporting">
        <IncidentID name="reporter.example">550e8400-e29b-41d4-a716-446655440000</IncidentID>
        <StartTime>2024-01-15T10:00:00Z</StartTime>
        <Assessment>
          <Impact type="ddos" severity="high"/>
        </Assessment>
      </Incident>
    </IODEF-Document>"#};

/// The sample report for `format`.
///
/// # Example
///
/// ```rust
/// use xarfconv::{formats::FormatType, samples::sample};
/// assert!(sample(FormatType::Csv).starts_with("report_id,"));
/// ```
pub fn sample(format: FormatType) -> &'static str {
    match format {
        FormatType::Xarf => XARF_SAMPLE,
        FormatType::Arf => ARF_SAMPLE,
        FormatType::Csv => CSV_SAMPLE,
        FormatType::Iodef => IODEF_SAMPLE,
    }
}
