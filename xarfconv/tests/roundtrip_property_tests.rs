use proptest::prelude::*;
use serde_json::{Value, json};
use xarfconv::formats::FormatType;
use xarfconv::{Report, Reporter, convert, convert_report, parse_report};

/// Free text with commas, quotes, newlines and edge spaces; never empty.
fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ,\"\\n\\.:;'_\\-]{0,39}[A-Za-z0-9 ,\"\\.]")
        .expect("valid text regex")
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9][a-z0-9\\.\\-]{0,20}").expect("valid identifier regex")
}

fn build_report(id: &str, source: &str, description: &str, org: &str) -> Report {
    Report {
        report_id: id.to_string(),
        timestamp: "2024-01-15T10:00:00Z".to_string(),
        category: "abuse".to_string(),
        kind: "spam".to_string(),
        source_identifier: source.to_string(),
        description: Some(description.to_string()),
        reporter: Reporter {
            org: Some(org.to_string()),
            contact: Some("abuse@example.com".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

#[test]
fn description_with_comma_quote_and_newline_survives_csv() {
    let description = "Line one, with \"quotes\"\nand a second line";
    let input = json!({
        "report_id": "r-1",
        "timestamp": "2024-01-15T10:00:00Z",
        "category": "abuse",
        "type": "spam",
        "source_identifier": "192.0.2.1",
        "description": description
    });

    let csv = convert(&input, FormatType::Xarf, FormatType::Csv).unwrap();
    let back = convert(csv.as_str(), FormatType::Csv, FormatType::Xarf).unwrap();
    let back: Value = serde_json::from_str(&back).unwrap();
    assert_eq!(back["description"], description);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn csv_round_trip_preserves_free_text(
        id in identifier_strategy(),
        source in identifier_strategy(),
        description in text_strategy(),
        org in text_strategy(),
    ) {
        let report = build_report(&id, &source, &description, &org);
        let csv = convert_report(&report, FormatType::Csv).unwrap();
        let back = parse_report(csv.as_str(), FormatType::Csv).unwrap();

        prop_assert_eq!(back.report_id, id);
        prop_assert_eq!(back.source_identifier, source);
        prop_assert_eq!(back.description.as_deref(), Some(description.as_str()));
        prop_assert_eq!(back.reporter.org.as_deref(), Some(org.as_str()));
    }

    #[test]
    fn xarf_round_trip_is_lossless(
        id in identifier_strategy(),
        source in identifier_strategy(),
        description in text_strategy(),
        org in text_strategy(),
        port in proptest::option::of(1u16..),
        confidence in proptest::option::of(0.0f64..=1.0),
    ) {
        let mut report = build_report(&id, &source, &description, &org);
        report.source_port = port;
        report.confidence = confidence;
        report.tags = vec!["abuse".to_string(), source.clone()];

        let json = convert_report(&report, FormatType::Xarf).unwrap();
        let back = parse_report(json.as_str(), FormatType::Xarf).unwrap();
        prop_assert_eq!(back, report);
    }

    #[test]
    fn iodef_round_trip_preserves_text_needing_escapes(
        id in identifier_strategy(),
        org in "[A-Za-z0-9 &<>]{1,20}",
    ) {
        let report = build_report(&id, "192.0.2.1", "text", &org);
        let xml = convert_report(&report, FormatType::Iodef).unwrap();
        let back = parse_report(xml.as_str(), FormatType::Iodef).unwrap();
        prop_assert_eq!(back.report_id, id);
        prop_assert_eq!(back.reporter.org.as_deref(), Some(org.as_str()));
    }
}
