//! Format conversion utilities for xarfconv.
//!
//! Every conversion is `writer(reader(input))` through the normalized
//! [`Report`]. XARF is the hub: only routes with XARF on one side are wired,
//! so `csv → arf` and friends are rejected before any input is read.

use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::{
    error::Error,
    formats::{
        FeedbackReport, FormatType, IodefDocument, csv::CsvRecord, infer_format_from_extension,
        xarf,
    },
    traits::{Parser, read_text},
    types::Report,
};

/// Reads one on-wire format into a [`Report`].
pub type ReadFn = fn(&str) -> Result<Report, Error>;

/// Writes a [`Report`] into one on-wire format.
pub type WriteFn = fn(&Report) -> Result<String, Error>;

/// A resolved conversion: the reader for the source and the writer for the target.
#[derive(Clone, Copy)]
pub struct Route {
    pub source: FormatType,
    pub target: FormatType,
    read: ReadFn,
    write: WriteFn,
}

impl Route {
    /// Resolves the route for `source → target`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] when `source == target`.
    /// - [`Error::UnsupportedConversion`] when neither side is XARF.
    pub fn resolve(source: FormatType, target: FormatType) -> Result<Self, Error> {
        if source == target {
            return Err(Error::invalid_request(
                "source and target formats must be different",
            ));
        }
        match (source, target) {
            (FormatType::Xarf, _) | (_, FormatType::Xarf) => Ok(Route {
                source,
                target,
                read: reader(source),
                write: writer(target),
            }),
            (from, to) => Err(Error::UnsupportedConversion { from, to }),
        }
    }

    /// Runs the route on text input.
    pub fn run(&self, input: &str) -> Result<String, Error> {
        let report = (self.read)(input)?;
        self.emit(&report)
    }

    /// Writes an already-read report in the target format.
    pub fn emit(&self, report: &Report) -> Result<String, Error> {
        debug!("converting {} from {} to {}", report, self.source, self.target);
        (self.write)(report)
    }
}

/// Lists every wired `(source, target)` pair.
///
/// # Example
/// ```rust
/// use xarfconv::converter::supported_routes;
/// assert_eq!(supported_routes().len(), 6);
/// ```
pub fn supported_routes() -> Vec<(FormatType, FormatType)> {
    FormatType::ALL
        .iter()
        .flat_map(|&s| FormatType::ALL.iter().map(move |&t| (s, t)))
        .filter(|&(s, t)| Route::resolve(s, t).is_ok())
        .collect()
}

/// The reader for a format.
pub fn reader(format: FormatType) -> ReadFn {
    match format {
        FormatType::Xarf => read_xarf,
        FormatType::Arf => read_arf,
        FormatType::Csv => read_csv,
        FormatType::Iodef => read_iodef,
    }
}

/// The writer for a format.
pub fn writer(format: FormatType) -> WriteFn {
    match format {
        FormatType::Xarf => write_xarf,
        FormatType::Arf => write_arf,
        FormatType::Csv => write_csv,
        FormatType::Iodef => write_iodef,
    }
}

fn read_xarf(input: &str) -> Result<Report, Error> {
    Report::from_str(input)
}

fn read_arf(input: &str) -> Result<Report, Error> {
    FeedbackReport::from_str(input).map(Report::from)
}

fn read_csv(input: &str) -> Result<Report, Error> {
    CsvRecord::from_str(input).map(Report::from)
}

fn read_iodef(input: &str) -> Result<Report, Error> {
    IodefDocument::from_str(input).map(Report::from)
}

fn write_xarf(report: &Report) -> Result<String, Error> {
    report.to_text()
}

fn write_arf(report: &Report) -> Result<String, Error> {
    FeedbackReport::from(report).to_text()
}

fn write_csv(report: &Report) -> Result<String, Error> {
    CsvRecord::from(report).to_text()
}

fn write_iodef(report: &Report) -> Result<String, Error> {
    IodefDocument::from(report).to_text()
}

/// Conversion input: raw text in any format, or an already-parsed XARF object.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Text(&'a str),
    Json(&'a Value),
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(value: &'a str) -> Self {
        Input::Text(value)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(value: &'a String) -> Self {
        Input::Text(value.as_str())
    }
}

impl<'a> From<&'a Value> for Input<'a> {
    fn from(value: &'a Value) -> Self {
        Input::Json(value)
    }
}

/// Parses input of the given format into a [`Report`].
///
/// # Errors
///
/// Returns [`Error::Parse`] for malformed input, or when a JSON value is
/// passed for a non-XARF format.
pub fn parse_report<'a>(input: impl Into<Input<'a>>, format: FormatType) -> Result<Report, Error> {
    match (input.into(), format) {
        (Input::Text(text), format) => reader(format)(text),
        (Input::Json(value), FormatType::Xarf) => xarf::from_value(value),
        (Input::Json(_), format) => Err(Error::parse(
            format,
            "expected text input, got a JSON value",
        )),
    }
}

/// Serializes a [`Report`] into the given format.
pub fn serialize_report(report: &Report, format: FormatType) -> Result<String, Error> {
    writer(format)(report)
}

/// Convert an abuse report from one format to another.
///
/// # Arguments
///
/// * `input` - Report text, or a parsed JSON value when `source` is XARF.
/// * `source` - The format of the input.
/// * `target` - The format to produce.
///
/// # Errors
///
/// - [`Error::InvalidRequest`] if `source == target` (checked before parsing).
/// - [`Error::UnsupportedConversion`] for pairs without XARF on either side.
/// - [`Error::Parse`] if the input is malformed for `source`.
///
/// # Example
///
/// ```rust
/// use xarfconv::{converter::convert, formats::FormatType};
///
/// let csv = "report_id,category,type,source_identifier\nr-1,abuse,spam,192.0.2.1";
/// let json = convert(csv, FormatType::Csv, FormatType::Xarf)?;
/// assert!(json.contains("\"report_id\": \"r-1\""));
/// # Ok::<(), xarfconv::Error>(())
/// ```
pub fn convert<'a>(
    input: impl Into<Input<'a>>,
    source: FormatType,
    target: FormatType,
) -> Result<String, Error> {
    let route = Route::resolve(source, target)?;
    match input.into() {
        Input::Text(text) => route.run(text),
        json => route.emit(&parse_report(json, route.source)?),
    }
}

/// Like [`convert`], with format labels such as `"xarf"` or `"csv"`.
///
/// # Errors
///
/// Unknown labels are [`Error::InvalidRequest`]; everything else as [`convert`].
pub fn convert_by_name(input: &str, source: &str, target: &str) -> Result<String, Error> {
    convert(input, source.parse()?, target.parse()?)
}

/// Emits an already-normalized report in the target format.
pub fn convert_report(report: &Report, target: FormatType) -> Result<String, Error> {
    serialize_report(report, target)
}

/// Convert a report file into another file, inferring formats from the extensions.
///
/// # Example
///
/// ```rust,no_run
/// use xarfconv::converter::convert_auto;
/// convert_auto("report.csv", "report.json")?;
/// # Ok::<(), xarfconv::Error>(())
/// ```
pub fn convert_auto<P: AsRef<Path>>(input: P, output: P) -> Result<(), Error> {
    let source = infer_format_from_extension(&input).ok_or_else(|| {
        Error::invalid_request(format!(
            "cannot infer input format from extension: {:?}",
            input.as_ref().extension()
        ))
    })?;
    let target = infer_format_from_extension(&output).ok_or_else(|| {
        Error::invalid_request(format!(
            "cannot infer output format from extension: {:?}",
            output.as_ref().extension()
        ))
    })?;
    let route = Route::resolve(source, target)?;
    let text = read_text(input)?;
    std::fs::write(output, route.run(&text)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const XARF: &str = r#"{
        "report_id": "550e8400-e29b-41d4-a716-446655440000",
        "timestamp": "2024-01-15T10:00:00Z",
        "category": "abuse",
        "type": "ddos",
        "source_identifier": "192.0.2.100"
    }"#;

    #[test]
    fn test_same_format_is_invalid_request() {
        for format in FormatType::ALL {
            let err = convert("anything", format, format).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)), "{format}: {err:?}");
        }
    }

    #[test]
    fn test_spoke_to_spoke_is_unsupported() {
        let err = convert("a,b\n1,2", FormatType::Csv, FormatType::Arf).unwrap_err();
        match err {
            Error::UnsupportedConversion { from, to } => {
                assert_eq!(from, FormatType::Csv);
                assert_eq!(to, FormatType::Arf);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_route_is_checked_before_parsing() {
        // Invalid CSV, but the pair is rejected first.
        let err = convert("", FormatType::Csv, FormatType::Iodef).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConversion { .. }));
    }

    #[test]
    fn test_exactly_six_routes() {
        let routes = supported_routes();
        assert_eq!(routes.len(), 6);
        assert!(routes.iter().all(|(s, t)| s.is_hub() || t.is_hub()));
    }

    #[test]
    fn test_convert_by_name() {
        let csv = convert_by_name(XARF, "XARF", "csv").unwrap();
        assert_eq!(csv.lines().count(), 2);

        let err = convert_by_name(XARF, "xarf", "pdf").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_convert_from_json_value() {
        let value = json!({
            "report_id": "r-1",
            "category": "abuse",
            "type": "spam",
            "source_identifier": "192.0.2.1"
        });
        let csv = convert(&value, FormatType::Xarf, FormatType::Csv).unwrap();
        assert!(csv.ends_with("r-1,,abuse,spam,192.0.2.1,,,,,,,"));
    }

    #[test]
    fn test_text_and_value_input_share_the_route() {
        let route = Route::resolve(FormatType::Xarf, FormatType::Csv).unwrap();
        let from_text = convert(XARF, FormatType::Xarf, FormatType::Csv).unwrap();
        assert_eq!(from_text, route.run(XARF).unwrap());

        let value: Value = serde_json::from_str(XARF).unwrap();
        assert_eq!(convert(&value, FormatType::Xarf, FormatType::Csv).unwrap(), from_text);
    }

    #[test]
    fn test_json_value_for_text_format_is_parse_error() {
        let value = json!({});
        let err = convert(&value, FormatType::Csv, FormatType::Xarf).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse {
                format: FormatType::Csv,
                ..
            }
        ));
    }

    #[test]
    fn test_convert_report_to_every_format() {
        let report = parse_report(XARF, FormatType::Xarf).unwrap();
        for format in FormatType::ALL {
            let text = convert_report(&report, format).unwrap();
            assert!(!text.is_empty(), "{format} output is empty");
        }
    }

    #[test]
    fn test_convert_auto_infers_formats() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("report.json");
        let output = tmp.path().join("report.xml");
        std::fs::write(&input, XARF).unwrap();

        convert_auto(&input, &output).unwrap();

        let xml = std::fs::read_to_string(&output).unwrap();
        assert!(xml.contains("<IODEF-Document"));
        assert!(xml.contains("550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn test_convert_auto_unknown_extension() {
        let err = convert_auto("report.txt", "report.json").unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}
