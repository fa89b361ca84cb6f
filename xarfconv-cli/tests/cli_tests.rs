use std::fs;
use std::process::Command;

use tempfile::TempDir;
use xarfconv::FormatType;
use xarfconv_cli::validation::{
    parse_format, resolve_format, validate_file_path, validate_output_path,
};

const VALID_REPORT: &str = r#"{
    "xarf_version": "4.0.0",
    "report_id": "550e8400-e29b-41d4-a716-446655440000",
    "timestamp": "2024-01-15T10:00:00Z",
    "reporter": { "contact": "a@b.com" },
    "source_identifier": "192.0.2.1",
    "category": "abuse",
    "type": "ddos"
}"#;

fn xarfconv() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("xarfconv"))
}

#[test]
fn test_resolve_format_prefers_explicit_label() {
    assert_eq!(
        resolve_format(Some("IODEF"), Some("report.csv"), "input").unwrap(),
        FormatType::Iodef
    );
    assert_eq!(
        resolve_format(None, Some("report.eml"), "input").unwrap(),
        FormatType::Arf
    );
    let err = resolve_format(None, Some("-"), "input").unwrap_err();
    assert!(err.contains("without a file name"));
    assert!(parse_format("pdf").is_err());
}

#[test]
fn test_validate_paths() {
    let temp_dir = TempDir::new().unwrap();
    assert!(validate_file_path("nonexistent_report.json").unwrap_err().contains("does not exist"));
    assert!(
        validate_file_path(temp_dir.path().to_str().unwrap())
            .unwrap_err()
            .contains("not a file")
    );

    let nested = temp_dir.path().join("out").join("report.csv");
    validate_output_path(nested.to_str().unwrap()).unwrap();
    assert!(nested.parent().unwrap().exists());
}

#[test]
fn test_convert_file_with_inferred_formats() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    let output = temp_dir.path().join("report.csv");
    fs::write(&input, VALID_REPORT).unwrap();

    let out = xarfconv()
        .args(["convert", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let csv = fs::read_to_string(&output).unwrap();
    assert_eq!(csv.lines().count(), 2);
    assert!(csv.starts_with("report_id,timestamp,category,type"));
}

#[test]
fn test_convert_to_stdout_with_explicit_formats() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.txt");
    fs::write(&input, VALID_REPORT).unwrap();

    let out = xarfconv()
        .args(["convert", "--from", "xarf", "--to", "iodef", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("<IODEF-Document"));
}

#[test]
fn test_convert_with_validate_reports_findings_for_xarf_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.csv");
    fs::write(
        &input,
        "report_id,timestamp,category,type,source_identifier,reporter_contact\n\
         550e8400-e29b-41d4-a716-446655440000,2024-01-15T10:00:00Z,abuse,ddos,192.0.2.1,a@b.com",
    )
    .unwrap();

    let out = xarfconv()
        .args(["convert", "--to", "xarf", "--validate", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Report is valid"));
    assert!(stderr.contains("Missing recommended field: \"description\""));
    assert!(String::from_utf8_lossy(&out.stdout).contains("\"report_id\": \"550e8400"));
}

#[test]
fn test_convert_with_validate_skips_non_xarf_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    fs::write(&input, VALID_REPORT).unwrap();

    let out = xarfconv()
        .args(["convert", "--to", "csv", "--validate", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(!stderr.contains("Report is"), "stderr: {stderr}");
    assert!(!stderr.contains("warning:"));
    assert!(String::from_utf8_lossy(&out.stdout).starts_with("report_id,"));
}

#[test]
fn test_unsupported_route_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.csv");
    fs::write(&input, "report_id\nr-1").unwrap();

    let out = xarfconv()
        .args(["convert", "--to", "arf", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Error: conversion from csv to arf is not supported"));
}

#[test]
fn test_validate_valid_report_as_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    fs::write(&input, VALID_REPORT).unwrap();

    let out = xarfconv()
        .args(["validate", "--json", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());

    let result: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(result["valid"], true);
    assert_eq!(result["warnings"].as_array().unwrap().len(), 2);
}

#[test]
fn test_validate_invalid_report_exits_with_one() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    fs::write(&input, VALID_REPORT.replace("\"abuse\"", "\"bogus\"")).unwrap();

    let out = xarfconv()
        .args(["validate", "--no-warnings", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Invalid category \"bogus\""));
    assert!(!stderr.contains("warning:"));
}

#[test]
fn test_validate_rejects_non_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("report.json");
    fs::write(&input, "not json").unwrap();

    let out = xarfconv().args(["validate", "-i"]).arg(&input).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error: validation input error"));
}

#[test]
fn test_sample_command() {
    let out = xarfconv().args(["sample", "--format", "arf"]).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Content-Type: message/feedback-report"));
}

#[test]
fn test_generate_command_produces_valid_report() {
    let out = xarfconv()
        .args([
            "generate",
            "--category",
            "connection",
            "--type",
            "port_scan",
            "--source",
            "192.0.2.44",
            "--contact",
            "abuse@example.com",
            "--org",
            "SOC Team",
            "--evidence",
            "--optional",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    let result = xarfconv::validate(&stdout, &xarfconv::ValidationOptions::default()).unwrap();
    assert!(result.is_clean(), "{result:?}");
}

#[test]
fn test_generate_requires_non_blank_source() {
    let out = xarfconv()
        .args([
            "generate",
            "--category",
            "abuse",
            "--type",
            "spam",
            "--source",
            " ",
            "--contact",
            "abuse@example.com",
        ])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("source identifier is required"));
}

#[test]
fn test_generate_on_behalf_of() {
    let out = xarfconv()
        .args([
            "generate",
            "--category",
            "abuse",
            "--type",
            "spam",
            "--source",
            "192.0.2.9",
            "--contact",
            "abuse@provider.example",
            "--on-behalf-org",
            "Client Corp",
            "--on-behalf-contact",
            "noc@client.example",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["reporter"]["on_behalf_of"]["org"], "Client Corp");
    assert_eq!(report["reporter"]["on_behalf_of"]["contact"], "noc@client.example");
}

#[test]
fn test_hash_command_prints_evidence() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("capture.txt");
    fs::write(&input, "abc").unwrap();

    let out = xarfconv()
        .args(["hash", "--content-type", "text/plain", "-i"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());

    let evidence: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(evidence["type"], "file");
    assert_eq!(evidence["filename"], "capture.txt");
    assert_eq!(evidence["size"], 3);
    assert_eq!(evidence["content_type"], "text/plain");
    assert_eq!(
        evidence["hash"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}

#[test]
fn test_hash_text_evidence_with_sha1() {
    let out = xarfconv().args(["hash", "--text", "abc", "--sha1"]).output().unwrap();
    assert!(out.status.success());

    let evidence: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(evidence["type"], "data");
    assert_eq!(evidence["description"], "Text evidence");
    assert_eq!(evidence["size"], 3);
    assert!(evidence.get("filename").is_none());
    assert_eq!(
        evidence["hash"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(
        String::from_utf8_lossy(&out.stderr)
            .contains("sha1: a9993e364706816aba3e25717850c26c9cd0d89d")
    );
}

#[test]
fn test_hash_base64_evidence() {
    let out = xarfconv().args(["hash", "--base64", "YWJj"]).output().unwrap();
    assert!(out.status.success());

    let evidence: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(evidence["type"], "data");
    assert_eq!(evidence["description"], "Base64-encoded evidence");
    assert_eq!(evidence["size"], 3);
    assert_eq!(
        evidence["hash"],
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert!(!String::from_utf8_lossy(&out.stderr).contains("sha1:"));
}

#[test]
fn test_hash_rejects_invalid_base64() {
    let out = xarfconv().args(["hash", "--base64", "not*base64"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error: invalid request: invalid base64 data"));
}

#[test]
fn test_hash_requires_exactly_one_source() {
    let out = xarfconv().arg("hash").output().unwrap();
    assert!(!out.status.success());

    let out = xarfconv().args(["hash", "--text", "a", "--base64", "YQ=="]).output().unwrap();
    assert!(!out.status.success());
}
