use std::path::Path;

use log::debug;
use xarfconv::{
    Evidence, EvidenceSource, FormatType, GenerateOptions, convert_report,
    evidence::{decode_base64, sha1_hex},
    generate_report,
    samples::sample,
};

use crate::validation::{validate_file_path, write_output};

/// Prints the sample report for `format`.
pub fn run_sample_command(format: FormatType, output: Option<&str>) -> Result<(), String> {
    write_output(output, sample(format))
}

/// Generates a report and writes it in `format`.
pub fn run_generate_command(
    options: &GenerateOptions,
    format: FormatType,
    output: Option<&str>,
) -> Result<(), String> {
    let report = generate_report(options).map_err(|e| e.to_string())?;
    let text = convert_report(&report, format).map_err(|e| e.to_string())?;
    write_output(output, &text)
}

/// What `hash` reads its evidence bytes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashInput {
    /// A file on disk, with an optional MIME type.
    File {
        path: String,
        content_type: Option<String>,
    },
    /// Text taken as-is.
    Text(String),
    /// Base64 data, decoded before hashing.
    Base64(String),
}

/// Hashes the input and prints the resulting evidence item as JSON on stdout.
/// With `sha1`, the SHA-1 digest of the same bytes goes to stderr.
pub fn run_hash_command(input: HashInput, sha1: bool) -> Result<(), String> {
    let (bytes, evidence) = match input {
        HashInput::File { path, content_type } => {
            validate_file_path(&path)?;
            let bytes =
                std::fs::read(&path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
            let name = Path::new(&path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            let evidence =
                Evidence::from_bytes(&bytes, EvidenceSource::File { name, content_type });
            (bytes, evidence)
        }
        HashInput::Text(text) => {
            if text.trim().is_empty() {
                return Err("text evidence is empty".to_string());
            }
            let evidence = Evidence::from_bytes(text.as_bytes(), EvidenceSource::Text);
            (text.into_bytes(), evidence)
        }
        HashInput::Base64(data) => {
            let bytes = decode_base64(&data).map_err(|e| e.to_string())?;
            let evidence = Evidence::from_bytes(&bytes, EvidenceSource::Base64);
            (bytes, evidence)
        }
    };
    debug!("hashed {} byte(s) of evidence", bytes.len());

    let json = serde_json::to_string_pretty(&evidence)
        .map_err(|e| format!("Failed to render evidence: {}", e))?;
    println!("{}", json);
    if sha1 {
        eprintln!("sha1: {}", sha1_hex(&bytes));
    }
    Ok(())
}
