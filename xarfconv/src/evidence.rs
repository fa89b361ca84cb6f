//! Evidence items with integrity hashes.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::{error::Error, types::Evidence};

/// The only hash algorithm evidence items are stamped with.
pub const HASH_ALGORITHM: &str = "sha256";

/// Where evidence bytes came from; decides the evidence `type` and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceSource {
    /// An uploaded file.
    File {
        name: String,
        content_type: Option<String>,
    },
    /// Free text pasted by the reporter.
    Text,
    /// Bytes decoded from base64 input, see [`decode_base64`].
    Base64,
    /// Raw bytes, already decoded by the caller.
    Data,
}

/// Lowercase hex SHA-256 digest of `bytes`.
///
/// # Example
///
/// ```rust
/// use xarfconv::evidence::sha256_hex;
/// assert_eq!(
///     sha256_hex(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-1 digest of `bytes`. Reported alongside evidence,
/// never stamped on it.
pub fn sha1_hex(bytes: &[u8]) -> String {
    hex::encode(Sha1::digest(bytes))
}

/// Decodes standard base64, ignoring any whitespace such as line wraps.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] when the input is blank or not valid base64.
pub fn decode_base64(input: &str) -> Result<Vec<u8>, Error> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(Error::invalid_request("base64 evidence is empty"));
    }
    BASE64
        .decode(compact)
        .map_err(|e| Error::invalid_request(format!("invalid base64 data: {}", e)))
}

impl Evidence {
    /// Builds an evidence item describing `bytes`.
    pub fn from_bytes(bytes: &[u8], source: EvidenceSource) -> Self {
        let size = Some(bytes.len() as u64);
        let hash = Some(sha256_hex(bytes));
        let hash_algorithm = Some(HASH_ALGORITHM.to_string());

        match source {
            EvidenceSource::File { name, content_type } => Evidence {
                kind: "file".to_string(),
                description: Some(format!("Uploaded file: {}", name)),
                hash,
                hash_algorithm,
                filename: Some(name),
                size,
                content_type: content_type.filter(|c| !c.is_empty()),
                ..Default::default()
            },
            EvidenceSource::Text => Evidence {
                kind: "data".to_string(),
                description: Some("Text evidence".to_string()),
                hash,
                hash_algorithm,
                size,
                ..Default::default()
            },
            EvidenceSource::Base64 => Evidence {
                kind: "data".to_string(),
                description: Some("Base64-encoded evidence".to_string()),
                hash,
                hash_algorithm,
                size,
                ..Default::default()
            },
            EvidenceSource::Data => Evidence {
                kind: "data".to_string(),
                description: Some("Evidence data".to_string()),
                hash,
                hash_algorithm,
                size,
                ..Default::default()
            },
        }
    }

    /// Decodes base64 `input` and builds an evidence item over the decoded bytes.
    ///
    /// # Errors
    ///
    /// See [`decode_base64`].
    pub fn from_base64(input: &str) -> Result<Self, Error> {
        let bytes = decode_base64(input)?;
        Ok(Self::from_bytes(&bytes, EvidenceSource::Base64))
    }

    /// Whether `hash` matches the SHA-256 digest of `bytes`.
    ///
    /// Items hashed with another algorithm, or without a hash, never match.
    pub fn verify(&self, bytes: &[u8]) -> bool {
        let sha256 = self
            .hash_algorithm
            .as_deref()
            .is_none_or(|a| a.eq_ignore_ascii_case(HASH_ALGORITHM));
        match &self.hash {
            Some(hash) if sha256 => hash.eq_ignore_ascii_case(&sha256_hex(bytes)),
            _ => false,
        }
    }
}
