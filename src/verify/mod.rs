//! Collection config verification
//!
//! Reads an existing collection config document and checks it against the
//! invariants every generated document satisfies. Violations are reported
//! as data; only unreadable input is an error.

use pdc_policy::parse_policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::sequence::canonical_digest;

/// Machine-readable invariant violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail")]
pub enum Violation {
    /// Two records share a name.
    #[serde(rename = "DUPLICATE_NAME")]
    DuplicateName(String),

    /// requiredPeerCount is larger than maxPeerCount.
    #[serde(rename = "PEER_COUNT_INVERTED")]
    PeerCountInverted { name: String, required: u32, max: u32 },

    /// The access policy does not parse or has no signers.
    #[serde(rename = "INVALID_POLICY")]
    InvalidPolicy { name: String, reason: String },

    /// The endorsement policy does not parse.
    #[serde(rename = "INVALID_ENDORSEMENT_POLICY")]
    InvalidEndorsementPolicy { name: String, reason: String },

    /// The endorsement policy names different signers than the access policy.
    #[serde(rename = "ENDORSEMENT_MISMATCH")]
    EndorsementMismatch(String),
}

impl Violation {
    /// Get a machine-readable string representation.
    pub fn to_code(&self) -> String {
        match self {
            Violation::DuplicateName(n) => format!("DUPLICATE_NAME:{}", n),
            Violation::PeerCountInverted {
                name,
                required,
                max,
            } => format!("PEER_COUNT_INVERTED:{}:{}>{}", name, required, max),
            Violation::InvalidPolicy { name, reason } => {
                format!("INVALID_POLICY:{}:{}", name, reason)
            }
            Violation::InvalidEndorsementPolicy { name, reason } => {
                format!("INVALID_ENDORSEMENT_POLICY:{}:{}", name, reason)
            }
            Violation::EndorsementMismatch(n) => format!("ENDORSEMENT_MISMATCH:{}", n),
        }
    }
}

/// Result of verifying one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Number of records in the document.
    pub record_count: usize,

    /// SHA-256 of the canonical (RFC 8785) form of the document.
    pub digest: String,

    /// Everything that failed, in document order.
    #[serde(default)]
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Serialize to JSON (pretty printed)
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render for terminals.
    pub fn to_human(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Collections: {}\n", self.record_count));
        out.push_str(&format!("Digest: {}\n", self.digest));
        if self.is_clean() {
            out.push_str("Status: OK\n");
        } else {
            out.push_str(&format!("Status: {} violation(s)\n", self.violations.len()));
            for violation in &self.violations {
                out.push_str(&format!("  - {}\n", violation.to_code()));
            }
        }
        out
    }
}

/// Field subset checked per record. Policies stay as text so a bad one
/// becomes a violation instead of a decode failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    name: String,
    policy: String,
    required_peer_count: u32,
    max_peer_count: u32,
    endorsement_policy: RawEndorsementPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndorsementPolicy {
    signature_policy: String,
}

/// Verify a document held in memory.
pub fn verify_document(text: &str) -> Result<VerifyReport, VerifyError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| VerifyError::Parse(e.to_string()))?;
    verify_value(&value)
}

/// Verify a document on disk.
pub fn verify_file(path: &Path) -> Result<VerifyReport, VerifyError> {
    let text = fs::read_to_string(path)
        .map_err(|e| VerifyError::Io(format!("{}: {}", path.display(), e)))?;
    verify_document(&text)
}

/// Verify an already decoded document.
pub fn verify_value(value: &Value) -> Result<VerifyReport, VerifyError> {
    let records: Vec<RawRecord> = serde_json::from_value(value.clone())
        .map_err(|e| VerifyError::Parse(format!("not a collection config array: {}", e)))?;

    let digest = canonical_digest(value).map_err(|e| VerifyError::Parse(e.to_string()))?;

    let mut violations = Vec::new();
    let mut seen = HashSet::with_capacity(records.len());

    for record in &records {
        if !seen.insert(record.name.as_str()) {
            violations.push(Violation::DuplicateName(record.name.clone()));
        }

        if record.required_peer_count > record.max_peer_count {
            violations.push(Violation::PeerCountInverted {
                name: record.name.clone(),
                required: record.required_peer_count,
                max: record.max_peer_count,
            });
        }

        let policy = parse_policy(&record.policy);
        let endorsement = parse_policy(&record.endorsement_policy.signature_policy);

        match (&policy, &endorsement) {
            (Ok(p), Ok(e)) => {
                if !p.same_signers(e) {
                    violations.push(Violation::EndorsementMismatch(record.name.clone()));
                }
            }
            _ => {
                if let Err(err) = &policy {
                    violations.push(Violation::InvalidPolicy {
                        name: record.name.clone(),
                        reason: err.to_string(),
                    });
                }
                if let Err(err) = &endorsement {
                    violations.push(Violation::InvalidEndorsementPolicy {
                        name: record.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }

    debug!(
        records = records.len(),
        violations = violations.len(),
        "verified collection config"
    );

    Ok(VerifyReport {
        record_count: records.len(),
        digest,
        violations,
    })
}

/// Errors for documents that cannot be checked at all
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
