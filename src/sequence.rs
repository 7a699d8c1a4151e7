//! The generated collection sequence
//!
//! Records are held in output order: the shared collection, every
//! pairwise collection in enumeration order, then every settlement
//! collection in participant order.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;

use crate::builder::BuildError;
use crate::collection::{CollectionKind, CollectionRecord};

/// Number of unordered pairs over `n` participants.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Position of pair (i, j), i < j, in the outer-i / inner-j enumeration.
fn pair_offset(n: usize, i: usize, j: usize) -> usize {
    i * (2 * n - i - 1) / 2 + (j - i - 1)
}

/// SHA-256 hex digest of the RFC 8785 canonical JSON form of `value`.
pub fn canonical_digest<T: Serialize>(value: &T) -> Result<String, BuildError> {
    let jcs_bytes = serde_json_canonicalizer::to_vec(value)
        .map_err(|e| BuildError::SerializationFailure(format!("JCS canonicalization: {}", e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Immutable, fully built collection config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSequence {
    records: Vec<CollectionRecord>,
    participants: Vec<String>,
    regulator: String,
}

impl ConfigSequence {
    /// Assemble from the three record groups.
    pub(crate) fn new(
        shared: CollectionRecord,
        pairwise: Vec<CollectionRecord>,
        settlement: Vec<CollectionRecord>,
        participants: Vec<String>,
        regulator: String,
    ) -> Self {
        let mut records = Vec::with_capacity(1 + pairwise.len() + settlement.len());
        records.push(shared);
        records.extend(pairwise);
        records.extend(settlement);
        Self {
            records,
            participants,
            regulator,
        }
    }

    pub fn records(&self) -> &[CollectionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    pub fn regulator(&self) -> &str {
        &self.regulator
    }

    pub fn shared(&self) -> &CollectionRecord {
        &self.records[0]
    }

    pub fn pairwise(&self) -> &[CollectionRecord] {
        let end = 1 + pair_count(self.participants.len());
        &self.records[1..end]
    }

    pub fn settlement(&self) -> &[CollectionRecord] {
        let start = 1 + pair_count(self.participants.len());
        &self.records[start..]
    }

    /// Records produced by one enumeration step.
    pub fn records_of(&self, kind: CollectionKind) -> &[CollectionRecord] {
        match kind {
            CollectionKind::Shared => &self.records[..1],
            CollectionKind::Pairwise => self.pairwise(),
            CollectionKind::Settlement => self.settlement(),
        }
    }

    /// Name of the collection two parties both belong to.
    ///
    /// Argument order does not matter: the pairwise name always follows
    /// participant list order. A participant paired with itself maps to its
    /// settlement collection; the regulator paired with anyone maps to the
    /// shared collection. Unknown identifiers yield `None`.
    pub fn collection_for(&self, a: &str, b: &str) -> Option<&str> {
        if a == self.regulator || b == self.regulator {
            let other = if a == self.regulator { b } else { a };
            if other != self.regulator && self.index_of(other).is_none() {
                return None;
            }
            return Some(self.shared().name.as_str());
        }

        let i = self.index_of(a)?;
        let j = self.index_of(b)?;

        if i == j {
            return Some(self.settlement()[i].name.as_str());
        }

        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let offset = pair_offset(self.participants.len(), lo, hi);
        Some(self.pairwise()[offset].name.as_str())
    }

    fn index_of(&self, participant: &str) -> Option<usize> {
        self.participants.iter().position(|p| p == participant)
    }

    /// Serialize to JSON (pretty printed, 2-space indent)
    pub fn to_json(&self) -> Result<String, BuildError> {
        serde_json::to_string_pretty(&self.records)
            .map_err(|e| BuildError::SerializationFailure(e.to_string()))
    }

    /// Serialize to single-line JSON
    pub fn to_json_compact(&self) -> Result<String, BuildError> {
        serde_json::to_string(&self.records)
            .map_err(|e| BuildError::SerializationFailure(e.to_string()))
    }

    /// Write the document followed by a newline.
    pub fn write_to<W: Write>(&self, writer: &mut W, compact: bool) -> Result<(), BuildError> {
        let json = if compact {
            self.to_json_compact()?
        } else {
            self.to_json()?
        };
        writeln!(writer, "{}", json)
            .and_then(|_| writer.flush())
            .map_err(|e| BuildError::SerializationFailure(format!("write failed: {}", e)))
    }

    /// Canonical digest of the record list.
    pub fn digest(&self) -> Result<String, BuildError> {
        canonical_digest(&self.records)
    }
}

impl Serialize for ConfigSequence {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}
