//! Collection records
//!
//! One record per private data collection. Field names and order match
//! the collection config JSON consumed by the peer tooling.

use pdc_policy::PolicyExpression;
use serde::{Deserialize, Serialize};

/// Prefix shared by every generated collection name.
pub const COLLECTION_PREFIX: &str = "col";

/// Prefix of per-participant settlement collections.
pub const SETTLEMENT_PREFIX: &str = "col-settlement";

/// Which enumeration step produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Readable by every participant
    Shared,
    /// One per unordered participant pair
    Pairwise,
    /// One per participant
    Settlement,
}

/// Signature policy applied at endorsement time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndorsementPolicy {
    pub signature_policy: PolicyExpression,
}

/// A single collection definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    pub name: String,
    pub policy: PolicyExpression,
    pub member_only_read: bool,
    pub member_only_write: bool,
    pub required_peer_count: u32,
    pub max_peer_count: u32,
    /// Retention in blocks; 0 keeps private data forever
    pub block_to_live: u64,
    pub endorsement_policy: EndorsementPolicy,
}

impl CollectionRecord {
    /// Create a record whose endorsement policy mirrors its access policy.
    pub fn new(name: impl Into<String>, policy: PolicyExpression) -> Self {
        Self {
            name: name.into(),
            endorsement_policy: EndorsementPolicy {
                signature_policy: policy.clone(),
            },
            policy,
            member_only_read: true,
            member_only_write: true,
            required_peer_count: 1,
            max_peer_count: 1,
            block_to_live: 0,
        }
    }

    /// Set the replication range.
    pub fn with_peers(mut self, required: u32, max: u32) -> Self {
        self.required_peer_count = required;
        self.max_peer_count = max;
        self
    }

    /// Set the read/write membership flags.
    pub fn with_membership(mut self, read: bool, write: bool) -> Self {
        self.member_only_read = read;
        self.member_only_write = write;
        self
    }

    pub fn with_block_to_live(mut self, blocks: u64) -> Self {
        self.block_to_live = blocks;
        self
    }
}

/// `col-<a>-<b>`, in the order given.
pub fn pairwise_name(a: &str, b: &str) -> String {
    format!("{}-{}-{}", COLLECTION_PREFIX, a, b)
}

/// `col-settlement-<participant>`.
pub fn settlement_name(participant: &str) -> String {
    format!("{}-{}", SETTLEMENT_PREFIX, participant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(entities: &[&str]) -> PolicyExpression {
        PolicyExpression::any_member_of(entities.iter().copied()).unwrap()
    }

    #[test]
    fn test_names() {
        assert_eq!(pairwise_name("A", "B"), "col-A-B");
        assert_eq!(settlement_name("A"), "col-settlement-A");
    }

    #[test]
    fn test_endorsement_mirrors_policy() {
        let record = CollectionRecord::new("col-A-B", policy(&["A", "B", "Reg"]));
        assert_eq!(record.endorsement_policy.signature_policy, record.policy);
    }

    #[test]
    fn test_builders() {
        let record = CollectionRecord::new("col-settlement-A", policy(&["A", "Reg"]))
            .with_peers(1, 2)
            .with_membership(false, true)
            .with_block_to_live(0);
        assert_eq!(record.required_peer_count, 1);
        assert_eq!(record.max_peer_count, 2);
        assert!(!record.member_only_read);
        assert!(record.member_only_write);
    }

    #[test]
    fn test_serialized_field_order() {
        let record = CollectionRecord::new("col-A-B", policy(&["A", "Reg"])).with_peers(1, 3);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            "{\"name\":\"col-A-B\",\"policy\":\"OR('A.member','Reg.member')\",\
             \"memberOnlyRead\":true,\"memberOnlyWrite\":true,\"requiredPeerCount\":1,\
             \"maxPeerCount\":3,\"blockToLive\":0,\
             \"endorsementPolicy\":{\"signaturePolicy\":\"OR('A.member','Reg.member')\"}}"
        );
    }

    #[test]
    fn test_deserialize() {
        let json = serde_json::json!({
            "name": "col-settlement-A",
            "policy": "OR('A.member','Reg.member')",
            "memberOnlyRead": false,
            "memberOnlyWrite": true,
            "requiredPeerCount": 1,
            "maxPeerCount": 2,
            "blockToLive": 0,
            "endorsementPolicy": {"signaturePolicy": "OR('A.member','Reg.member')"}
        });
        let record: CollectionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.name, "col-settlement-A");
        assert!(record.policy.contains("Reg"));
        assert!(!record.member_only_read);
    }
}
