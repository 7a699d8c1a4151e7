//! Built-in network defaults (layer 1)
//!
//! The bank network the generator was written for.

use serde::{Deserialize, Serialize};

/// Bank MSP identifiers, in enumeration order.
pub const DEFAULT_BANKS: &[&str] = &[
    "AccessBankMSP",
    "GTBankMSP",
    "ZenithBankMSP",
    "FirstBankMSP",
    "CitiBankMSP",
    "EcoBankMSP",
    "FidelityBankMSP",
    "FirstCityMonumentBankMSP",
    "GlobusBankMSP",
    "KeystoneBankMSP",
    "OptimusBankMSP",
    "ParrallexBankMSP",
    "PolarisBankMSP",
    "PremiumTrustBankMSP",
    "ProvidusBankMSP",
    "StanbicIBTCBankMSP",
    "StandardCharteredBankMSP",
    "SterlingBankMSP",
    "SunTrustBankMSP",
    "TitanTrustBankMSP",
    "UnionBankMSP",
    "UBAMSP",
    "UnityBankMSP",
    "WemaBankMSP",
];

/// Central bank peer organisation, a signer on every collection.
pub const DEFAULT_REGULATOR: &str = "CentralBankPeerMSP";

/// Name of the collection shared by the whole network.
pub const DEFAULT_SHARED_COLLECTION: &str = "col-BVN";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Participant identifiers (default: the 24 bank MSPs)
    pub participants: Vec<String>,

    /// Regulator identifier (default: "CentralBankPeerMSP")
    pub regulator: String,

    /// Shared collection name (default: "col-BVN")
    pub shared_collection: String,

    /// Retention horizon in blocks (default: 0 = unlimited)
    pub block_to_live: u64,

    /// Minimum peers a private write must reach (default: 1)
    pub required_peer_count: u32,

    /// Replication bound for bilateral collections (default: 3)
    pub pairwise_max_peer_count: u32,

    /// Replication bound for settlement collections (default: 2)
    pub settlement_max_peer_count: u32,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            participants: DEFAULT_BANKS.iter().map(|s| s.to_string()).collect(),
            regulator: DEFAULT_REGULATOR.to_string(),
            shared_collection: DEFAULT_SHARED_COLLECTION.to_string(),
            block_to_live: 0,
            required_peer_count: 1,
            pairwise_max_peer_count: 3,
            settlement_max_peer_count: 2,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "participants": self.participants,
            "regulator": self.regulator,
            "shared_collection": self.shared_collection,
            "block_to_live": self.block_to_live,
            "peers": {
                "required": self.required_peer_count,
                "pairwise_max": self.pairwise_max_peer_count,
                "settlement_max": self.settlement_max_peer_count
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.participants.len(), 24);
        assert_eq!(defaults.participants[0], "AccessBankMSP");
        assert_eq!(defaults.participants[23], "WemaBankMSP");
        assert_eq!(defaults.regulator, "CentralBankPeerMSP");
        assert_eq!(defaults.shared_collection, "col-BVN");
        assert_eq!(defaults.block_to_live, 0);
        assert_eq!(defaults.required_peer_count, 1);
    }

    #[test]
    fn test_regulator_not_a_bank() {
        assert!(!DEFAULT_BANKS.contains(&DEFAULT_REGULATOR));
    }

    #[test]
    fn test_to_value() {
        let defaults = BuiltinDefaults::default();
        let value = defaults.to_value();

        assert_eq!(value["regulator"], "CentralBankPeerMSP");
        assert_eq!(value["participants"][1], "GTBankMSP");
        assert_eq!(value["peers"]["pairwise_max"], 3);
        assert_eq!(value["peers"]["settlement_max"], 2);
    }
}
