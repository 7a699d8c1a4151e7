//! Resolved network configuration with provenance
//!
//! The built-in defaults are merged with an optional TOML file and the
//! result is deserialized into a `NetworkConfig`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for builtin)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Replication bounds shared by the generated collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerCounts {
    /// requiredPeerCount for every collection
    pub required: u32,

    /// maxPeerCount for bilateral collections
    pub pairwise_max: u32,

    /// maxPeerCount for settlement collections
    pub settlement_max: u32,
}

/// Everything the builder needs to enumerate collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub participants: Vec<String>,
    pub regulator: String,
    pub shared_collection: String,
    pub block_to_live: u64,
    pub peers: PeerCounts,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        let defaults = BuiltinDefaults::default();
        Self {
            participants: defaults.participants,
            regulator: defaults.regulator,
            shared_collection: defaults.shared_collection,
            block_to_live: defaults.block_to_live,
            peers: PeerCounts {
                required: defaults.required_peer_count,
                pairwise_max: defaults.pairwise_max_peer_count,
                settlement_max: defaults.settlement_max_peer_count,
            },
        }
    }
}

/// A network config together with the sources it was merged from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub network: NetworkConfig,
    pub sources: Vec<ConfigSource>,
}

impl NetworkConfig {
    /// Default settings for an explicit participant list and regulator.
    pub fn new<I, S>(participants: I, regulator: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
            regulator: regulator.into(),
            ..Self::default()
        }
    }

    /// Number of participants (N).
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    /// Merge built-in defaults with an optional TOML file.
    ///
    /// A path that does not exist is an error; omitting the path uses the
    /// defaults alone.
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = path {
            let (value, digest) = load_toml_file(path)?;
            info!(path = %path.display(), digest = %digest, "loaded network config");
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        } else {
            debug!("using built-in network defaults");
        }

        let merged = merge_layers(layers);
        let network: NetworkConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigError::ParseError(format!("invalid network config: {}", e)))?;
        network.validate()?;

        Ok(LoadedConfig { network, sources })
    }

    /// Validate replication settings.
    ///
    /// Participant list checks belong to the builder; only values that
    /// would produce an unusable peer range are rejected here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let peers = &self.peers;
        if peers.required == 0 {
            return Err(ConfigError::ValidationError(
                "peers.required must be at least 1".to_string(),
            ));
        }
        if peers.required > peers.pairwise_max {
            return Err(ConfigError::ValidationError(format!(
                "peers.required ({}) exceeds peers.pairwise_max ({})",
                peers.required, peers.pairwise_max
            )));
        }
        if peers.required > peers.settlement_max {
            return Err(ConfigError::ValidationError(format!(
                "peers.required ({}) exceeds peers.settlement_max ({})",
                peers.required, peers.settlement_max
            )));
        }
        if self.shared_collection.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shared_collection must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read a TOML layer. The digest covers the raw bytes so provenance
/// matches what is on disk.
fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let text = std::str::from_utf8(&bytes).map_err(|e| {
        ConfigError::ParseError(format!("{} is not UTF-8: {}", path.display(), e))
    })?;
    let layer: Value = toml::from_str(text)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    Ok((layer, digest))
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults() {
        let loaded = NetworkConfig::load(None).unwrap();
        assert_eq!(loaded.network, NetworkConfig::default());
        assert_eq!(loaded.sources.len(), 1);
        assert_eq!(loaded.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_load_file_overrides() {
        let file = write_toml(
            r#"
participants = ["A", "B"]
regulator = "Reg"

[peers]
pairwise_max = 4
"#,
        );
        let loaded = NetworkConfig::load(Some(file.path())).unwrap();
        let network = loaded.network;

        assert_eq!(network.participants, vec!["A", "B"]);
        assert_eq!(network.regulator, "Reg");
        assert_eq!(network.peers.pairwise_max, 4);
        assert_eq!(network.peers.settlement_max, 2);
        assert_eq!(network.shared_collection, "col-BVN");

        assert_eq!(loaded.sources.len(), 2);
        assert_eq!(loaded.sources[1].origin, ConfigOrigin::File);
        assert_eq!(loaded.sources[1].digest.as_ref().unwrap().len(), 64);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_toml("banks = [\"A\"]\n");
        let err = NetworkConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = NetworkConfig::load(Some(Path::new("/nonexistent/network.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_bad_toml() {
        let file = write_toml("participants = [\n");
        let err = NetworkConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_required_exceeds_max() {
        let file = write_toml("[peers]\nrequired = 3\n");
        let err = NetworkConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("settlement_max"));
    }

    #[test]
    fn test_zero_required_rejected() {
        let mut network = NetworkConfig::default();
        network.peers.required = 0;
        assert!(network.validate().is_err());
    }

    #[test]
    fn test_new_keeps_defaults() {
        let network = NetworkConfig::new(["A", "B"], "Reg");
        assert_eq!(network.participant_count(), 2);
        assert_eq!(network.block_to_live, 0);
        assert_eq!(network.peers.required, 1);
    }
}
