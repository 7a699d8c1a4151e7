//! Network configuration
//!
//! Two layers are merged:
//! 1. Built-in network defaults (the bank list and regulator)
//! 2. An optional TOML file (`--config`)

mod defaults;
mod merge;
mod network;

pub use defaults::{BuiltinDefaults, DEFAULT_BANKS, DEFAULT_REGULATOR, DEFAULT_SHARED_COLLECTION};
pub use merge::{deep_merge, merge_layers};
pub use network::{ConfigError, ConfigOrigin, ConfigSource, LoadedConfig, NetworkConfig, PeerCounts};
