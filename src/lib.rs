//! PDC Config - private data collection config generator
//!
//! Enumerates the private data collections of a bank settlement network:
//! one collection shared by every bank, one per pair of banks, and one
//! settlement collection per bank. Every collection also admits the
//! central bank regulator.

pub mod builder;
pub mod collection;
pub mod config;
pub mod sequence;
pub mod verify;

pub use builder::{build_default, BuildError, Builder};
pub use collection::{CollectionKind, CollectionRecord, EndorsementPolicy};
pub use config::{ConfigError, NetworkConfig};
pub use pdc_policy::{PolicyError, PolicyExpression, SignerRef};
pub use sequence::{canonical_digest, ConfigSequence};
pub use verify::{verify_document, verify_file, VerifyError, VerifyReport, Violation};
