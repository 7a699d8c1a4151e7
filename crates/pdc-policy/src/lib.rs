//! Signature policy expressions for private data collections.
//!
//! A policy is a disjunction over signer references and renders as
//! `OR('AccessBankMSP.member','CentralBankPeerMSP.member')`. Keeping the
//! signer list structured lets callers compare policies by who may sign
//! rather than by how the text happens to be formatted.

mod error;
mod parser;
mod signer;

pub use error::PolicyError;
pub use parser::parse_policy;
pub use signer::{validate_identifier, SignerRef, MEMBER_ROLE};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// An `OR` over one or more signers, in render order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyExpression {
    signers: Vec<SignerRef>,
}

impl PolicyExpression {
    /// Any member of the given entities may sign.
    pub fn any_member_of<I, S>(entities: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let signers = entities
            .into_iter()
            .map(SignerRef::member)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_signers(signers)
    }

    /// Build from explicit signer references.
    pub fn from_signers(signers: Vec<SignerRef>) -> Result<Self, PolicyError> {
        if signers.is_empty() {
            return Err(PolicyError::Empty);
        }
        Ok(Self { signers })
    }

    pub fn signers(&self) -> &[SignerRef] {
        &self.signers
    }

    /// Entity identifiers in render order.
    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.signers.iter().map(|s| s.entity())
    }

    /// Distinct entity identifiers.
    pub fn entity_set(&self) -> BTreeSet<&str> {
        self.entities().collect()
    }

    /// Whether any signer belongs to `entity`.
    pub fn contains(&self, entity: &str) -> bool {
        self.entities().any(|e| e == entity)
    }

    /// Same signer set, ignoring order and repetition.
    pub fn same_signers(&self, other: &PolicyExpression) -> bool {
        let ours: BTreeSet<&SignerRef> = self.signers.iter().collect();
        let theirs: BTreeSet<&SignerRef> = other.signers.iter().collect();
        ours == theirs
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Render as `OR('<entity>.<role>',...)`.
    pub fn render(&self) -> String {
        let refs: Vec<String> = self.signers.iter().map(|s| s.quoted()).collect();
        format!("OR({})", refs.join(","))
    }
}

impl fmt::Display for PolicyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for PolicyExpression {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_policy(s)
    }
}

impl Serialize for PolicyExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl<'de> Deserialize<'de> for PolicyExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_policy(&text).map_err(serde::de::Error::custom)
    }
}
