//! Signer references (`'<entity>.<role>'`).

use crate::error::PolicyError;
use std::fmt;

/// Role granted to every signer the generator emits.
pub const MEMBER_ROLE: &str = "member";

/// Principal roles accepted when parsing existing policies.
const KNOWN_ROLES: &[&str] = &["member", "admin", "client", "peer", "orderer"];

/// Characters that would break the rendered `OR('..','..')` text.
const RESERVED_CHARS: &[char] = &['\'', '"', ',', '(', ')'];

/// One signer in a policy disjunction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SignerRef {
    entity: String,
    role: String,
}

impl SignerRef {
    /// Reference the `member` role of an entity.
    pub fn member(entity: impl Into<String>) -> Result<Self, PolicyError> {
        Self::new(entity, MEMBER_ROLE)
    }

    /// Reference an arbitrary known role of an entity.
    pub fn new(entity: impl Into<String>, role: &str) -> Result<Self, PolicyError> {
        let entity = entity.into();
        validate_identifier(&entity)?;
        if !KNOWN_ROLES.contains(&role) {
            return Err(PolicyError::UnknownRole(role.to_string()));
        }
        Ok(Self {
            entity,
            role: role.to_string(),
        })
    }

    /// The entity (MSP) identifier.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    /// Quoted form used inside an expression, e.g. `'GTBankMSP.member'`.
    pub fn quoted(&self) -> String {
        format!("'{}.{}'", self.entity, self.role)
    }
}

impl fmt::Display for SignerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.role)
    }
}

/// Check that an entity identifier can be rendered into a policy.
///
/// Only structural problems are rejected: empty names, whitespace, and the
/// quoting/grouping characters of the expression syntax.
pub fn validate_identifier(id: &str) -> Result<(), PolicyError> {
    if id.is_empty() {
        return Err(PolicyError::InvalidIdentifier(id.to_string()));
    }
    if id
        .chars()
        .any(|c| c.is_whitespace() || RESERVED_CHARS.contains(&c))
    {
        return Err(PolicyError::InvalidIdentifier(id.to_string()));
    }
    Ok(())
}
