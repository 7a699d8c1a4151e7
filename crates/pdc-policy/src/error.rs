//! Policy error types.

use thiserror::Error;

/// Errors raised while building or parsing a policy expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A disjunction needs at least one signer.
    #[error("policy has no signers")]
    Empty,

    /// The text is not wrapped in `OR(...)`.
    #[error("expected OR(...) expression, got: {0}")]
    MissingOrWrapper(String),

    /// A signer reference is not of the form `'<entity>.<role>'`.
    #[error("invalid signer reference: {0}")]
    InvalidSignerRef(String),

    /// An entity identifier would not survive rendering.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// The role after the final `.` is not a known principal role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl PolicyError {
    /// Get a machine-readable code for this error.
    pub fn to_code(&self) -> &'static str {
        match self {
            PolicyError::Empty => "POLICY_EMPTY",
            PolicyError::MissingOrWrapper(_) => "POLICY_MISSING_OR",
            PolicyError::InvalidSignerRef(_) => "POLICY_INVALID_SIGNER",
            PolicyError::InvalidIdentifier(_) => "POLICY_INVALID_IDENTIFIER",
            PolicyError::UnknownRole(_) => "POLICY_UNKNOWN_ROLE",
        }
    }
}
