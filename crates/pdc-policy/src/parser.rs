//! Policy expression parser.
//!
//! Parses the `OR('<entity>.<role>',...)` text form back into signer
//! references so that existing collection configs can be checked.

use crate::error::PolicyError;
use crate::signer::SignerRef;
use crate::PolicyExpression;

/// Parse a rendered disjunction.
///
/// Whitespace around the wrapper and between references is tolerated;
/// the quotes around each reference are required.
pub fn parse_policy(text: &str) -> Result<PolicyExpression, PolicyError> {
    let trimmed = text.trim();

    let inner = trimmed
        .strip_prefix("OR(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| PolicyError::MissingOrWrapper(trimmed.to_string()))?;

    if inner.trim().is_empty() {
        return Err(PolicyError::Empty);
    }

    let mut signers = Vec::new();
    for part in inner.split(',') {
        signers.push(parse_signer(part.trim())?);
    }

    PolicyExpression::from_signers(signers)
}

/// Parse one quoted signer reference, e.g. `'UBAMSP.member'`.
fn parse_signer(part: &str) -> Result<SignerRef, PolicyError> {
    let unquoted = part
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(|| PolicyError::InvalidSignerRef(part.to_string()))?;

    // Entity identifiers may contain dots; the role is after the last one
    let (entity, role) = unquoted
        .rsplit_once('.')
        .ok_or_else(|| PolicyError::InvalidSignerRef(part.to_string()))?;

    SignerRef::new(entity, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let policy = parse_policy("OR('A.member','Reg.member')").unwrap();
        let entities: Vec<&str> = policy.entities().collect();
        assert_eq!(entities, vec!["A", "Reg"]);
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        let policy = parse_policy("  OR( 'A.member' , 'B.peer' )  ").unwrap();
        assert_eq!(policy.len(), 2);
        assert_eq!(policy.signers()[1].role(), "peer");
    }

    #[test]
    fn test_parse_dotted_entity() {
        let policy = parse_policy("OR('org1.example.com.admin')").unwrap();
        assert_eq!(policy.signers()[0].entity(), "org1.example.com");
        assert_eq!(policy.signers()[0].role(), "admin");
    }

    #[test]
    fn test_reject_and_expression() {
        let err = parse_policy("AND('A.member','B.member')").unwrap_err();
        assert!(matches!(err, PolicyError::MissingOrWrapper(_)));
    }

    #[test]
    fn test_reject_empty_disjunction() {
        assert_eq!(parse_policy("OR()").unwrap_err(), PolicyError::Empty);
    }

    #[test]
    fn test_reject_unquoted_signer() {
        let err = parse_policy("OR(A.member)").unwrap_err();
        assert_eq!(err, PolicyError::InvalidSignerRef("A.member".to_string()));
    }

    #[test]
    fn test_reject_missing_role() {
        let err = parse_policy("OR('AccessBankMSP')").unwrap_err();
        assert!(matches!(err, PolicyError::InvalidSignerRef(_)));
    }

    #[test]
    fn test_reject_unknown_role() {
        let err = parse_policy("OR('A.owner')").unwrap_err();
        assert_eq!(err, PolicyError::UnknownRole("owner".to_string()));
    }
}
