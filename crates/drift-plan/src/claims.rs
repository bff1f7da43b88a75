//! Claim tracking for actual-schema objects.
//!
//! During one diff run every actual object may be matched ("claimed") by at
//! most one desired object. The claim set is owned by the matcher and keyed
//! by (schema, kind, name). Snapshot records themselves stay untouched, so
//! copying them can never detach a claim.

use std::collections::BTreeSet;

/// The kind of a claimable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ObjectKind {
    /// A domain.
    Domain,
    /// A table.
    Table,
    /// A column; its key is `table.column`.
    Column,
}

/// The set of actual objects already matched in this diff run.
///
/// Claims are monotonic: once claimed, an object stays claimed for the
/// lifetime of the run.
#[derive(Debug, Default)]
pub struct ClaimSet {
    claimed: BTreeSet<(String, ObjectKind, String)>,
}

impl ClaimSet {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims an object. Returns false if it was already claimed.
    pub fn claim(&mut self, schema: &str, kind: ObjectKind, name: &str) -> bool {
        self.claimed.insert((
            schema.to_ascii_lowercase(),
            kind,
            name.to_ascii_lowercase(),
        ))
    }

    /// Returns true if the object has been claimed.
    #[must_use]
    pub fn is_claimed(&self, schema: &str, kind: ObjectKind, name: &str) -> bool {
        self.claimed.contains(&(
            schema.to_ascii_lowercase(),
            kind,
            name.to_ascii_lowercase(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_is_monotonic_and_unique() {
        let mut claims = ClaimSet::new();
        assert!(claims.claim("public", ObjectKind::Table, "users"));
        assert!(!claims.claim("public", ObjectKind::Table, "users"));
        assert!(claims.is_claimed("public", ObjectKind::Table, "users"));
    }

    #[test]
    fn test_claim_is_case_insensitive() {
        let mut claims = ClaimSet::new();
        assert!(claims.claim("Public", ObjectKind::Table, "Users"));
        assert!(claims.is_claimed("public", ObjectKind::Table, "users"));
        assert!(!claims.claim("PUBLIC", ObjectKind::Table, "USERS"));
    }

    #[test]
    fn test_kinds_do_not_collide() {
        let mut claims = ClaimSet::new();
        assert!(claims.claim("public", ObjectKind::Table, "email"));
        assert!(claims.claim("public", ObjectKind::Domain, "email"));
    }
}
