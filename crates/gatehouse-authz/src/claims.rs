//! Claims and principal identity.
//!
//! # Purpose
//! Models the ordered `(type, value)` facts attached to an authenticated
//! identity and the principal that carries them through one request.
//!
//! # Key invariants
//! - Claim order is preserved exactly as supplied.
//! - The authorization layer only reads claims; nothing mutates a principal
//!   after authentication.
use serde::{Deserialize, Serialize};

pub const PERMISSION_CLAIM_TYPE: &str = "permission";
pub const ROLE_CLAIM_TYPE: &str = "role";
pub const NAME_CLAIM_TYPE: &str = "name";
pub const SUBJECT_CLAIM_TYPE: &str = "sub";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// Ordered claims for one identity.
///
/// # Example
/// ```rust
/// use gatehouse_authz::{Claim, ClaimSet};
///
/// let claims: ClaimSet = vec![Claim::new("permission", "orders.read")].into();
/// assert_eq!(claims.values_of("permission").collect::<Vec<_>>(), vec!["orders.read"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Vec<Claim>);

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, claim: Claim) {
        self.0.push(claim);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Claim> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Values of every claim with the given type, in claim order.
    pub fn values_of<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |claim| claim.claim_type == claim_type)
            .map(|claim| claim.value.as_str())
    }

    pub fn first_value(&self, claim_type: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|claim| claim.claim_type == claim_type)
            .map(|claim| claim.value.as_str())
    }
}

impl From<Vec<Claim>> for ClaimSet {
    fn from(claims: Vec<Claim>) -> Self {
        Self(claims)
    }
}

impl<'a> IntoIterator for &'a ClaimSet {
    type Item = &'a Claim;
    type IntoIter = std::slice::Iter<'a, Claim>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Claim> for ClaimSet {
    fn from_iter<I: IntoIterator<Item = Claim>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Identity associated with the current request.
///
/// # Summary
/// Either anonymous (no claims) or authenticated with a [`ClaimSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    claims: ClaimSet,
    authenticated: bool,
}

impl Principal {
    pub fn anonymous() -> Self {
        Self {
            claims: ClaimSet::new(),
            authenticated: false,
        }
    }

    pub fn authenticated(claims: impl Into<ClaimSet>) -> Self {
        Self {
            claims: claims.into(),
            authenticated: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    /// Identity name: the first `name` claim, else the first `sub` claim.
    pub fn name(&self) -> Option<&str> {
        self.claims
            .first_value(NAME_CLAIM_TYPE)
            .or_else(|| self.claims.first_value(SUBJECT_CLAIM_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_order_is_preserved() {
        let claims: ClaimSet = vec![
            Claim::new(PERMISSION_CLAIM_TYPE, "b.read"),
            Claim::new(ROLE_CLAIM_TYPE, "Editor"),
            Claim::new(PERMISSION_CLAIM_TYPE, "a.read"),
        ]
        .into();
        let perms: Vec<_> = claims.values_of(PERMISSION_CLAIM_TYPE).collect();
        assert_eq!(perms, vec!["b.read", "a.read"]);
        assert_eq!(claims.len(), 3);
    }

    #[test]
    fn anonymous_principal_has_no_claims() {
        let principal = Principal::anonymous();
        assert!(!principal.is_authenticated());
        assert!(principal.claims().is_empty());
        assert_eq!(principal.name(), None);
    }

    #[test]
    fn name_prefers_name_claim_over_subject() {
        let principal = Principal::authenticated(vec![
            Claim::new(SUBJECT_CLAIM_TYPE, "user-42"),
            Claim::new(NAME_CLAIM_TYPE, "alice"),
        ]);
        assert_eq!(principal.name(), Some("alice"));

        let subject_only = Principal::authenticated(vec![Claim::new(SUBJECT_CLAIM_TYPE, "user-42")]);
        assert_eq!(subject_only.name(), Some("user-42"));
    }
}
