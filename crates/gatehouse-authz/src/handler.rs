//! Permission requirement evaluation against principal claims.
//!
//! # Purpose
//! Decides whether a single requirement is met by the current principal.
//!
//! # Key invariants
//! - Matching is exact and case-sensitive: no wildcard, substring, or
//!   hierarchy expansion.
//! - Only claims of a recognized permission claim type are considered.
//! - The handler holds no mutable state and may be shared across requests.
use crate::{ClaimSet, PERMISSION_CLAIM_TYPE, PermissionRequirement, Principal, Requirement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequirementOutcome {
    Satisfied,
    NotSatisfied,
}

impl RequirementOutcome {
    pub fn is_satisfied(self) -> bool {
        matches!(self, RequirementOutcome::Satisfied)
    }
}

#[derive(Debug, Clone)]
pub struct PermissionAuthorizationHandler {
    claim_types: Vec<String>,
}

impl Default for PermissionAuthorizationHandler {
    fn default() -> Self {
        Self::new(vec![PERMISSION_CLAIM_TYPE.to_string()])
    }
}

impl PermissionAuthorizationHandler {
    /// Create a handler recognizing the given permission claim types.
    pub fn new(claim_types: Vec<String>) -> Self {
        Self { claim_types }
    }

    pub fn claim_types(&self) -> &[String] {
        &self.claim_types
    }

    /// Evaluate a permission requirement against claims.
    ///
    /// # Returns
    /// - [`RequirementOutcome::Satisfied`] if any permission claim value equals
    ///   the required permission exactly.
    ///
    /// # Example
    /// ```rust
    /// use gatehouse_authz::{Claim, ClaimSet, PermissionAuthorizationHandler, PermissionRequirement};
    ///
    /// let handler = PermissionAuthorizationHandler::default();
    /// let claims: ClaimSet = vec![Claim::new("permission", "orders.read")].into();
    /// assert!(handler.evaluate(&PermissionRequirement::new("orders.read"), &claims).is_satisfied());
    /// assert!(!handler.evaluate(&PermissionRequirement::new("orders.write"), &claims).is_satisfied());
    /// ```
    pub fn evaluate(
        &self,
        requirement: &PermissionRequirement,
        claims: &ClaimSet,
    ) -> RequirementOutcome {
        let required = requirement.permission().as_str();
        let granted = claims.iter().any(|claim| {
            claim.value == required && self.claim_types.iter().any(|t| *t == claim.claim_type)
        });
        if granted {
            RequirementOutcome::Satisfied
        } else {
            RequirementOutcome::NotSatisfied
        }
    }

    /// Evaluate any requirement kind for a principal.
    pub fn evaluate_requirement(
        &self,
        requirement: &Requirement,
        principal: &Principal,
    ) -> RequirementOutcome {
        match requirement {
            Requirement::Authenticated if principal.is_authenticated() => {
                RequirementOutcome::Satisfied
            }
            Requirement::Authenticated => RequirementOutcome::NotSatisfied,
            Requirement::Permission(requirement) => self.evaluate(requirement, principal.claims()),
        }
    }
}
