//! Policies and their requirements.
//!
//! # Purpose
//! A policy is a named bundle of requirements that must all hold.
//!
//! # Key invariants
//! - Requirements are evaluated conjunctively.
//! - A policy produced by [`Policy::for_permission`] carries exactly one
//!   permission requirement whose permission equals the policy name.
use crate::PermissionRequirement;

/// Single condition a principal must meet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// The principal must be authenticated.
    Authenticated,
    /// The principal must hold a permission claim.
    Permission(PermissionRequirement),
}

impl From<PermissionRequirement> for Requirement {
    fn from(requirement: PermissionRequirement) -> Self {
        Requirement::Permission(requirement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Policy {
    name: String,
    requirements: Vec<Requirement>,
}

impl Policy {
    pub fn new(name: impl Into<String>, requirements: Vec<Requirement>) -> Self {
        Self {
            name: name.into(),
            requirements,
        }
    }

    /// Policy requiring exactly the permission named `name`.
    ///
    /// # Example
    /// ```rust
    /// use gatehouse_authz::{Policy, Requirement};
    ///
    /// let policy = Policy::for_permission("orders.read");
    /// assert_eq!(policy.requirements().len(), 1);
    /// assert!(matches!(&policy.requirements()[0], Requirement::Permission(_)));
    /// ```
    pub fn for_permission(name: impl Into<String>) -> Self {
        let name = name.into();
        let requirement = PermissionRequirement::new(name.clone());
        Self::new(name, vec![requirement.into()])
    }

    /// Policy satisfied by any authenticated principal.
    pub fn authenticated(name: impl Into<String>) -> Self {
        Self::new(name, vec![Requirement::Authenticated])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }
}
