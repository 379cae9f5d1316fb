//! Dynamic permission policy provider.
//!
//! # Purpose
//! Resolves policy names into [`Policy`] values at authorization-check time
//! without registering every permission up front.
//!
//! # How it fits
//! Endpoints declare a policy name; the authorizer asks this provider for the
//! policy and hands each requirement to the authorization handler.
//!
//! # Key invariants
//! - Resolution is pure: the provider is immutable after [`build`] and two
//!   resolutions of the same name are structurally equal.
//! - Permission-style names always win over static policies of the same name.
//!
//! # Examples
//! ```rust
//! use gatehouse_authz::{AuthzError, PermissionPolicyProvider};
//!
//! let provider = PermissionPolicyProvider::default();
//! let policy = provider.get_policy("orders.read").expect("dynamic policy");
//! assert_eq!(policy.name(), "orders.read");
//! assert!(matches!(provider.get_policy("admin"), Err(AuthzError::PolicyNotFound(_))));
//! ```
//!
//! [`build`]: PolicyProviderBuilder::build
use crate::{AuthzError, AuthzResult, PermissionConvention, Policy};
use std::collections::HashMap;

pub const DEFAULT_POLICY_NAME: &str = "default";

#[derive(Debug, Clone)]
pub struct PermissionPolicyProvider {
    convention: PermissionConvention,
    static_policies: HashMap<String, Policy>,
    default_policy: Policy,
    fallback_policy: Option<Policy>,
}

impl Default for PermissionPolicyProvider {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PermissionPolicyProvider {
    pub fn builder() -> PolicyProviderBuilder {
        PolicyProviderBuilder::default()
    }

    /// Resolve a policy name.
    ///
    /// # Parameters
    /// - `name`: the policy name declared by the endpoint.
    ///
    /// # Returns
    /// - A fresh single-requirement policy when `name` follows the permission
    ///   convention, otherwise a registered static policy.
    ///
    /// # Errors
    /// - [`AuthzError::PolicyNotFound`] when neither applies.
    pub fn get_policy(&self, name: &str) -> AuthzResult<Policy> {
        if self.convention.matches(name) {
            return Ok(Policy::for_permission(name));
        }
        self.static_policies
            .get(name)
            .cloned()
            .ok_or_else(|| AuthzError::PolicyNotFound(name.to_string()))
    }

    /// Policy used when an endpoint declares no permission: authenticated only.
    pub fn get_default_policy(&self) -> Policy {
        self.default_policy.clone()
    }

    /// Policy applied when a name cannot be resolved; `None` denies.
    pub fn get_fallback_policy(&self) -> Option<Policy> {
        self.fallback_policy.clone()
    }

    pub fn convention(&self) -> &PermissionConvention {
        &self.convention
    }
}

#[derive(Debug, Clone, Default)]
pub struct PolicyProviderBuilder {
    convention: PermissionConvention,
    static_policies: HashMap<String, Policy>,
    default_policy: Option<Policy>,
    fallback_policy: Option<Policy>,
}

impl PolicyProviderBuilder {
    /// Only names starting with `prefix` resolve dynamically.
    pub fn namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.convention = PermissionConvention::with_prefix(prefix);
        self
    }

    /// Register a named policy for names outside the permission convention.
    pub fn static_policy(mut self, policy: Policy) -> Self {
        self.static_policies.insert(policy.name().to_string(), policy);
        self
    }

    pub fn default_policy(mut self, policy: Policy) -> Self {
        self.default_policy = Some(policy);
        self
    }

    pub fn fallback_policy(mut self, policy: Policy) -> Self {
        self.fallback_policy = Some(policy);
        self
    }

    pub fn build(self) -> PermissionPolicyProvider {
        PermissionPolicyProvider {
            convention: self.convention,
            static_policies: self.static_policies,
            default_policy: self
                .default_policy
                .unwrap_or_else(|| Policy::authenticated(DEFAULT_POLICY_NAME)),
            fallback_policy: self.fallback_policy,
        }
    }
}
