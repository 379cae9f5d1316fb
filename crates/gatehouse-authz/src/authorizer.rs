//! Policy resolution plus conjunctive requirement evaluation.
//!
//! # Purpose
//! Turns a policy name and a principal into a grant/deny decision.
//!
//! # How it fits
//! HTTP extractors call [`Authorizer::authorize`] with the name an endpoint
//! declares. The decision is a value; callers map denials to responses.
//!
//! # Key invariants
//! - Unauthenticated principals are denied before any requirement runs.
//! - Every requirement of the policy must be satisfied.
//! - Unresolvable names use the fallback policy when configured, otherwise
//!   they are denied; resolution failures never escape as errors.
use crate::{
    AuthzError, PermissionAuthorizationHandler, PermissionPolicyProvider, Policy, Principal,
    Requirement,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenialReason {
    Unauthenticated,
    PolicyNotFound { policy: String },
    RequirementNotSatisfied { permission: Option<String> },
}

impl DenialReason {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Unauthenticated => "unauthenticated",
            DenialReason::PolicyNotFound { .. } => "policy_not_found",
            DenialReason::RequirementNotSatisfied { .. } => "requirement_not_satisfied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationDecision {
    Granted,
    Denied(DenialReason),
}

impl AuthorizationDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AuthorizationDecision::Granted)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    provider: PermissionPolicyProvider,
    handler: PermissionAuthorizationHandler,
}

impl Authorizer {
    pub fn new(provider: PermissionPolicyProvider, handler: PermissionAuthorizationHandler) -> Self {
        Self { provider, handler }
    }

    pub fn provider(&self) -> &PermissionPolicyProvider {
        &self.provider
    }

    pub fn handler(&self) -> &PermissionAuthorizationHandler {
        &self.handler
    }

    /// Resolve `policy_name` and evaluate it for `principal`.
    ///
    /// # Example
    /// ```rust
    /// use gatehouse_authz::{AuthorizationDecision, Authorizer, Claim, DenialReason, Principal};
    ///
    /// let authorizer = Authorizer::default();
    /// let alice = Principal::authenticated(vec![Claim::new("permission", "orders.read")]);
    /// assert!(authorizer.authorize("orders.read", &alice).is_granted());
    /// assert!(matches!(
    ///     authorizer.authorize("admin", &alice),
    ///     AuthorizationDecision::Denied(DenialReason::PolicyNotFound { .. })
    /// ));
    /// ```
    pub fn authorize(&self, policy_name: &str, principal: &Principal) -> AuthorizationDecision {
        if !principal.is_authenticated() {
            return AuthorizationDecision::Denied(DenialReason::Unauthenticated);
        }
        match self.provider.get_policy(policy_name) {
            Ok(policy) => self.authorize_policy(&policy, principal),
            Err(AuthzError::PolicyNotFound(policy)) => match self.provider.get_fallback_policy() {
                Some(fallback) => self.authorize_policy(&fallback, principal),
                None => AuthorizationDecision::Denied(DenialReason::PolicyNotFound { policy }),
            },
            Err(_) => AuthorizationDecision::Denied(DenialReason::PolicyNotFound {
                policy: policy_name.to_string(),
            }),
        }
    }

    /// Evaluate the provider's default (authenticated-only) policy.
    pub fn authorize_default(&self, principal: &Principal) -> AuthorizationDecision {
        self.authorize_policy(&self.provider.get_default_policy(), principal)
    }

    /// Evaluate an already resolved policy.
    pub fn authorize_policy(&self, policy: &Policy, principal: &Principal) -> AuthorizationDecision {
        if !principal.is_authenticated() {
            return AuthorizationDecision::Denied(DenialReason::Unauthenticated);
        }
        for requirement in policy.requirements() {
            if !self
                .handler
                .evaluate_requirement(requirement, principal)
                .is_satisfied()
            {
                let permission = match requirement {
                    Requirement::Permission(requirement) => {
                        Some(requirement.permission().to_string())
                    }
                    Requirement::Authenticated => None,
                };
                return AuthorizationDecision::Denied(DenialReason::RequirementNotSatisfied {
                    permission,
                });
            }
        }
        AuthorizationDecision::Granted
    }
}
