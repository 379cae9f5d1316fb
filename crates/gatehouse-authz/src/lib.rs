//! Gatehouse authorization primitives shared by HTTP services.
//!
//! # Purpose
//! Resolves free-form permission names into policies at check time and
//! evaluates them against the claims of the current principal.
//!
//! # How it fits
//! Services verify bearer tokens into a [`Principal`], then endpoints name the
//! permission they need and ask an [`Authorizer`] for a decision. No permission
//! has to be registered before it is used.
//!
//! # Key invariants
//! - A dynamically resolved policy's name equals its single required permission.
//! - Permission matching is exact and case-sensitive.
//! - Providers, handlers and authorizers are immutable and shareable across
//!   concurrent requests.
//!
//! # Important configuration
//! - An optional permission namespace prefix gates dynamic resolution.
//! - Token verification uses a shared HS256 secret.
//!
//! # Examples
//! ```rust
//! use gatehouse_authz::{Authorizer, Claim, Principal};
//!
//! let authorizer = Authorizer::default();
//! let principal = Principal::authenticated(vec![Claim::new("permission", "orders.read")]);
//! assert!(authorizer.authorize("orders.read", &principal).is_granted());
//! assert!(!authorizer.authorize("orders.write", &principal).is_granted());
//! ```
//!
//! # Common pitfalls
//! - Declaring a policy name outside the convention (e.g. `admin`) without
//!   registering a static policy or a fallback: every request is denied.

mod authorizer;
mod claims;
mod errors;
mod handler;
mod permission;
mod policy;
mod provider;
mod token;

pub use authorizer::{AuthorizationDecision, Authorizer, DenialReason};
pub use claims::{
    Claim, ClaimSet, NAME_CLAIM_TYPE, PERMISSION_CLAIM_TYPE, Principal, ROLE_CLAIM_TYPE,
    SUBJECT_CLAIM_TYPE,
};
pub use errors::{AuthzError, AuthzResult};
pub use handler::{PermissionAuthorizationHandler, RequirementOutcome};
pub use permission::{Permission, PermissionConvention, PermissionRequirement};
pub use policy::{Policy, Requirement};
pub use provider::{DEFAULT_POLICY_NAME, PermissionPolicyProvider, PolicyProviderBuilder};
pub use token::{AccessClaims, TokenIssuer, TokenVerifier};
