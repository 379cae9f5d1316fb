//! Permission and permission-requirement primitives.
//!
//! # Purpose
//! Defines the permission value, the requirement that wraps it, and the naming
//! convention that decides which policy names are resolved dynamically.
//!
//! # How it fits
//! The policy provider consults [`PermissionConvention`] to accept a policy
//! name, wraps it into a [`PermissionRequirement`], and the authorization
//! handler compares the wrapped [`Permission`] against principal claims.
//!
//! # Key invariants
//! - Any string is a legal [`Permission`]; only policy resolution applies the
//!   naming convention.
//! - A requirement created from a policy name carries that name unchanged.
//!
//! # Examples
//! ```rust
//! use gatehouse_authz::{PermissionConvention, PermissionRequirement};
//!
//! let convention = PermissionConvention::default();
//! assert!(convention.matches("orders.read"));
//! let requirement = PermissionRequirement::new("orders.read");
//! assert_eq!(requirement.permission().as_str(), "orders.read");
//! ```
//!
//! # Common pitfalls
//! - Expecting `orders.*` to cover `orders.read`; matching is exact.
use crate::{AuthzError, AuthzResult};
use serde::{Deserialize, Serialize};

/// Capability name compared case-sensitively against permission claims.
///
/// # Summary
/// Thin owned wrapper around the permission string.
///
/// # Example
/// ```rust
/// use gatehouse_authz::Permission;
///
/// let permission = Permission::new("orders.read");
/// assert_eq!(permission.to_string(), "orders.read");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Create a permission from any string.
    ///
    /// # Parameters
    /// - `name`: the permission identifier.
    ///
    /// # Returns
    /// - A new [`Permission`].
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Permission {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Requirement that a principal holds exactly one permission.
///
/// # Summary
/// Immutable; built once per policy resolution and evaluated once.
///
/// # Example
/// ```rust
/// use gatehouse_authz::PermissionRequirement;
///
/// let requirement = PermissionRequirement::new("users.write");
/// assert_eq!(requirement.permission().as_str(), "users.write");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionRequirement {
    permission: Permission,
}

impl PermissionRequirement {
    pub fn new(permission: impl Into<Permission>) -> Self {
        Self {
            permission: permission.into(),
        }
    }

    pub fn permission(&self) -> &Permission {
        &self.permission
    }
}

/// Naming convention for policy names that resolve to a permission.
///
/// # Summary
/// A name is a permission when it starts with the optional namespace prefix
/// and the remainder has at least two non-empty `.`-separated segments built
/// from ASCII alphanumerics, `_` and `-`.
///
/// # Invariants
/// - Wildcards are never accepted; `orders.*` is not a permission name.
///
/// # Example
/// ```rust
/// use gatehouse_authz::PermissionConvention;
///
/// let convention = PermissionConvention::with_prefix("perm:");
/// assert!(convention.matches("perm:orders.read"));
/// assert!(!convention.matches("orders.read"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionConvention {
    prefix: Option<String>,
}

impl PermissionConvention {
    /// Require names to start with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Return `true` when `name` follows the convention.
    ///
    /// # Performance
    /// - Single pass over the name; no allocation.
    pub fn matches(&self, name: &str) -> bool {
        let body = match &self.prefix {
            Some(prefix) => match name.strip_prefix(prefix.as_str()) {
                Some(rest) => rest,
                None => return false,
            },
            None => name,
        };
        let mut segments = 0usize;
        for segment in body.split('.') {
            if segment.is_empty() || !segment.bytes().all(is_segment_byte) {
                return false;
            }
            segments += 1;
        }
        segments >= 2
    }

    /// Validate a permission name against the convention.
    ///
    /// # Errors
    /// - [`AuthzError::InvalidPermission`] when `name` does not match.
    pub fn validate(&self, name: &str) -> AuthzResult<Permission> {
        if self.matches(name) {
            Ok(Permission::new(name))
        } else {
            Err(AuthzError::InvalidPermission(name.to_string()))
        }
    }
}

fn is_segment_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}
