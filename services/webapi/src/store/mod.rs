//! User and role storage.
//!
//! # Purpose
//! Defines the [`UserStore`] seam used by authentication (user existence
//! checks) and by the management endpoints, plus helpers that derive a
//! user's effective permissions from role membership.
use crate::model::{Role, User};
use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

pub mod memory;
pub mod seed;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact user name.
    async fn get_user(&self, user_name: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// Insert or replace a user. Every referenced role must exist.
    async fn upsert_user(&self, user: User) -> StoreResult<User>;
    async fn delete_user(&self, user_name: &str) -> StoreResult<()>;

    async fn get_role(&self, name: &str) -> StoreResult<Option<Role>>;
    async fn list_roles(&self) -> StoreResult<Vec<Role>>;
    async fn upsert_role(&self, role: Role) -> StoreResult<Role>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Union of the permissions granted by the user's roles, sorted and de-duplicated.
///
/// Roles that no longer exist contribute nothing.
pub async fn effective_permissions(
    store: &dyn UserStore,
    user: &User,
) -> StoreResult<Vec<String>> {
    let mut permissions = BTreeSet::new();
    for role_name in &user.roles {
        if let Some(role) = store.get_role(role_name).await? {
            permissions.extend(role.permissions);
        }
    }
    Ok(permissions.into_iter().collect())
}
