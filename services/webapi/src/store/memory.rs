//! In-memory implementation of the user store.
//!
//! # Purpose
//! Keeps users and roles in `BTreeMap`s guarded by `tokio::sync::RwLock`, for
//! local development, tests and deployments that seed their identities at
//! startup.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Reads take read locks and run concurrently; writes are serialized per map.
//! - Listing is ordered by name.
//!
//! # Metrics
//! Updates `gatehouse_users_total` and `gatehouse_roles_total` gauges on writes.
use super::{StoreError, StoreResult, UserStore};
use crate::model::{Role, User};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<String, User>>,
    roles: RwLock<BTreeMap<String, Role>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, user_name: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.get(user_name).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn upsert_user(&self, user: User) -> StoreResult<User> {
        {
            let roles = self.roles.read().await;
            if let Some(missing) = user.roles.iter().find(|role| !roles.contains_key(*role)) {
                return Err(StoreError::UnknownRole(missing.clone()));
            }
        }
        let mut users = self.users.write().await;
        users.insert(user.user_name.clone(), user.clone());
        metrics::gauge!("gatehouse_users_total").set(users.len() as f64);
        Ok(user)
    }

    async fn delete_user(&self, user_name: &str) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if users.remove(user_name).is_none() {
            return Err(StoreError::NotFound(format!("user {user_name}")));
        }
        metrics::gauge!("gatehouse_users_total").set(users.len() as f64);
        Ok(())
    }

    async fn get_role(&self, name: &str) -> StoreResult<Option<Role>> {
        Ok(self.roles.read().await.get(name).cloned())
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        Ok(self.roles.read().await.values().cloned().collect())
    }

    async fn upsert_role(&self, role: Role) -> StoreResult<Role> {
        let mut roles = self.roles.write().await;
        roles.insert(role.name.clone(), role.clone());
        metrics::gauge!("gatehouse_roles_total").set(roles.len() as f64);
        Ok(role)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
