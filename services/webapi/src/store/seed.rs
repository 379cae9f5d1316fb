//! Startup seeding of roles and users.
//!
//! Seed data comes from a YAML file when configured, otherwise from a built-in
//! `Administrator` role and `admin` user. Entries that already exist are left
//! untouched, so seeding twice is a no-op.
use super::{StoreResult, UserStore};
use crate::model::{Role, User};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const ADMINISTRATOR_ROLE: &str = "Administrator";
pub const ADMIN_USER: &str = "admin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub users_created: usize,
}

impl SeedData {
    pub fn builtin() -> Self {
        Self {
            roles: vec![Role::new(
                ADMINISTRATOR_ROLE,
                [
                    "users.read",
                    "users.write",
                    "users.delete",
                    "roles.read",
                    "roles.write",
                ],
            )],
            users: vec![User {
                user_name: ADMIN_USER.to_string(),
                email: None,
                display_name: Some("Administrator".to_string()),
                roles: vec![ADMINISTRATOR_ROLE.to_string()],
            }],
        }
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents).with_context(|| "parse seed yaml")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read seed file: {}", path.display()))?;
        Self::from_yaml_str(&contents)
    }
}

pub async fn seed_store(store: &dyn UserStore, seed: &SeedData) -> StoreResult<SeedReport> {
    let mut report = SeedReport::default();
    // Roles first so user role references resolve.
    for role in &seed.roles {
        if store.get_role(&role.name).await?.is_none() {
            store.upsert_role(role.clone()).await?;
            report.roles_created += 1;
        }
    }
    for user in &seed.users {
        if store.get_user(&user.user_name).await?.is_none() {
            store.upsert_user(user.clone()).await?;
            report.users_created += 1;
        }
    }
    tracing::info!(
        backend = store.backend_name(),
        roles_created = report.roles_created,
        users_created = report.users_created,
        "seeded user store"
    );
    Ok(report)
}
