//! Token minting for stored users.
//!
//! Tokens carry the user's roles and effective permissions at issue time.
//! Later role edits take effect when a new token is issued.
use crate::store::{StoreError, UserStore, effective_permissions};
use gatehouse_authz::{AuthzError, TokenIssuer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Token(#[from] AuthzError),
}

pub async fn issue_access_token(
    store: &dyn UserStore,
    issuer: &TokenIssuer,
    user_name: &str,
) -> Result<String, IssueError> {
    let user = store
        .get_user(user_name)
        .await?
        .ok_or_else(|| IssueError::UnknownUser(user_name.to_string()))?;
    let permissions = effective_permissions(store, &user).await?;
    let token = issuer.issue(
        &user.user_name,
        Some(&user.user_name),
        user.roles.clone(),
        permissions,
    )?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryUserStore;
    use crate::store::seed::{ADMIN_USER, SeedData, seed_store};
    use gatehouse_authz::TokenVerifier;
    use std::time::Duration;

    const SECRET: &[u8] = b"issue-test-secret";

    #[tokio::test]
    async fn issued_token_carries_effective_permissions() {
        let store = InMemoryUserStore::new();
        seed_store(&store, &SeedData::builtin()).await.expect("seed");
        let issuer = TokenIssuer::new(SECRET, Duration::from_secs(60)).expect("issuer");
        let token = issue_access_token(&store, &issuer, ADMIN_USER)
            .await
            .expect("token");
        let claims = TokenVerifier::new(SECRET, 0)
            .expect("verifier")
            .verify(&token)
            .expect("verify");
        assert_eq!(claims.sub, ADMIN_USER);
        assert_eq!(claims.unique_name.as_deref(), Some(ADMIN_USER));
        assert!(claims.permission.contains(&"roles.write".to_string()));
        assert_eq!(claims.role, vec!["Administrator".to_string()]);
    }

    #[tokio::test]
    async fn unknown_user_is_refused() {
        let store = InMemoryUserStore::new();
        let issuer = TokenIssuer::new(SECRET, Duration::from_secs(60)).expect("issuer");
        let err = issue_access_token(&store, &issuer, "ghost")
            .await
            .expect_err("unknown");
        assert!(matches!(err, IssueError::UnknownUser(name) if name == "ghost"));
    }
}
