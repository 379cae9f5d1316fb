//! Bearer-token authentication middleware.
//!
//! # Purpose
//! Turns the `Authorization` header into an [`Authentication`] stored in the
//! request extensions. Authorization extractors read it later; this layer
//! never rejects a request on its own so anonymous endpoints keep working.
//!
//! # Key invariants
//! - No header means anonymous; a header that is not a valid bearer token
//!   means failed.
//! - After the signature and expiry check, the named user must still exist in
//!   the store. A missing user fails authentication and is not retried.
use crate::app::AppState;
use crate::store::UserStore;
use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use gatehouse_authz::{Principal, TokenVerifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthenticationFailure {
    MalformedHeader,
    InvalidToken,
    UnknownPrincipal,
    LookupFailed,
}

impl AuthenticationFailure {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthenticationFailure::MalformedHeader => "malformed_header",
            AuthenticationFailure::InvalidToken => "invalid_token",
            AuthenticationFailure::UnknownPrincipal => "unknown_principal",
            AuthenticationFailure::LookupFailed => "lookup_failed",
        }
    }
}

/// Outcome of authenticating one request.
#[derive(Debug, Clone)]
pub enum Authentication {
    Anonymous,
    Authenticated(Principal),
    Failed(AuthenticationFailure),
}

pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let authentication =
        authenticate_headers(state.verifier.as_ref(), state.store.as_ref(), request.headers())
            .await;
    request.extensions_mut().insert(authentication);
    next.run(request).await
}

pub async fn authenticate_headers(
    verifier: &TokenVerifier,
    store: &dyn UserStore,
    headers: &HeaderMap,
) -> Authentication {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Authentication::Anonymous;
    };
    let Some(token) = value.to_str().ok().and_then(bearer_token) else {
        return Authentication::Failed(AuthenticationFailure::MalformedHeader);
    };
    match verifier.verify(token) {
        Ok(claims) => on_token_validated(store, claims.into_principal()).await,
        Err(err) => {
            tracing::debug!(error = %err, "bearer token rejected");
            Authentication::Failed(AuthenticationFailure::InvalidToken)
        }
    }
}

/// Extract the credentials of a `Bearer` header. The scheme name is matched
/// case-insensitively.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Confirm that a principal backed by a valid token still maps to a stored user.
pub async fn on_token_validated(store: &dyn UserStore, principal: Principal) -> Authentication {
    let Some(name) = principal.name() else {
        return Authentication::Failed(AuthenticationFailure::UnknownPrincipal);
    };
    match store.get_user(name).await {
        Ok(Some(_)) => Authentication::Authenticated(principal),
        Ok(None) => {
            tracing::info!(user = name, "token rejected: user no longer exists");
            Authentication::Failed(AuthenticationFailure::UnknownPrincipal)
        }
        Err(err) => {
            tracing::warn!(user = name, error = ?err, "user lookup failed during authentication");
            Authentication::Failed(AuthenticationFailure::LookupFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::store::memory::InMemoryUserStore;
    use axum::http::HeaderValue;
    use gatehouse_authz::TokenIssuer;
    use std::time::Duration;

    const SECRET: &[u8] = b"authenticate-test-secret";

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).expect("header"));
        headers
    }

    async fn store_with(user: &str) -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        store.upsert_user(User::new(user)).await.expect("user");
        store
    }

    fn token_for(user: &str) -> String {
        TokenIssuer::new(SECRET, Duration::from_secs(60))
            .expect("issuer")
            .issue(user, Some(user), vec![], vec!["users.read".to_string()])
            .expect("token")
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = InMemoryUserStore::new();
        let outcome = authenticate_headers(&verifier, &store, &HeaderMap::new()).await;
        assert!(matches!(outcome, Authentication::Anonymous));
    }

    #[tokio::test]
    async fn non_bearer_header_fails() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = InMemoryUserStore::new();
        let outcome = authenticate_headers(&verifier, &store, &headers_with("Basic YWxpY2U6cHc="))
            .await;
        assert!(matches!(
            outcome,
            Authentication::Failed(AuthenticationFailure::MalformedHeader)
        ));
    }

    #[tokio::test]
    async fn garbage_token_fails() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = store_with("alice").await;
        let outcome =
            authenticate_headers(&verifier, &store, &headers_with("Bearer not-a-jwt")).await;
        assert!(matches!(
            outcome,
            Authentication::Failed(AuthenticationFailure::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn valid_token_for_existing_user_authenticates() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = store_with("alice").await;
        let header = format!("Bearer {}", token_for("alice"));
        match authenticate_headers(&verifier, &store, &headers_with(&header)).await {
            Authentication::Authenticated(principal) => {
                assert_eq!(principal.name(), Some("alice"));
                assert_eq!(
                    principal.claims().values_of("permission").collect::<Vec<_>>(),
                    vec!["users.read"]
                );
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn bearer_scheme_name_ignores_case() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Bearerabc"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[tokio::test]
    async fn lowercase_scheme_authenticates() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = store_with("alice").await;
        let header = format!("bearer {}", token_for("alice"));
        let outcome = authenticate_headers(&verifier, &store, &headers_with(&header)).await;
        assert!(matches!(outcome, Authentication::Authenticated(_)));
    }

    #[tokio::test]
    async fn valid_token_for_missing_user_fails() {
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let store = store_with("alice").await;
        let header = format!("Bearer {}", token_for("mallory"));
        let outcome = authenticate_headers(&verifier, &store, &headers_with(&header)).await;
        assert!(matches!(
            outcome,
            Authentication::Failed(AuthenticationFailure::UnknownPrincipal)
        ));
    }
}
