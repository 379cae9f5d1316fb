#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use gatehouse_authz::TokenIssuer;
use std::sync::Arc;
use webapi::app::{build_router, build_state};
use webapi::auth::issue::issue_access_token;
use webapi::config::WebApiConfig;
use webapi::store::memory::InMemoryUserStore;

pub const TEST_SECRET: &str = "integration-test-secret-0123456789";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryUserStore>,
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(WebApiConfig::new(TEST_SECRET)).await
    }

    pub async fn with_config(config: WebApiConfig) -> Self {
        let store = Arc::new(InMemoryUserStore::new());
        let state = build_state(&config, store.clone()).await.expect("state");
        let issuer = state.issuer.clone();
        Self {
            router: build_router(state, &config),
            store,
            issuer,
        }
    }

    /// Token for a stored user, carrying its effective permissions.
    pub async fn token_for(&self, user_name: &str) -> String {
        issue_access_token(self.store.as_ref(), &self.issuer, user_name)
            .await
            .expect("token")
    }

    /// Token with explicit permissions, whether or not the user is stored.
    pub fn raw_token(&self, user_name: &str, permissions: &[&str]) -> String {
        self.issuer
            .issue(
                user_name,
                Some(user_name),
                vec![],
                permissions.iter().map(|p| p.to_string()).collect(),
            )
            .expect("token")
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        axum::http::header::AUTHORIZATION,
        format!("Bearer {token}").parse().expect("header"),
    );
    request
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}
