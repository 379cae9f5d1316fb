mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use common::{TEST_SECRET, TestApp, get, read_json, with_bearer};
use tower::ServiceExt;
use webapi::config::{Environment, WebApiConfig};
use webapi::store::seed::ADMIN_USER;

fn static_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("hello.txt"), "hello").expect("write");
    dir
}

#[tokio::test]
async fn swagger_document_is_served_anonymously() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(get("/swagger/v1/swagger.json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["openapi"].is_string());
    assert!(body["paths"]["/v1/users"].is_object());
}

#[tokio::test]
async fn static_files_use_development_cache_period() {
    let dir = static_dir();
    let mut config = WebApiConfig::new(TEST_SECRET);
    config.static_dir = Some(dir.path().to_path_buf());
    let app = TestApp::with_config(config).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/hello.txt"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=600"
    );
    assert!(response.headers().get(header::STRICT_TRANSPORT_SECURITY).is_none());
}

#[tokio::test]
async fn production_adds_hsts_and_long_cache_period() {
    let dir = static_dir();
    let mut config = WebApiConfig::new(TEST_SECRET);
    config.environment = Environment::Production;
    config.static_dir = Some(dir.path().to_path_buf());
    let app = TestApp::with_config(config).await;

    let response = app
        .router
        .clone()
        .oneshot(get("/hello.txt"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CACHE_CONTROL],
        "public, max-age=604800"
    );
    assert_eq!(
        response.headers()[header::STRICT_TRANSPORT_SECURITY],
        "max-age=2592000"
    );

    let api = app
        .router
        .clone()
        .oneshot(get("/v1/system/health"))
        .await
        .expect("response");
    assert!(api.headers().get(header::STRICT_TRANSPORT_SECURITY).is_some());
}

#[tokio::test]
async fn plain_http_requests_are_served_without_redirect() {
    for environment in [Environment::Development, Environment::Production] {
        let mut config = WebApiConfig::new(TEST_SECRET);
        config.environment = environment;
        let app = TestApp::with_config(config).await;
        let request = Request::builder()
            .method("GET")
            .uri("http://api.example.com/v1/system/health")
            .body(Body::empty())
            .expect("request");
        let response = app.router.clone().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK, "{}", environment.as_str());
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let app = TestApp::new().await;
    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/v1/users")
        .header(header::ORIGIN, "http://localhost:5001")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .expect("request");
    let response = app.router.clone().oneshot(preflight).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn cors_restricts_to_configured_origins() {
    let mut config = WebApiConfig::new(TEST_SECRET);
    config.cors_allowed_origins = vec!["https://app.example.com".to_string()];
    let app = TestApp::with_config(config).await;
    let token = app.token_for(ADMIN_USER).await;

    let mut allowed = with_bearer(get("/v1/users"), &token);
    allowed
        .headers_mut()
        .insert(header::ORIGIN, "https://app.example.com".parse().expect("origin"));
    let response = app.router.clone().oneshot(allowed).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.example.com"
    );

    let mut other = get("/v1/system/health");
    other
        .headers_mut()
        .insert(header::ORIGIN, "https://evil.example.com".parse().expect("origin"));
    let response = app.router.clone().oneshot(other).await.expect("response");
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let mut config = WebApiConfig::new(TEST_SECRET);
    config.max_request_body_bytes = 16;
    let app = TestApp::with_config(config).await;
    let token = app.token_for(ADMIN_USER).await;
    let request = Request::builder()
        .method("PUT")
        .uri("/v1/roles/Big")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(
            serde_json::json!({ "permissions": ["orders.read", "orders.write"] }).to_string(),
        ))
        .expect("request");
    let response = app.router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
