//! Web API application wiring.
//!
//! # Purpose
//! Builds the Axum router from an ordered request [`Pipeline`], and defines
//! the shared application state injected into handlers and extractors.
//!
//! # Pipeline order
//! Stages are listed outermost first. Swagger and static files sit in front
//! of CORS and authentication, so they are served without credentials.
//! Authorization happens last, inside each handler's extractors.
use crate::api;
use crate::api::error::api_internal_message;
use crate::api::openapi::ApiDoc;
use crate::auth::authenticate::authenticate;
use crate::config::{Environment, WebApiConfig};
use crate::observability;
use crate::store::UserStore;
use crate::store::seed::{SeedData, SeedReport, seed_store};
use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};
use gatehouse_authz::{
    Authorizer, PermissionAuthorizationHandler, PermissionPolicyProvider, TokenIssuer, TokenVerifier,
};
use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as CorsAny, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::{SetResponseHeader, SetResponseHeaderLayer};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub const SWAGGER_UI_PATH: &str = "/swagger/ui";
pub const SWAGGER_SPEC_PATH: &str = "/swagger/v1/swagger.json";
pub const HSTS_MAX_AGE_SECS: u64 = 30 * 24 * 60 * 60;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub environment: Environment,
    pub store: Arc<dyn UserStore>,
    pub authorizer: Arc<Authorizer>,
    pub verifier: Arc<TokenVerifier>,
    pub issuer: Arc<TokenIssuer>,
}

/// Build shared state from configuration and seed `store`.
pub async fn build_state(config: &WebApiConfig, store: Arc<dyn UserStore>) -> Result<AppState> {
    let seed = match &config.seed_path {
        Some(path) => SeedData::from_yaml_file(path)?,
        None => SeedData::builtin(),
    };
    let SeedReport {
        roles_created,
        users_created,
    } = seed_store(store.as_ref(), &seed)
        .await
        .context("seed user store")?;
    tracing::debug!(roles_created, users_created, "user store ready");

    let authorizer = Authorizer::new(
        PermissionPolicyProvider::default(),
        PermissionAuthorizationHandler::default(),
    );
    let verifier = TokenVerifier::new(config.jwt.secret.as_bytes(), config.jwt.leeway_secs)
        .context("build token verifier")?;
    let issuer = TokenIssuer::new(
        config.jwt.secret.as_bytes(),
        Duration::from_secs(config.jwt.token_ttl_secs),
    )
    .context("build token issuer")?;

    Ok(AppState {
        api_version: "v1".to_string(),
        environment: config.environment,
        store,
        authorizer: Arc::new(authorizer),
        verifier: Arc::new(verifier),
        issuer: Arc::new(issuer),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Panics render as 500 carrying the panic message.
    DeveloperErrors,
    /// Panics render as a generic 500.
    GenericErrors,
    Hsts {
        max_age_secs: u64,
    },
    Swagger {
        ui_path: &'static str,
        spec_path: &'static str,
    },
    StaticFiles {
        dir: PathBuf,
        cache_control: String,
    },
    Routing,
    Cors {
        origins: Vec<String>,
    },
    Authentication,
    Authorization,
}

/// Ordered request pipeline, outermost stage first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn for_config(config: &WebApiConfig) -> Self {
        let mut stages = Vec::new();
        if config.environment.is_development() {
            stages.push(Stage::DeveloperErrors);
        } else {
            stages.push(Stage::GenericErrors);
            stages.push(Stage::Hsts {
                max_age_secs: HSTS_MAX_AGE_SECS,
            });
        }
        stages.push(Stage::Swagger {
            ui_path: SWAGGER_UI_PATH,
            spec_path: SWAGGER_SPEC_PATH,
        });
        if let Some(dir) = &config.static_dir {
            stages.push(Stage::StaticFiles {
                dir: dir.clone(),
                cache_control: config.static_cache_control(),
            });
        }
        stages.push(Stage::Routing);
        stages.push(Stage::Cors {
            origins: config.cors_allowed_origins.clone(),
        });
        stages.push(Stage::Authentication);
        stages.push(Stage::Authorization);
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route("/v1/me", axum::routing::get(api::users::me))
        .route("/v1/me/token", axum::routing::post(api::users::issue_token))
        .route("/v1/users", axum::routing::get(api::users::list_users))
        .route(
            "/v1/users/:user_name",
            axum::routing::get(api::users::get_user)
                .put(api::users::put_user)
                .delete(api::users::delete_user),
        )
        .route("/v1/roles", axum::routing::get(api::roles::list_roles))
        .route(
            "/v1/roles/:role_name",
            axum::routing::put(api::roles::put_role),
        )
}

pub fn build_router(state: AppState, config: &WebApiConfig) -> Router {
    let pipeline = Pipeline::for_config(config);
    tracing::debug!(stages = ?pipeline.stages(), "building request pipeline");

    let mut router = api_routes();
    // Innermost stage first; each stage wraps everything built so far.
    for stage in pipeline.stages().iter().rev() {
        router = match stage {
            Stage::Authorization | Stage::Routing => router,
            Stage::Authentication => router.layer(axum::middleware::from_fn_with_state(
                state.clone(),
                authenticate,
            )),
            Stage::Cors { origins } => router.layer(cors_layer(origins)),
            Stage::StaticFiles { dir, cache_control } => {
                router.fallback_service(static_files(dir.clone(), cache_control))
            }
            Stage::Swagger { ui_path, spec_path } => {
                router.merge(SwaggerUi::new(*ui_path).url(*spec_path, ApiDoc::openapi()))
            }
            Stage::Hsts { max_age_secs } => router.layer(SetResponseHeaderLayer::if_not_present(
                header::STRICT_TRANSPORT_SECURITY,
                hsts_value(*max_age_secs),
            )),
            Stage::GenericErrors => router.layer(CatchPanicLayer::custom(generic_panic_response)),
            Stage::DeveloperErrors => {
                router.layer(CatchPanicLayer::custom(detailed_panic_response))
            }
        };
    }

    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    router
        .layer(DefaultBodyLimit::max(config.max_request_body_bytes))
        .layer(trace_layer)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny)
}

fn static_files(dir: PathBuf, cache_control: &str) -> SetResponseHeader<ServeDir, HeaderValue> {
    let value = HeaderValue::from_str(cache_control)
        .unwrap_or_else(|_| HeaderValue::from_static("no-cache"));
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, value).layer(ServeDir::new(dir))
}

fn hsts_value(max_age_secs: u64) -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={max_age_secs}"))
        .unwrap_or_else(|_| HeaderValue::from_static("max-age=2592000"))
}

fn detailed_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "handler panicked".to_string()
    };
    tracing::error!(panic = %detail, "request handler panicked");
    api_internal_message(&detail).into_response()
}

fn generic_panic_response(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    api_internal_message("internal server error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_pipeline_order() {
        let mut config = WebApiConfig::new("secret");
        config.static_dir = Some(PathBuf::from("/srv/www"));
        let pipeline = Pipeline::for_config(&config);
        assert_eq!(
            pipeline.stages(),
            &[
                Stage::DeveloperErrors,
                Stage::Swagger {
                    ui_path: SWAGGER_UI_PATH,
                    spec_path: SWAGGER_SPEC_PATH
                },
                Stage::StaticFiles {
                    dir: PathBuf::from("/srv/www"),
                    cache_control: "public, max-age=600".to_string()
                },
                Stage::Routing,
                Stage::Cors { origins: vec![] },
                Stage::Authentication,
                Stage::Authorization,
            ]
        );
    }

    #[test]
    fn production_pipeline_adds_hsts_and_skips_missing_static_dir() {
        let mut config = WebApiConfig::new("secret");
        config.environment = Environment::Production;
        let pipeline = Pipeline::for_config(&config);
        assert_eq!(pipeline.stages()[0], Stage::GenericErrors);
        assert_eq!(
            pipeline.stages()[1],
            Stage::Hsts {
                max_age_secs: HSTS_MAX_AGE_SECS
            }
        );
        assert!(
            !pipeline
                .stages()
                .iter()
                .any(|stage| matches!(stage, Stage::StaticFiles { .. }))
        );
        let auth = pipeline
            .stages()
            .iter()
            .position(|stage| *stage == Stage::Authentication)
            .expect("authentication");
        let authz = pipeline
            .stages()
            .iter()
            .position(|stage| *stage == Stage::Authorization)
            .expect("authorization");
        assert!(auth < authz);
    }

    #[test]
    fn panic_responses_differ_by_detail() {
        let detailed = detailed_panic_response(Box::new("boom".to_string()));
        assert_eq!(detailed.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        let generic = generic_panic_response(Box::new("boom"));
        assert_eq!(generic.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
