//! System/health API handlers.
//!
//! # Purpose and responsibility
//! Lightweight anonymous endpoints for service metadata and health checks.
//!
//! # Key invariants and assumptions
//! - Health checks are fast and side-effect free.
//! - Both endpoints stay reachable without credentials, even when a request
//!   carries an invalid token.
use crate::api::error::{ApiError, api_internal};
use crate::api::types::{HealthStatus, SystemInfo};
use crate::app::AppState;
use axum::Json;
use axum::extract::State;

#[utoipa::path(
    get,
    path = "/v1/system/info",
    tag = "system",
    responses(
        (status = 200, description = "Service identity", body = SystemInfo)
    )
)]
pub(crate) async fn system_info(State(state): State<AppState>) -> Json<SystemInfo> {
    Json(SystemInfo {
        api_version: state.api_version.clone(),
        environment: state.environment.as_str().to_string(),
        store_backend: state.store.backend_name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "User store unavailable", body = crate::api::types::ErrorResponse)
    )
)]
/// Return service health.
///
/// # Errors
/// - Returns 500 if the user store health check fails.
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    if let Err(err) = state.store.health_check().await {
        return Err(api_internal("storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
    }))
}
