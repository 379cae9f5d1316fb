//! User API handlers.
//!
//! # Purpose
//! Lists, reads, replaces and deletes users, plus `/v1/me` and
//! `/v1/me/token` for the caller.
//! Each handler names its policy through an [`Authorized`] argument.
use crate::api::error::{
    ApiError, api_internal_message, api_not_found, api_store_error, api_unauthorized,
    api_validation_error,
};
use crate::api::types::{MeResponse, TokenResponse, UserListResponse, UserUpsertRequest};
use crate::app::AppState;
use crate::auth::authorize::{AuthenticatedPrincipal, Authorized};
use crate::auth::issue::{IssueError, issue_access_token};
use crate::auth::policies::{UsersDelete, UsersRead, UsersWrite};
use crate::model::User;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use gatehouse_authz::{PERMISSION_CLAIM_TYPE, ROLE_CLAIM_TYPE};

#[utoipa::path(
    get,
    path = "/v1/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Calling principal", body = MeResponse),
        (status = 401, description = "Not authenticated", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn me(AuthenticatedPrincipal(principal): AuthenticatedPrincipal) -> Json<MeResponse> {
    let claims = principal.claims();
    Json(MeResponse {
        name: principal.name().map(str::to_string),
        roles: claims.values_of(ROLE_CLAIM_TYPE).map(str::to_string).collect(),
        permissions: claims
            .values_of(PERMISSION_CLAIM_TYPE)
            .map(str::to_string)
            .collect(),
    })
}

#[utoipa::path(
    post,
    path = "/v1/me/token",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token carrying current permissions", body = TokenResponse),
        (status = 401, description = "Not authenticated", body = crate::api::types::ErrorResponse)
    )
)]
/// Re-issue a token for the caller from its stored roles.
///
/// Role and permission edits reach an existing user through this call.
pub(crate) async fn issue_token(
    AuthenticatedPrincipal(principal): AuthenticatedPrincipal,
    State(state): State<AppState>,
) -> Result<Json<TokenResponse>, ApiError> {
    let name = principal
        .name()
        .ok_or_else(|| api_unauthorized("authentication required"))?;
    let access_token = issue_access_token(state.store.as_ref(), &state.issuer, name)
        .await
        .map_err(|err| match err {
            IssueError::UnknownUser(_) => api_unauthorized("authentication required"),
            IssueError::Store(err) => api_store_error("failed to load user", err),
            IssueError::Token(err) => {
                tracing::error!(error = %err, "token issuance failed");
                api_internal_message("failed to issue token")
            }
        })?;
    tracing::debug!(user = name, "access token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.issuer.ttl().as_secs(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "List users", body = UserListResponse),
        (status = 401, description = "Not authenticated", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_users(
    _auth: Authorized<UsersRead>,
    State(state): State<AppState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let items = state
        .store
        .list_users()
        .await
        .map_err(|err| api_store_error("failed to list users", err))?;
    Ok(Json(UserListResponse { items }))
}

#[utoipa::path(
    get,
    path = "/v1/users/{user_name}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_name" = String, Path, description = "User name")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_user(
    _auth: Authorized<UsersRead>,
    Path(user_name): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .store
        .get_user(&user_name)
        .await
        .map_err(|err| api_store_error("failed to load user", err))?
        .ok_or_else(|| api_not_found("user not found"))?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/v1/users/{user_name}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_name" = String, Path, description = "User name")),
    request_body = UserUpsertRequest,
    responses(
        (status = 200, description = "User stored", body = User),
        (status = 400, description = "Invalid user", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn put_user(
    _auth: Authorized<UsersWrite>,
    Path(user_name): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<UserUpsertRequest>,
) -> Result<Json<User>, ApiError> {
    if user_name.trim().is_empty() {
        return Err(api_validation_error("user name must not be empty"));
    }
    let user = User {
        user_name,
        email: body.email,
        display_name: body.display_name,
        roles: body.roles,
    };
    let stored = state
        .store
        .upsert_user(user)
        .await
        .map_err(|err| api_store_error("failed to store user", err))?;
    Ok(Json(stored))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{user_name}",
    tag = "users",
    security(("bearer" = [])),
    params(("user_name" = String, Path, description = "User name")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse),
        (status = 404, description = "User not found", body = crate::api::types::ErrorResponse)
    )
)]
/// Delete a user.
///
/// Tokens already issued to the user stop authenticating immediately, since
/// every request re-checks that the user exists.
pub(crate) async fn delete_user(
    _auth: Authorized<UsersDelete>,
    Path(user_name): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_user(&user_name)
        .await
        .map_err(|err| api_store_error("failed to delete user", err))?;
    tracing::info!(user = %user_name, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
