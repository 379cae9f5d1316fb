//! Role API handlers.
use crate::api::error::{ApiError, api_store_error, api_validation_error};
use crate::api::types::{RoleListResponse, RoleUpsertRequest};
use crate::app::AppState;
use crate::auth::authorize::Authorized;
use crate::auth::policies::{RolesRead, RolesWrite};
use crate::model::Role;
use axum::Json;
use axum::extract::{Path, State};

#[utoipa::path(
    get,
    path = "/v1/roles",
    tag = "roles",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "List roles", body = RoleListResponse),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_roles(
    _auth: Authorized<RolesRead>,
    State(state): State<AppState>,
) -> Result<Json<RoleListResponse>, ApiError> {
    let items = state
        .store
        .list_roles()
        .await
        .map_err(|err| api_store_error("failed to list roles", err))?;
    Ok(Json(RoleListResponse { items }))
}

#[utoipa::path(
    put,
    path = "/v1/roles/{role_name}",
    tag = "roles",
    security(("bearer" = [])),
    params(("role_name" = String, Path, description = "Role name")),
    request_body = RoleUpsertRequest,
    responses(
        (status = 200, description = "Role stored", body = Role),
        (status = 400, description = "Invalid permission name", body = crate::api::types::ErrorResponse),
        (status = 403, description = "Access denied", body = crate::api::types::ErrorResponse)
    )
)]
/// Replace a role's permission list.
///
/// Every permission must follow the naming convention so that a policy of the
/// same name can resolve to it.
pub(crate) async fn put_role(
    _auth: Authorized<RolesWrite>,
    Path(role_name): Path<String>,
    State(state): State<AppState>,
    Json(body): Json<RoleUpsertRequest>,
) -> Result<Json<Role>, ApiError> {
    if role_name.trim().is_empty() {
        return Err(api_validation_error("role name must not be empty"));
    }
    let convention = state.authorizer.provider().convention();
    let mut permissions = Vec::with_capacity(body.permissions.len());
    for name in body.permissions {
        let permission = convention
            .validate(&name)
            .map_err(|err| api_validation_error(&err.to_string()))?;
        permissions.push(permission.into_inner());
    }
    let stored = state
        .store
        .upsert_role(Role {
            name: role_name,
            permissions,
        })
        .await
        .map_err(|err| api_store_error("failed to store role", err))?;
    Ok(Json(stored))
}
