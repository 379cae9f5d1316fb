//! OpenAPI document for the web API.
//!
//! # Purpose
//! Collects all routes and schema types into the document served at
//! `/swagger/v1/swagger.json`, including the bearer security scheme.
use crate::api::{
    roles, system,
    types::{
        ErrorResponse, HealthStatus, MeResponse, RoleListResponse, RoleUpsertRequest, SystemInfo,
        TokenResponse, UserListResponse, UserUpsertRequest,
    },
    users,
};
use crate::model::{Role, User};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const BEARER_SCHEME: &str = "bearer";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gatehouse-webapi",
        version = "v1",
        description = "Permission-guarded user and role management API"
    ),
    paths(
        system::system_info,
        system::system_health,
        users::me,
        users::issue_token,
        users::list_users,
        users::get_user,
        users::put_user,
        users::delete_user,
        roles::list_roles,
        roles::put_role
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        MeResponse,
        TokenResponse,
        User,
        Role,
        UserListResponse,
        RoleListResponse,
        UserUpsertRequest,
        RoleUpsertRequest
    )),
    modifiers(&BearerSecurity),
    tags(
        (name = "system", description = "Service metadata and health"),
        (name = "users", description = "User management"),
        (name = "roles", description = "Role management")
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
