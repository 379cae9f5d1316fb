//! Policies required by the management endpoints.
//!
//! Each name resolves dynamically to a single permission requirement.
crate::declare_policy!(pub UsersRead => "users.read");
crate::declare_policy!(pub UsersWrite => "users.write");
crate::declare_policy!(pub UsersDelete => "users.delete");
crate::declare_policy!(pub RolesRead => "roles.read");
crate::declare_policy!(pub RolesWrite => "roles.write");
