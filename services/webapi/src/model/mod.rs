//! Identity data model.
//!
//! # Purpose
//! Re-exports the user and role records shared by the API and store layers.
mod role;
mod user;

pub use role::Role;
pub use user::User;
