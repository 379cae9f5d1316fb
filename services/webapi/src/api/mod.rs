//! Web API HTTP handlers.
//!
//! # Purpose
//! Exposes route handler modules, shared payload types and error helpers.
pub mod error;
pub mod openapi;
pub mod roles;
pub mod system;
pub mod types;
pub mod users;
