//! Gatehouse web API library crate.
//!
//! # Purpose
//! Hosts a user and role management API whose endpoints are guarded by
//! dynamically resolved permission policies. Exposes configuration, the
//! router, authentication middleware, authorization extractors and the user
//! store for use by the binary and tests.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
