//! Request authentication and endpoint authorization.
//!
//! # Purpose
//! - [`authenticate`] verifies bearer tokens, confirms the user still exists
//!   and records the outcome in request extensions.
//! - [`authorize`] provides extractors through which endpoints declare the
//!   policy they need.
//! - [`issue`] mints tokens for stored users.
pub mod authenticate;
pub mod authorize;
pub mod issue;
pub mod policies;
