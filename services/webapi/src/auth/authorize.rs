//! Endpoint authorization extractors.
//!
//! # Purpose
//! Endpoints declare the policy they need by taking an [`Authorized<P>`]
//! argument, where `P` is a [`PolicyName`] marker type. The extractor resolves
//! `P::NAME` through the shared [`gatehouse_authz::Authorizer`] and rejects
//! the request before the handler body runs.
//!
//! # Key invariants
//! - Missing or failed authentication renders 401 `unauthorized`.
//! - Every other denial renders 403 `forbidden` with the fixed message
//!   `access denied`; the reason is logged and counted, never returned.
//!
//! # Metrics
//! `gatehouse_authz_decisions_total{policy, outcome}` where `outcome` is
//! `granted` or a denial reason label.
use crate::api::error::{ApiError, api_forbidden, api_unauthorized};
use crate::app::AppState;
use crate::auth::authenticate::Authentication;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gatehouse_authz::{AuthorizationDecision, DenialReason, Principal};
use std::marker::PhantomData;

pub const ACCESS_DENIED_MESSAGE: &str = "access denied";

/// Marker for a policy an endpoint requires.
pub trait PolicyName: Send + Sync + 'static {
    const NAME: &'static str;
}

/// Declare a zero-sized [`PolicyName`] marker type.
///
/// ```rust
/// webapi::declare_policy!(pub OrdersRead => "orders.read");
/// use webapi::auth::authorize::PolicyName;
/// assert_eq!(OrdersRead::NAME, "orders.read");
/// ```
#[macro_export]
macro_rules! declare_policy {
    ($(#[$meta:meta])* $vis:vis $ident:ident => $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        $vis struct $ident;

        impl $crate::auth::authorize::PolicyName for $ident {
            const NAME: &'static str = $name;
        }
    };
}

/// Extractor granted only when the caller satisfies policy `P`.
#[derive(Debug)]
pub struct Authorized<P: PolicyName> {
    pub principal: Principal,
    _policy: PhantomData<P>,
}

/// Extractor granted to any authenticated caller (the default policy).
#[derive(Debug)]
pub struct AuthenticatedPrincipal(pub Principal);

#[axum::async_trait]
impl<P: PolicyName> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = principal_from_parts(parts)?;
        let decision = state.authorizer.authorize(P::NAME, &principal);
        enforce(P::NAME, decision)?;
        Ok(Self {
            principal,
            _policy: PhantomData,
        })
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let principal = principal_from_parts(parts)?;
        let decision = state.authorizer.authorize_default(&principal);
        enforce(gatehouse_authz::DEFAULT_POLICY_NAME, decision)?;
        Ok(Self(principal))
    }
}

fn principal_from_parts(parts: &Parts) -> Result<Principal, ApiError> {
    match parts.extensions.get::<Authentication>() {
        Some(Authentication::Authenticated(principal)) => Ok(principal.clone()),
        Some(Authentication::Failed(failure)) => {
            tracing::debug!(reason = failure.as_str(), "authentication failed");
            Err(api_unauthorized("invalid or expired credentials"))
        }
        Some(Authentication::Anonymous) | None => Ok(Principal::anonymous()),
    }
}

/// Map a decision to a rejection, recording it on the way.
pub fn enforce(policy: &'static str, decision: AuthorizationDecision) -> Result<(), ApiError> {
    match decision {
        AuthorizationDecision::Granted => {
            metrics::counter!(
                "gatehouse_authz_decisions_total",
                "policy" => policy,
                "outcome" => "granted"
            )
            .increment(1);
            Ok(())
        }
        AuthorizationDecision::Denied(reason) => {
            metrics::counter!(
                "gatehouse_authz_decisions_total",
                "policy" => policy,
                "outcome" => reason.as_str()
            )
            .increment(1);
            match reason {
                DenialReason::Unauthenticated => Err(api_unauthorized("authentication required")),
                DenialReason::PolicyNotFound { .. } => {
                    tracing::warn!(policy, "authorization denied: no policy resolves this name");
                    Err(api_forbidden(ACCESS_DENIED_MESSAGE))
                }
                DenialReason::RequirementNotSatisfied { permission } => {
                    tracing::info!(
                        policy,
                        permission = permission.as_deref().unwrap_or(""),
                        "authorization denied"
                    );
                    Err(api_forbidden(ACCESS_DENIED_MESSAGE))
                }
            }
        }
    }
}
