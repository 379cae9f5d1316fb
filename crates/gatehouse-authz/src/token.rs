//! HS256 access tokens carrying role and permission claims.
//!
//! # Purpose
//! Mints and verifies the bearer tokens whose claims feed the permission
//! handler, and flattens verified claims into a [`Principal`].
//!
//! # Key invariants
//! - Only HS256 is accepted. Signature and expiry are checked; issuer and
//!   audience are not.
//! - `exp` and `sub` are required. Expiry saturates at `i64::MAX` instead of
//!   wrapping for very long lifetimes.
//! - Principal claims keep token order: subject, name, roles, permissions.
use crate::{
    AuthzError, AuthzResult, Claim, ClaimSet, NAME_CLAIM_TYPE, PERMISSION_CLAIM_TYPE, Principal,
    ROLE_CLAIM_TYPE, SUBJECT_CLAIM_TYPE,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub role: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permission: Vec<String>,
    pub iat: i64,
    pub exp: i64,
}

impl AccessClaims {
    /// Flatten into ordered principal claims: subject, name, roles, permissions.
    pub fn into_principal(self) -> Principal {
        let mut claims = ClaimSet::new();
        claims.push(Claim::new(SUBJECT_CLAIM_TYPE, self.sub));
        if let Some(name) = self.unique_name {
            claims.push(Claim::new(NAME_CLAIM_TYPE, name));
        }
        for role in self.role {
            claims.push(Claim::new(ROLE_CLAIM_TYPE, role));
        }
        for permission in self.permission {
            claims.push(Claim::new(PERMISSION_CLAIM_TYPE, permission));
        }
        Principal::authenticated(claims)
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> AuthzResult<Self> {
        if secret.is_empty() {
            return Err(AuthzError::MissingSecret);
        }
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            ttl,
        })
    }

    pub fn issue(
        &self,
        subject: &str,
        name: Option<&str>,
        roles: Vec<String>,
        permissions: Vec<String>,
    ) -> AuthzResult<String> {
        let now = now_epoch_seconds();
        let claims = AccessClaims {
            sub: subject.to_string(),
            unique_name: name.map(str::to_string),
            role: roles,
            permission: permissions,
            iat: now,
            exp: now.saturating_add(i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// HS256 bearer token verifier.
///
/// Issuer and audience are not validated; signature and expiry are.
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    leeway: u64,
}

impl TokenVerifier {
    pub fn new(secret: &[u8], leeway: u64) -> AuthzResult<Self> {
        if secret.is_empty() {
            return Err(AuthzError::MissingSecret);
        }
        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret),
            leeway,
        })
    }

    pub fn verify(&self, token: &str) -> AuthzResult<AccessClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.leeway = self.leeway;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let token = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &validation)?;
        Ok(token.claims)
    }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}
