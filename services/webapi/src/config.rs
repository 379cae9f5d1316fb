use anyhow::{Context, Result, bail};
use axum::http::HeaderValue;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_MAX_REQUEST_BODY_BYTES: usize = 737_280_000;
pub const DEFAULT_TOKEN_LEEWAY_SECS: u64 = 30;
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
pub const DEVELOPMENT_STATIC_MAX_AGE_SECS: u64 = 600;
pub const PRODUCTION_STATIC_MAX_AGE_SECS: u64 = 604_800;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => bail!("unknown environment: {other}"),
        }
    }
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub leeway_secs: u64,
    /// Lifetime of tokens minted by `/v1/me/token`.
    pub token_ttl_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("leeway_secs", &self.leeway_secs)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

// Web API configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct WebApiConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: Option<PathBuf>,
    pub max_request_body_bytes: usize,
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct WebApiConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    environment: Option<Environment>,
    jwt_secret: Option<String>,
    jwt_leeway_secs: Option<u64>,
    jwt_token_ttl_secs: Option<u64>,
    cors_allowed_origins: Option<Vec<String>>,
    static_dir: Option<PathBuf>,
    max_request_body_bytes: Option<usize>,
    seed_path: Option<PathBuf>,
}

impl WebApiConfig {
    /// Development defaults with the given signing secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            metrics_bind: SocketAddr::from(([127, 0, 0, 1], 0)),
            environment: Environment::Development,
            jwt: JwtConfig {
                secret: jwt_secret.into(),
                leeway_secs: DEFAULT_TOKEN_LEEWAY_SECS,
                token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            },
            cors_allowed_origins: Vec::new(),
            static_dir: None,
            max_request_body_bytes: DEFAULT_MAX_REQUEST_BODY_BYTES,
            seed_path: None,
        }
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        if let Ok(path) = std::env::var("GATEHOUSE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read GATEHOUSE_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from a key lookup without validating it.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("GATEHOUSE_BIND")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .with_context(|| "parse GATEHOUSE_BIND")?;
        let metrics_bind = lookup("GATEHOUSE_METRICS_BIND")
            .unwrap_or_else(|| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse GATEHOUSE_METRICS_BIND")?;
        let environment = match lookup("GATEHOUSE_ENV") {
            Some(value) => value.parse().with_context(|| "parse GATEHOUSE_ENV")?,
            None => Environment::Production,
        };
        let leeway_secs = match lookup("GATEHOUSE_JWT_LEEWAY_SECS") {
            Some(value) => value
                .parse()
                .with_context(|| "parse GATEHOUSE_JWT_LEEWAY_SECS")?,
            None => DEFAULT_TOKEN_LEEWAY_SECS,
        };
        let token_ttl_secs = match lookup("GATEHOUSE_JWT_TTL_SECS") {
            Some(value) => value.parse().with_context(|| "parse GATEHOUSE_JWT_TTL_SECS")?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };
        let max_request_body_bytes = match lookup("GATEHOUSE_MAX_BODY_BYTES") {
            Some(value) => value
                .parse()
                .with_context(|| "parse GATEHOUSE_MAX_BODY_BYTES")?,
            None => DEFAULT_MAX_REQUEST_BODY_BYTES,
        };
        let cors_allowed_origins = lookup("GATEHOUSE_CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            metrics_bind,
            environment,
            jwt: JwtConfig {
                secret: lookup("GATEHOUSE_JWT_SECRET").unwrap_or_default(),
                leeway_secs,
                token_ttl_secs,
            },
            cors_allowed_origins,
            static_dir: lookup("GATEHOUSE_STATIC_DIR").map(PathBuf::from),
            max_request_body_bytes,
            seed_path: lookup("GATEHOUSE_SEED_PATH").map(PathBuf::from),
        })
    }

    pub fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: WebApiConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse webapi config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.environment {
            self.environment = value;
        }
        if let Some(value) = override_cfg.jwt_secret {
            self.jwt.secret = value;
        }
        if let Some(value) = override_cfg.jwt_leeway_secs {
            self.jwt.leeway_secs = value;
        }
        if let Some(value) = override_cfg.jwt_token_ttl_secs {
            self.jwt.token_ttl_secs = value;
        }
        if let Some(value) = override_cfg.cors_allowed_origins {
            self.cors_allowed_origins = value;
        }
        if let Some(value) = override_cfg.static_dir {
            self.static_dir = Some(value);
        }
        if let Some(value) = override_cfg.max_request_body_bytes {
            self.max_request_body_bytes = value;
        }
        if let Some(value) = override_cfg.seed_path {
            self.seed_path = Some(value);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt.secret.trim().is_empty() {
            bail!("GATEHOUSE_JWT_SECRET must be set");
        }
        if self.jwt.token_ttl_secs == 0 {
            bail!("GATEHOUSE_JWT_TTL_SECS must be greater than zero");
        }
        for origin in &self.cors_allowed_origins {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin: {origin}"))?;
        }
        Ok(())
    }

    /// `Cache-Control` value applied to static files.
    pub fn static_cache_control(&self) -> String {
        let max_age = if self.environment.is_development() {
            DEVELOPMENT_STATIC_MAX_AGE_SECS
        } else {
            PRODUCTION_STATIC_MAX_AGE_SECS
        };
        format!("public, max-age={max_age}")
    }
}
