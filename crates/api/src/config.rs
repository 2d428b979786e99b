//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRAILPOST_DATABASE_URL` - `PostgreSQL` connection string (postgres store only)
//!
//! ## Optional
//! - `TRAILPOST_STORE` - Storage backend: `postgres` (default) or `memory`
//! - `TRAILPOST_HOST` - Bind address (default: 127.0.0.1)
//! - `TRAILPOST_PORT` - Listen port (default: 3000)
//! - `TRAILPOST_BASE_URL` - Public base URL (default: `http://localhost:3000`)
//! - `TRAILPOST_ALLOWED_ORIGINS` - Comma-separated CORS origin allowlist
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `PostgreSQL`-backed favorites store (production).
    Postgres,
    /// In-process store (local development and tests).
    Memory,
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Which favorites store to use.
    pub store: StoreBackend,
    /// `PostgreSQL` database connection URL (contains password).
    ///
    /// `None` only when the memory backend is selected.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL for the API (determines secure cookies).
    pub base_url: String,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking.
    pub sentry_dsn: Option<String>,
    /// Sentry environment name.
    pub sentry_environment: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let store = match optional_env("TRAILPOST_STORE").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "TRAILPOST_STORE".to_owned(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let database_url = match store {
            StoreBackend::Postgres => {
                Some(SecretString::from(required_env("TRAILPOST_DATABASE_URL")?))
            }
            StoreBackend::Memory => optional_env("TRAILPOST_DATABASE_URL").map(SecretString::from),
        };

        let host = optional_env("TRAILPOST_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_owned())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRAILPOST_HOST".to_owned(), e.to_string()))?;

        let port = optional_env("TRAILPOST_PORT")
            .unwrap_or_else(|| "3000".to_owned())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRAILPOST_PORT".to_owned(), e.to_string()))?;

        let base_url =
            optional_env("TRAILPOST_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let allowed_origins = optional_env("TRAILPOST_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            store,
            database_url,
            host,
            port,
            base_url,
            allowed_origins,
            sentry_dsn: optional_env("SENTRY_DSN"),
            sentry_environment: optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the service is reached over HTTPS (secure session cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Read a required environment variable.
fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

/// Read an optional environment variable, treating empty values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
