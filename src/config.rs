//! Configuration loading and constants.
//!
//! All settings come from the process environment and are read exactly once at
//! startup. `AppConfig` is the root configuration struct; `DatabaseConfig` holds
//! everything needed to build the PostgreSQL connection pool.

use sqlx::postgres::{PgConnectOptions, PgSslMode};

// =============================================================================
// Environment Variable Names
// =============================================================================

pub const ENV_PORT: &str = "PORT";
pub const ENV_APP_ENV: &str = "APP_ENV";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_SSL: &str = "DB_SSL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

// =============================================================================
// Defaults
// =============================================================================

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default HTTP listen address (all interfaces, for containers)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default PostgreSQL port
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Deployment label used when APP_ENV is not set
pub const DEFAULT_APP_ENV: &str = "local";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "demo_app=info,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Message returned by the info endpoint
pub const INFO_MESSAGE: &str = "Platform Engineering Assessment demo app";

/// Probes must never be served from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Seconds to wait for in-flight requests on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

/// Seconds a probe may wait for a pooled connection.
///
/// sqlx keeps retrying refused connections until this expires, so it bounds
/// how long `/healthz` and `/readyz` take against a down database.
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// PostgreSQL connection settings
    pub database: DatabaseConfig,
    /// Deployment label echoed by the info endpoint
    pub environment: String,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
}

/// PostgreSQL connection settings
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Encrypt the connection without verifying the server certificate
    pub ssl: bool,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("ssl", &self.ssl)
            .finish()
    }
}

impl DatabaseConfig {
    /// Build sqlx connect options.
    ///
    /// `PgSslMode::Require` negotiates TLS but skips certificate verification,
    /// so self-signed server certificates are accepted.
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    pub format: String,
}

impl LoggingConfig {
    /// Read LOG_FORMAT from the process environment.
    ///
    /// Available before the full configuration so tracing can be set up first.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            format: lookup(ENV_LOG_FORMAT)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string()),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated the same as unset ones. Every missing required
    /// database variable is reported at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let port = parse_port(ENV_PORT, get(ENV_PORT), DEFAULT_PORT)?;
        let db_port = parse_port(ENV_DB_PORT, get(ENV_DB_PORT), DEFAULT_DB_PORT)?;

        let mut missing = Vec::new();
        let mut require = |name: &'static str| match get(name) {
            Some(value) => value,
            None => {
                missing.push(name);
                String::new()
            }
        };

        let db_host = require(ENV_DB_HOST);
        let db_user = require(ENV_DB_USER);
        let db_password = require(ENV_DB_PASSWORD);
        let db_name = require(ENV_DB_NAME);

        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing.join(", ")));
        }

        Ok(Self {
            http: HttpServerConfig {
                host: DEFAULT_HOST.to_string(),
                port,
            },
            database: DatabaseConfig {
                host: db_host,
                port: db_port,
                user: db_user,
                password: db_password,
                name: db_name,
                ssl: lookup(ENV_DB_SSL).as_deref() == Some("true"),
            },
            environment: get(ENV_APP_ENV).unwrap_or_else(|| DEFAULT_APP_ENV.to_string()),
            logging: LoggingConfig::from_lookup(&lookup),
        })
    }
}

fn parse_port(name: &'static str, value: Option<String>, default: u16) -> Result<u16, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variables: {0}")]
    Missing(String),
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
