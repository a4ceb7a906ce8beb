//! demo-app: a small HTTP service with database-backed health probes.
//!
//! Serves an informational root endpoint plus `/healthz` and `/readyz`, both
//! of which run a `SELECT 1` through a shared PostgreSQL pool. The
//! [`validate`] module backs the `config-check` binary used as a pipeline gate.

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::{AppConfig, ConfigError};
pub use db::{create_pool, DatabaseProbe};
pub use error::ProbeError;
pub use routes::create_router;
pub use state::AppState;
