//! PostgreSQL pool construction and the connectivity probe.
//!
//! Handlers depend on [`DatabaseProbe`] rather than on `PgPool` directly, so
//! the round trip can be replaced in tests.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use sqlx::Connection;

use crate::config::{DatabaseConfig, DB_ACQUIRE_TIMEOUT_SECS};
use crate::error::ProbeError;

/// Minimal query that only needs a working connection
pub const PROBE_QUERY: &str = "SELECT 1";

/// Something that can confirm the database is reachable.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    /// Run one round trip. Errors are returned unclassified.
    async fn ping(&self) -> Result<(), ProbeError>;
}

#[async_trait]
impl DatabaseProbe for PgPool {
    async fn ping(&self) -> Result<(), ProbeError> {
        match sqlx::query(PROBE_QUERY).execute(self).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::PoolTimedOut) => Err(explain_timeout(self).await),
            Err(e) => Err(e.into()),
        }
    }
}

/// Recover the cause behind a pool timeout.
///
/// The pool retries failed connects internally and only reports
/// `PoolTimedOut`, so one direct connection attempt is made to surface the
/// underlying error (refused, auth failure, DNS).
async fn explain_timeout(pool: &PgPool) -> ProbeError {
    let options = pool.connect_options();
    let attempt = tokio::time::timeout(acquire_timeout(), PgConnection::connect_with(&options));

    match attempt.await {
        Ok(Err(source)) => ProbeError::PoolTimedOut { source },
        Ok(Ok(conn)) => {
            let _ = conn.close().await;
            ProbeError::Database(sqlx::Error::PoolTimedOut)
        }
        Err(_) => ProbeError::Database(sqlx::Error::PoolTimedOut),
    }
}

fn acquire_timeout() -> Duration {
    Duration::from_secs(DB_ACQUIRE_TIMEOUT_SECS)
}

/// Create the shared connection pool.
///
/// Connections are opened lazily on first use, so startup does not depend on
/// the database being reachable.
pub fn create_pool(config: &DatabaseConfig) -> PgPool {
    pool_options().connect_lazy_with(config.connect_options())
}

/// Pool options used by [`create_pool`].
///
/// The acquire timeout is shortened from the sqlx default of 30 s so a probe
/// against a down database answers within a few seconds.
pub fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new().acquire_timeout(acquire_timeout())
}
