//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::DatabaseProbe;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// Holds the startup configuration and the database probe. The probe is the
/// process-wide connection pool in production and a stand-in under test.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<dyn DatabaseProbe>,
}

impl AppState {
    /// Creates a new application state from the given configuration and probe.
    pub fn new(config: AppConfig, db: Arc<dyn DatabaseProbe>) -> Self {
        Self {
            config: Arc::new(config),
            db,
        }
    }
}
