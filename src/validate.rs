//! Pre-deployment configuration check.
//!
//! Verifies that every variable the service needs is present before it is
//! deployed. Used by the `config-check` binary as a pipeline gate.

use crate::config::{ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_USER, ENV_PORT};

/// Variables that must be set and non-empty, in reporting order.
pub const REQUIRED_VARS: [&str; 5] = [
    ENV_PORT,
    ENV_DB_HOST,
    ENV_DB_USER,
    ENV_DB_NAME,
    ENV_DB_PASSWORD,
];

/// One or more required variables are absent or empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Config health check failed. Missing env vars: {}", .missing.join(", "))]
pub struct MissingVars {
    pub missing: Vec<&'static str>,
}

/// Check all required variables through `lookup`.
///
/// Fails with every missing name, never just the first.
pub fn check_required<F>(lookup: F) -> Result<(), MissingVars>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<&'static str> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|name| lookup(name).filter(|value| !value.is_empty()).is_none())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingVars { missing })
    }
}

/// Check the current process environment.
///
/// A value that is not valid UTF-8 still counts as present.
pub fn check_env() -> Result<(), MissingVars> {
    check_required(|name| {
        std::env::var_os(name)
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string_lossy().into_owned())
    })
}
