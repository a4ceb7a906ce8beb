//! Liveness and readiness endpoints for container orchestration.
//!
//! Both probes run the same database round trip and differ only in the status
//! words they report. Each request performs its own round trip; nothing is
//! cached between requests.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

/// Body returned by `/healthz` and `/readyz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Which probe is being answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Liveness,
    Readiness,
}

impl ProbeKind {
    pub fn ok_status(self) -> &'static str {
        match self {
            ProbeKind::Liveness => "ok",
            ProbeKind::Readiness => "ready",
        }
    }

    pub fn failed_status(self) -> &'static str {
        match self {
            ProbeKind::Liveness => "error",
            ProbeKind::Readiness => "not_ready",
        }
    }

    fn failure_log(self) -> &'static str {
        match self {
            ProbeKind::Liveness => "Health check failed",
            ProbeKind::Readiness => "Readiness check failed",
        }
    }
}

/// Ping the database and translate the outcome for `kind`.
pub async fn run_probe(state: &AppState, kind: ProbeKind) -> (StatusCode, Json<HealthResponse>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: kind.ok_status(),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, details = ?e, probe = ?kind, "{}", kind.failure_log());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: kind.failed_status(),
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

/// GET /healthz - liveness probe backed by a database round trip.
#[instrument(name = "health::healthz", skip(state))]
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    run_probe(&state, ProbeKind::Liveness).await
}

/// GET /readyz - readiness probe, currently the same check as liveness.
#[instrument(name = "health::readyz", skip(state))]
pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    run_probe(&state, ProbeKind::Readiness).await
}
