//! Root informational endpoint.

use axum::{extract::State, Json};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::config::INFO_MESSAGE;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
    pub environment: String,
    pub time: String,
}

/// GET / - describes the service. Never touches the database.
pub async fn index(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        message: INFO_MESSAGE,
        environment: state.config.environment.clone(),
        time: format_timestamp(Utc::now()),
    })
}

/// RFC 3339, millisecond precision, `Z` suffix.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
