//! HTTP server startup logic.

use std::net::{SocketAddr, TcpListener};

use axum::Router;
use axum_server::Handle;

use crate::config::AppConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(String),

    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Start the HTTP server based on configuration.
///
/// The listener is bound before this function awaits anything, so a port that
/// is already taken fails immediately. Returns once the server has shut down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let raw = format!("{}:{}", config.http.host, config.http.port);
    let addr: SocketAddr = raw
        .parse()
        .map_err(|e| ServerError::Address(format!("{raw}: {e}")))?;

    let listener = TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;
    let bound = listener.local_addr()?;

    tracing::info!(
        port = bound.port(),
        environment = %config.environment,
        "Demo app listening on port {}, env={}",
        bound.port(),
        config.environment
    );

    let handle = Handle::new();
    shutdown::setup_shutdown_handler(handle.clone());

    axum_server::from_tcp(listener)
        .handle(handle)
        .serve(app.into_make_service())
        .await
        .map_err(|e| ServerError::Server(e.to_string()))
}
