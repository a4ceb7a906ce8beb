//! Error types surfaced at the HTTP boundary.

/// Database probe failure.
///
/// Every cause (refused connection, bad credentials, pool timeout) is
/// reported the same way; the message is whatever the client produced.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// No pooled connection within the acquire timeout; `source` is the error
    /// from a direct connection attempt made afterwards.
    #[error("pool timed out while waiting for an open connection: {source}")]
    PoolTimedOut { source: sqlx::Error },

    /// Failure reported by a probe that is not backed by sqlx.
    #[error("{0}")]
    Unavailable(String),
}
