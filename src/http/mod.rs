//! HTTP server module.
//!
//! Serves plain HTTP on the configured port. Binding failures are fatal and
//! reported to the caller. SIGTERM/SIGINT trigger a graceful shutdown that
//! drains in-flight requests.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
