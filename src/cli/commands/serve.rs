//! Serve command implementation.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::server;

/// Resolve configuration and run the HTTP server until shutdown.
///
/// # Errors
///
/// Returns [`Error::Config`] for an invalid bind address, or an I/O error if
/// the server cannot start.
pub fn execute(bind: Option<&str>) -> Result<()> {
    let config = ServerConfig::resolve(bind)?;

    // Create tokio runtime for the server
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(server::serve(config))
}
