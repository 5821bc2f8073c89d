//! OS signal handling.

use crate::lifecycle::Shutdown;

/// Trigger `shutdown` on ctrl-c (SIGINT).
pub fn shutdown_on_ctrl_c(shutdown: Shutdown) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Interrupt received, shutting down");
                shutdown.trigger();
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for ctrl-c"),
        }
    });
}
