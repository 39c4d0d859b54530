// Signal handling module
//
// SIGINT (Ctrl+C) and, on Unix, SIGTERM request a graceful shutdown.

use crate::logger;
use tokio_util::sync::CancellationToken;

/// Wait for a shutdown signal
#[cfg(unix)]
pub async fn wait_for_shutdown() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            logger::log_warning(&format!("Failed to install SIGTERM handler: {e}"));
            wait_for_ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        () = wait_for_ctrl_c() => {}
        _ = sigterm.recv() => logger::log_info("Received SIGTERM"),
    }
}

/// Wait for a shutdown signal
#[cfg(not(unix))]
pub async fn wait_for_shutdown() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_info("Received Ctrl+C"),
        Err(e) => {
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}

/// Cancel `shutdown` once a shutdown signal arrives
pub fn spawn_shutdown_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        logger::log_info("Shutting down: no new connections, cancelling open transfers");
        shutdown.cancel();
    });
}
