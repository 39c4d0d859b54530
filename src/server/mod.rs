// Server module entry point
// Listener setup, accept loop and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

pub use listener::create_listener;
pub use signal::spawn_shutdown_listener;

use crate::config::AppState;
use crate::logger;
use connection::accept_connection;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Accept connections until `shutdown` is cancelled
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => match accept_result {
                Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state, &shutdown),
                Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
            },
            () = shutdown.cancelled() => break,
        }
    }
    logger::log_info("Stopped accepting connections");
}
