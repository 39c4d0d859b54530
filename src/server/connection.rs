// Connection handling module
// Serves a single accepted TCP connection in its own task

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection unless the connection limit is reached
///
/// `shutdown` is the server-wide token; each connection gets a child of it.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    shutdown: &CancellationToken,
) {
    // Increment counter first, then check limit
    let prev_count = state.connections.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= max_conn {
            state.connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            return;
        }
    }

    logger::log_debug(&format!("Accepted connection from {peer_addr}"));
    tokio::spawn(serve_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        shutdown.child_token(),
    ));
}

/// Serve HTTP/1.1 on the stream until the peer leaves, the timeout hits or
/// the server shuts down
///
/// `cancel` is cancelled when this function returns, which stops any body
/// transfer still running for this connection.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    cancel: CancellationToken,
) {
    let _cancel_on_exit = cancel.clone().drop_guard();
    if let Err(e) = stream.set_nodelay(true) {
        logger::log_debug(&format!("Failed to set TCP_NODELAY for {peer_addr}: {e}"));
    }

    let mut builder = http1::Builder::new();
    builder.keep_alive(state.config.performance.keep_alive);

    let service_state = Arc::clone(&state);
    let service_cancel = cancel.clone();
    let conn = builder.serve_connection(
        TokioIo::new(stream),
        service_fn(move |req| {
            let response =
                handler::handle_request(&req, &service_state, peer_addr, &service_cancel);
            async move { Ok::<_, Infallible>(response) }
        }),
    );
    tokio::pin!(conn);

    let serve = async {
        let mut shutting_down = false;
        loop {
            tokio::select! {
                result = conn.as_mut() => break result,
                () = cancel.cancelled(), if !shutting_down => {
                    shutting_down = true;
                    conn.as_mut().graceful_shutdown();
                }
            }
        }
    };

    let timeout_duration = Duration::from_secs(state.config.performance.connection_timeout);
    match tokio::time::timeout(timeout_duration, serve).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_warning(&format!(
            "Connection from {peer_addr} timed out after {} seconds",
            timeout_duration.as_secs()
        )),
    }

    state.connections.fetch_sub(1, Ordering::SeqCst);
}
