//! Request dispatch module
//!
//! Entry point for HTTP request processing: hands the request to the static
//! file engine and falls back to 404/405 when it is declined.

use super::body::channel_body;
use crate::config::AppState;
use crate::http::response::empty_body;
use crate::http::{build_404_response, build_405_response, ResponseBody};
use crate::logger::{self, AccessLogEntry, LogFormat};
use crate::static_files::{BodyTransfer, PreparedResponse, RequestMethod};
use hyper::body::Body;
use hyper::header::{HeaderName, REFERER, USER_AGENT};
use hyper::{Request, Response, Version};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// Handle one request
///
/// `cancel` belongs to the connection; body transfers started here stop
/// when it is cancelled.
pub fn handle_request<B>(
    req: &Request<B>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
    cancel: &CancellationToken,
) -> Response<ResponseBody> {
    let started = Instant::now();

    let (response, body_bytes) = match state.static_files.prepare(req) {
        Some(prepared) => serve_prepared(prepared, state, cancel),
        None => {
            let response = fallback_response(req);
            let body_bytes = response.body().size_hint().exact().unwrap_or(0);
            (response, body_bytes)
        }
    };

    if let Some(format) = &state.access_log_format {
        log_access(req, &response, peer_addr, body_bytes, started, format);
    }
    response
}

/// 405 for methods the engine never serves, 404 otherwise
fn fallback_response<B>(req: &Request<B>) -> Response<ResponseBody> {
    if RequestMethod::from_method(req.method()).is_some() {
        build_404_response()
    } else {
        logger::log_warning(&format!("Method not allowed: {}", req.method()));
        build_405_response()
    }
}

fn serve_prepared(
    prepared: PreparedResponse,
    state: &Arc<AppState>,
    cancel: &CancellationToken,
) -> (Response<ResponseBody>, u64) {
    let PreparedResponse {
        status,
        headers,
        body,
    } = prepared;

    let (body, body_bytes) = match body {
        Some(transfer) => {
            let count = transfer.count;
            (spawn_transfer(transfer, Arc::clone(state), cancel.child_token()), count)
        }
        None => (empty_body(), 0),
    };

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    (response, body_bytes)
}

/// Run the transfer in its own task, feeding the returned body
fn spawn_transfer(
    transfer: BodyTransfer,
    state: Arc<AppState>,
    cancel: CancellationToken,
) -> ResponseBody {
    let (mut writer, body) = channel_body();
    tokio::spawn(async move {
        if let Err(e) = state
            .static_files
            .send_body(&transfer, &mut writer, &cancel)
            .await
        {
            writer.abort(io::Error::other(e.to_string())).await;
        }
    });
    body
}

fn log_access<B>(
    req: &Request<B>,
    response: &Response<ResponseBody>,
    peer_addr: SocketAddr,
    body_bytes: u64,
    started: Instant,
    format: &LogFormat,
) {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = body_bytes;
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry.duration = started.elapsed();

    logger::log_access(&entry, format);
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
