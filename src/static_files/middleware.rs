//! Static file middleware
//!
//! Entry point of the engine. [`StaticFileMiddleware::prepare`] evaluates a
//! request and either declines it or returns the status and headers to
//! send; [`StaticFileMiddleware::send_body`] then transfers the body.

use super::compose::PreparedResponse;
use super::context::{Decline, RangeDecision, RequestContext};
use super::options::StaticFileOptions;
use super::transfer::{BodyTransfer, BodyWriter};
use crate::error::TransferError;
use crate::logger;
use hyper::Request;
use tokio_util::sync::CancellationToken;

pub struct StaticFileMiddleware {
    options: StaticFileOptions,
}

impl StaticFileMiddleware {
    pub const fn new(options: StaticFileOptions) -> Self {
        Self { options }
    }

    /// Evaluate a request; `None` means it is left to the next handler
    pub fn prepare<B>(&self, request: &Request<B>) -> Option<PreparedResponse> {
        let ctx = match RequestContext::build(request, &self.options) {
            Ok(ctx) => ctx,
            Err(decline) => {
                log_decline(decline, request);
                return None;
            }
        };

        log_decision(&ctx);
        Some(PreparedResponse::compose(&ctx, &self.options))
    }

    /// Send a prepared body to the writer
    pub async fn send_body<W: BodyWriter>(
        &self,
        transfer: &BodyTransfer,
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, TransferError> {
        logger::log_debug(&format!(
            "Transferring {} bytes of {} from offset {} via {:?}",
            transfer.count,
            transfer.file.subpath,
            transfer.offset,
            transfer.strategy(writer.supports_send_file())
        ));
        let result = transfer
            .run(self.options.file_system.as_ref(), writer, cancel)
            .await;
        match &result {
            Ok(sent) => logger::log_debug(&format!("Sent {sent} bytes of {}", transfer.file.subpath)),
            Err(TransferError::Cancelled) => logger::log_debug(&format!(
                "Transfer of {} cancelled",
                transfer.file.subpath
            )),
            Err(e) => logger::log_warning(&format!(
                "Transfer of {} failed: {e}",
                transfer.file.subpath
            )),
        }
        result
    }
}

fn log_decline<B>(decline: Decline, request: &Request<B>) {
    // Path mismatches are the normal case for requests meant for other handlers
    if decline != Decline::PathMismatch {
        logger::log_debug(&format!(
            "Declined {} {}: {decline}",
            request.method(),
            request.uri().path()
        ));
    }
}

fn log_decision(ctx: &RequestContext) {
    let range = match ctx.range {
        RangeDecision::NotRequested => String::from("none"),
        RangeDecision::Ignored(reason) => format!("ignored ({reason:?})"),
        RangeDecision::NotSatisfiable => String::from("not satisfiable"),
        RangeDecision::Satisfiable(r) => format!("{}-{}", r.start, r.end),
    };
    logger::log_debug(&format!(
        "{} etag={} preconditions={:?} range={} status={}",
        ctx.subpath,
        ctx.validator.etag_quoted,
        ctx.preconditions.state(),
        range,
        ctx.status().as_u16()
    ));
}
