//! Response composition
//!
//! Turns a finished [`RequestContext`] into a status, a header set and an
//! optional body transfer.

use super::context::{RangeDecision, RequestContext};
use super::gate::RequestMethod;
use super::options::{PrepareResponseContext, StaticFileOptions};
use super::transfer::BodyTransfer;
use crate::http::range::{content_range, unsatisfied_content_range};
use crate::logger;
use hyper::header::{
    HeaderName, HeaderValue, ACCEPT_RANGES, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use hyper::{HeaderMap, StatusCode};

/// Status and headers for a handled request, plus the body still to send
#[derive(Debug)]
pub struct PreparedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `None` when there is nothing to send
    pub body: Option<BodyTransfer>,
}

impl PreparedResponse {
    /// Apply the status rules and the cache policy, then invoke the
    /// response-prepared callback
    pub fn compose(ctx: &RequestContext, options: &StaticFileOptions) -> Self {
        let status = ctx.status();
        let length = ctx.resource.length;
        let mut headers = HeaderMap::new();

        if status.as_u16() < 400 {
            if let Some(content_type) = &ctx.content_type {
                insert_header(&mut headers, CONTENT_TYPE, content_type);
            }
            insert_header(
                &mut headers,
                LAST_MODIFIED,
                &ctx.validator.last_modified_http_date,
            );
            insert_header(&mut headers, ETAG, &ctx.validator.etag_quoted);
            headers.insert(ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        }

        let body = match (status, ctx.range) {
            (StatusCode::PARTIAL_CONTENT, RangeDecision::Satisfiable(range)) => {
                insert_header(&mut headers, CONTENT_RANGE, &content_range(range, length));
                headers.insert(CONTENT_LENGTH, HeaderValue::from(range.content_length()));
                Some(BodyTransfer {
                    file: ctx.file.clone(),
                    offset: range.start,
                    count: range.content_length(),
                })
            }
            (StatusCode::RANGE_NOT_SATISFIABLE, _) => {
                insert_header(&mut headers, CONTENT_RANGE, &unsatisfied_content_range(length));
                None
            }
            (StatusCode::OK, _) => {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
                (ctx.method == RequestMethod::Get && length > 0).then(|| BodyTransfer {
                    file: ctx.file.clone(),
                    offset: 0,
                    count: length,
                })
            }
            _ => None,
        };

        if let Some(policy) = options.cache_policy {
            insert_header(&mut headers, CACHE_CONTROL, &policy.to_header_value());
        }

        let mut response = Self {
            status,
            headers,
            body,
        };

        if let Some(callback) = &options.on_prepare_response {
            let mut prepare_ctx = PrepareResponseContext {
                status: response.status,
                headers: &mut response.headers,
                file: &ctx.file,
            };
            callback(&mut prepare_ctx);
        }

        response
    }
}

fn insert_header(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(value) => {
            headers.insert(name, value);
        }
        Err(e) => logger::log_error(&format!("Invalid {name} header value '{value}': {e}")),
    }
}
