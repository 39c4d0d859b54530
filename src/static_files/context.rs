//! Per-request evaluation context
//!
//! A [`RequestContext`] is built once per request in pipeline order:
//! gate, file lookup and validators, preconditions, then ranges. It is not
//! modified afterwards; the response is derived from it.

use super::gate::{match_path, RequestMethod};
use super::options::StaticFileOptions;
use super::validator::{ResourceDescriptor, Validator};
use crate::fs::FileInfo;
use crate::http::date::parse_http_date;
use crate::http::headers::header_str;
use crate::http::precondition::{PreconditionState, Preconditions};
use crate::http::range::{normalize_range, parse_ranges, ByteRange};
use hyper::header::{IF_RANGE, RANGE};
use hyper::{HeaderMap, Request, StatusCode};
use std::fmt;

/// Why a request is left to other handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decline {
    MethodNotSupported,
    PathMismatch,
    UnsupportedFileType,
    FileNotFound,
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MethodNotSupported => "request method is not supported",
            Self::PathMismatch => "request path does not match the path filter",
            Self::UnsupportedFileType => "request path does not match a supported file type",
            Self::FileNotFound => "request path does not match an existing file",
        })
    }
}

/// Why a Range header did not lead to a partial response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeIgnored {
    Malformed,
    MultipleRanges,
    /// If-Range date is older than the resource
    IfRangeStale,
    /// If-Range entity tag does not match
    IfRangeMismatch,
}

/// Range evaluation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeDecision {
    /// No Range header, not a GET, or preconditions stopped processing
    NotRequested,
    /// Range header present but the full body is served
    Ignored(RangeIgnored),
    NotSatisfiable,
    Satisfiable(ByteRange),
}

/// Evaluate the Range and If-Range headers of a GET request
pub fn evaluate_range(
    headers: &HeaderMap,
    resource: &ResourceDescriptor,
    validator: &Validator,
) -> RangeDecision {
    let Some(header) = header_str(headers, &RANGE) else {
        return RangeDecision::NotRequested;
    };
    let Some(specs) = parse_ranges(header) else {
        return RangeDecision::Ignored(RangeIgnored::Malformed);
    };
    let [spec] = specs.as_slice() else {
        return RangeDecision::Ignored(RangeIgnored::MultipleRanges);
    };

    if let Some(if_range) = header_str(headers, &IF_RANGE) {
        match parse_http_date(if_range) {
            Some(date) if date < resource.last_modified => {
                return RangeDecision::Ignored(RangeIgnored::IfRangeStale);
            }
            Some(_) => {}
            None if if_range != validator.etag_quoted => {
                return RangeDecision::Ignored(RangeIgnored::IfRangeMismatch);
            }
            None => {}
        }
    }

    match normalize_range(*spec, resource.length) {
        Some(range) => RangeDecision::Satisfiable(range),
        None => RangeDecision::NotSatisfiable,
    }
}

/// Everything decided about one request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: RequestMethod,
    pub subpath: String,
    pub file: FileInfo,
    pub content_type: Option<String>,
    pub resource: ResourceDescriptor,
    pub validator: Validator,
    pub preconditions: Preconditions,
    pub range: RangeDecision,
}

impl RequestContext {
    /// Run the evaluation pipeline, or report why the request is not ours
    pub fn build<B>(request: &Request<B>, options: &StaticFileOptions) -> Result<Self, Decline> {
        let method =
            RequestMethod::from_method(request.method()).ok_or(Decline::MethodNotSupported)?;
        let subpath =
            match_path(request.uri().path(), &options.request_path).ok_or(Decline::PathMismatch)?;
        let content_type = lookup_content_type(subpath, options)?;

        let file = options.file_system.file_info(subpath);
        let resource = ResourceDescriptor::from_file(&file).ok_or(Decline::FileNotFound)?;
        let validator = Validator::compute(&resource);

        let headers = request.headers();
        let preconditions =
            Preconditions::evaluate(headers, &validator.etag, resource.last_modified);

        let range = if method == RequestMethod::Get && preconditions.state().allows_processing() {
            evaluate_range(headers, &resource, &validator)
        } else {
            RangeDecision::NotRequested
        };

        Ok(Self {
            method,
            subpath: subpath.to_string(),
            file,
            content_type,
            resource,
            validator,
            preconditions,
            range,
        })
    }

    /// Final status code for this request
    pub fn status(&self) -> StatusCode {
        match self.preconditions.state() {
            PreconditionState::NotModified => StatusCode::NOT_MODIFIED,
            PreconditionState::PreconditionFailed => StatusCode::PRECONDITION_FAILED,
            PreconditionState::Unspecified | PreconditionState::ShouldProcess => match self.range {
                RangeDecision::Satisfiable(_) => StatusCode::PARTIAL_CONTENT,
                RangeDecision::NotSatisfiable => StatusCode::RANGE_NOT_SATISFIABLE,
                RangeDecision::NotRequested | RangeDecision::Ignored(_) => StatusCode::OK,
            },
        }
    }
}

/// Known type, the default type when unknown types are served, or decline
fn lookup_content_type(
    subpath: &str,
    options: &StaticFileOptions,
) -> Result<Option<String>, Decline> {
    match options.content_types.content_type(subpath) {
        Some(content_type) => Ok(Some(content_type)),
        None if options.serve_unknown_file_types => Ok(options.default_content_type.clone()),
        None => Err(Decline::UnsupportedFileType),
    }
}
