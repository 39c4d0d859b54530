//! Static file serving options

use crate::fs::{FileInfo, FileSystem};
use crate::http::cache::CachePolicy;
use crate::http::mime::{ContentTypeProvider, ExtensionContentTypeProvider};
use hyper::{HeaderMap, StatusCode};
use std::sync::Arc;

/// What the response-prepared callback can see and change
pub struct PrepareResponseContext<'a> {
    pub status: StatusCode,
    pub headers: &'a mut HeaderMap,
    pub file: &'a FileInfo,
}

/// Invoked once per handled request after the core headers are set and
/// before any body is transferred
pub type PrepareResponseCallback = Arc<dyn Fn(&mut PrepareResponseContext<'_>) + Send + Sync>;

/// Static file serving options
#[derive(Clone)]
pub struct StaticFileOptions {
    /// Match prefix, e.g. `/static`; empty matches every path
    pub request_path: String,
    pub file_system: Arc<dyn FileSystem>,
    pub content_types: Arc<dyn ContentTypeProvider>,
    /// Content type for unknown extensions when those are served
    pub default_content_type: Option<String>,
    /// Serve files whose extension has no known content type
    pub serve_unknown_file_types: bool,
    /// Sent as Cache-Control on every handled response
    pub cache_policy: Option<CachePolicy>,
    pub on_prepare_response: Option<PrepareResponseCallback>,
}

impl StaticFileOptions {
    pub fn new(file_system: Arc<dyn FileSystem>) -> Self {
        Self {
            request_path: String::new(),
            file_system,
            content_types: Arc::new(ExtensionContentTypeProvider::new()),
            default_content_type: None,
            serve_unknown_file_types: false,
            cache_policy: None,
            on_prepare_response: None,
        }
    }

    #[must_use]
    pub fn request_path(mut self, path: impl Into<String>) -> Self {
        self.request_path = path.into();
        self
    }

    #[must_use]
    pub fn content_types(mut self, provider: Arc<dyn ContentTypeProvider>) -> Self {
        self.content_types = provider;
        self
    }

    /// Serve unknown file types with the given content type, if any
    #[must_use]
    pub fn serve_unknown_file_types(mut self, default_content_type: Option<String>) -> Self {
        self.serve_unknown_file_types = true;
        self.default_content_type = default_content_type;
        self
    }

    #[must_use]
    pub fn on_prepare_response(mut self, callback: PrepareResponseCallback) -> Self {
        self.on_prepare_response = Some(callback);
        self
    }

    /// Add a Cache-Control header to every handled response
    ///
    /// Applied before the response-prepared callback, which may replace it.
    #[must_use]
    pub fn cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = Some(policy);
        self
    }
}
