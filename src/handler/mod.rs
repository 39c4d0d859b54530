//! Request handler module
//!
//! hyper glue around the static file engine: dispatch, fallbacks and the
//! streamed response body.

pub mod body;
pub mod router;

// Re-export main entry point
pub use router::handle_request;
