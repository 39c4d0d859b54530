//! Static file serving with conditional (RFC 7232) and range (RFC 7233)
//! request support.
//!
//! The engine lives in [`static_files`]: [`static_files::StaticFileMiddleware`]
//! evaluates a GET or HEAD request against a [`fs::FileSystem`] and decides
//! between 200, 206, 304, 412 and 416. The remaining modules host it behind a
//! hyper server.

pub mod config;
pub mod error;
pub mod fs;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod static_files;
