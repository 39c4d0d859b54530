//! Error types

use std::io;
use thiserror::Error;

/// Failure while sending a file body
#[derive(Debug, Error)]
pub enum TransferError {
    /// The client went away or the server is shutting down
    #[error("transfer cancelled")]
    Cancelled,

    /// The file became shorter than its metadata said
    #[error("file ended after {copied} of {expected} bytes")]
    UnexpectedEof { expected: u64, copied: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failure while starting the server
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid address: {0}")]
    Address(String),

    #[error("static file root '{path}': {source}")]
    Root { path: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
