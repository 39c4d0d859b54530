// Configuration types module
// Defines all configuration-related data structures

use crate::http::cache::CachePolicy;
use serde::Deserialize;
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub static_files: StaticFilesConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads, CPU cores when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    /// Whole-connection budget in seconds
    pub connection_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<usize>,
}

/// Static file serving configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StaticFilesConfig {
    /// URL prefix the files are served under
    pub request_path: String,
    /// Directory the files are served from
    pub root: String,
    pub serve_unknown_file_types: bool,
    /// Content type for unknown extensions when those are served
    #[serde(default)]
    pub default_content_type: Option<String>,
    #[serde(default)]
    pub cache_control: Option<CachePolicy>,
    /// Extra extension to content type mappings
    #[serde(default)]
    pub mime_types: HashMap<String, String>,
}
