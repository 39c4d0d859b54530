// Application state module
// Shared, read-only state handed to every connection

use super::types::{Config, StaticFilesConfig};
use crate::error::StartupError;
use crate::fs::PhysicalFileSystem;
use crate::http::mime::ExtensionContentTypeProvider;
use crate::logger::LogFormat;
use crate::static_files::{StaticFileMiddleware, StaticFileOptions};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

/// Application state
pub struct AppState {
    pub config: Config,
    pub static_files: StaticFileMiddleware,
    /// Parsed once, `None` when access logging is off
    pub access_log_format: Option<LogFormat>,
    /// Open connections
    pub connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, StartupError> {
        let options = build_static_file_options(&config.static_files)?;
        let access_log_format = config
            .logging
            .access_log
            .then(|| LogFormat::parse(&config.logging.access_log_format));

        Ok(Self {
            config: config.clone(),
            static_files: StaticFileMiddleware::new(options),
            access_log_format,
            connections: AtomicUsize::new(0),
        })
    }
}

fn build_static_file_options(config: &StaticFilesConfig) -> Result<StaticFileOptions, StartupError> {
    let file_system = PhysicalFileSystem::new(&config.root).map_err(|source| StartupError::Root {
        path: config.root.clone(),
        source,
    })?;

    let content_types = config
        .mime_types
        .iter()
        .fold(ExtensionContentTypeProvider::new(), |provider, (ext, content_type)| {
            provider.with_mapping(ext, content_type.clone())
        });

    let mut options = StaticFileOptions::new(Arc::new(file_system))
        .request_path(config.request_path.clone())
        .content_types(Arc::new(content_types));
    if config.serve_unknown_file_types {
        options = options.serve_unknown_file_types(config.default_content_type.clone());
    }
    if let Some(policy) = config.cache_control {
        options = options.cache_policy(policy);
    }
    Ok(options)
}
