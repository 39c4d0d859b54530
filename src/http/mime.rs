//! MIME type detection module
//!
//! Maps file extensions to Content-Type values. Unknown extensions are
//! reported as unknown so the caller can decide whether to serve them.

use std::collections::HashMap;
use std::path::Path;

/// Content-type lookup collaborator
pub trait ContentTypeProvider: Send + Sync {
    /// Content type for a sub-path, `None` when the type is unknown
    fn content_type(&self, subpath: &str) -> Option<String>;
}

/// Built-in extension table
///
/// # Examples
/// ```
/// use static_range::http::mime::builtin_content_type;
/// assert_eq!(builtin_content_type("html"), Some("text/html; charset=utf-8"));
/// assert_eq!(builtin_content_type("mp4"), Some("video/mp4"));
/// assert_eq!(builtin_content_type("xyz"), None);
/// ```
pub fn builtin_content_type(extension: &str) -> Option<&'static str> {
    let content_type = match extension {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css",
        "txt" | "md" => "text/plain; charset=utf-8",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // JavaScript/WASM
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",
        "avif" => "image/avif",

        // Video
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "ogv" => "video/ogg",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",

        // Audio
        "mp3" => "audio/mpeg",
        "ogg" | "oga" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        // Documents and archives
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "tar" => "application/x-tar",
        "7z" => "application/x-7z-compressed",

        _ => return None,
    };
    Some(content_type)
}

/// Extension based provider with optional overrides on top of the built-in table
#[derive(Debug, Clone, Default)]
pub struct ExtensionContentTypeProvider {
    overrides: HashMap<String, String>,
}

impl ExtensionContentTypeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping, the extension is given without the dot
    #[must_use]
    pub fn with_mapping(mut self, extension: &str, content_type: impl Into<String>) -> Self {
        self.overrides.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            content_type.into(),
        );
        self
    }
}

impl ContentTypeProvider for ExtensionContentTypeProvider {
    fn content_type(&self, subpath: &str) -> Option<String> {
        let extension = Path::new(subpath)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();

        self.overrides
            .get(&extension)
            .cloned()
            .or_else(|| builtin_content_type(&extension).map(ToString::to_string))
    }
}
