//! Resource validators
//!
//! Derives the entity tag and Last-Modified value from file metadata.

use crate::fs::FileInfo;
use crate::http::date::{format_http_date, truncate_to_seconds};
use chrono::{DateTime, Utc};

/// Seconds between 1601-01-01 and 1970-01-01, the file-time epoch offset
const FILE_TIME_EPOCH_OFFSET_SECS: i64 = 11_644_473_600;
/// File-time ticks are 100ns
const FILE_TIME_TICKS_PER_SEC: i64 = 10_000_000;

/// Resource metadata fixed for the rest of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub length: u64,
    /// Whole seconds only
    pub last_modified: DateTime<Utc>,
}

impl ResourceDescriptor {
    /// `None` when the file does not exist
    pub fn from_file(file: &FileInfo) -> Option<Self> {
        file.exists.then(|| Self {
            length: file.length,
            last_modified: truncate_to_seconds(file.last_modified),
        })
    }

    /// Last-modified time as 100ns ticks since 1601-01-01 UTC
    fn file_time_ticks(&self) -> i64 {
        self.last_modified
            .timestamp()
            .wrapping_add(FILE_TIME_EPOCH_OFFSET_SECS)
            .wrapping_mul(FILE_TIME_TICKS_PER_SEC)
    }
}

/// Validators sent with and compared against every conditional request
///
/// The entity tag is `hex(file_time_ticks ^ length)`. Two files with the
/// same length and the same modification second share a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validator {
    /// Unquoted entity tag
    pub etag: String,
    /// Entity tag as sent in the ETag header
    pub etag_quoted: String,
    pub last_modified_http_date: String,
}

impl Validator {
    #[allow(clippy::cast_possible_wrap)]
    pub fn compute(resource: &ResourceDescriptor) -> Self {
        let hash = resource.file_time_ticks() ^ resource.length as i64;
        let etag = format!("{hash:x}");
        Self {
            etag_quoted: format!("\"{etag}\""),
            etag,
            last_modified_http_date: format_http_date(resource.last_modified),
        }
    }
}
