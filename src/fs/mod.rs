//! File system collaborator
//!
//! The static file engine only sees files through [`FileSystem`]: a
//! metadata lookup and a seekable read stream.

mod physical;
#[cfg(test)]
pub(crate) mod testing;

pub use physical::PhysicalFileSystem;

use chrono::{DateTime, Utc};
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncSeek};

/// Metadata for one file lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub exists: bool,
    /// Length in bytes
    pub length: u64,
    pub last_modified: DateTime<Utc>,
    /// Location on disk, `None` for files without a stable physical path
    pub physical_path: Option<PathBuf>,
    /// Sub-path the file was looked up with
    pub subpath: String,
}

impl FileInfo {
    pub fn not_found(subpath: &str) -> Self {
        Self {
            exists: false,
            length: 0,
            last_modified: DateTime::<Utc>::UNIX_EPOCH,
            physical_path: None,
            subpath: subpath.to_string(),
        }
    }
}

/// Seekable byte stream over file content
pub trait ReadStream: AsyncRead + AsyncSeek + Unpin + Send {}

impl<T: AsyncRead + AsyncSeek + Unpin + Send> ReadStream for T {}

/// Pending [`FileSystem::open_read`]
pub type OpenReadFuture<'a> =
    Pin<Box<dyn Future<Output = io::Result<Box<dyn ReadStream>>> + Send + 'a>>;

/// File lookup and read access
pub trait FileSystem: Send + Sync {
    /// Look up a file by sub-path, side-effect free
    ///
    /// Runs in the synchronous decision phase, so it is limited to one
    /// metadata lookup. Missing files, directories and paths outside the
    /// file system report `exists == false`.
    fn file_info(&self, subpath: &str) -> FileInfo;

    /// Open a read stream positioned at the start of the file
    ///
    /// Called from the body transfer, right before the first read.
    fn open_read<'a>(&'a self, file: &'a FileInfo) -> OpenReadFuture<'a>;
}
