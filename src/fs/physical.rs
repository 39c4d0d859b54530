//! Directory-backed file system
//!
//! Serves files below one root directory and refuses to leave it.

use super::{FileInfo, FileSystem, OpenReadFuture, ReadStream};
use crate::logger;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};

/// File system rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct PhysicalFileSystem {
    root: PathBuf,
}

impl PhysicalFileSystem {
    /// Create a file system for `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory: {}", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a sub-path to a canonical path inside the root
    fn resolve(&self, subpath: &str) -> Option<PathBuf> {
        let mut relative = PathBuf::new();
        for component in Path::new(subpath.trim_start_matches('/')).components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                // "..", drive prefixes and absolute roots never resolve
                _ => return None,
            }
        }
        if relative.as_os_str().is_empty() {
            return None;
        }

        let canonical = self.root.join(relative).canonicalize().ok()?;
        if !canonical.starts_with(&self.root) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {} -> {}",
                subpath,
                canonical.display()
            ));
            return None;
        }
        Some(canonical)
    }
}

impl FileSystem for PhysicalFileSystem {
    fn file_info(&self, subpath: &str) -> FileInfo {
        let Some(path) = self.resolve(subpath) else {
            return FileInfo::not_found(subpath);
        };
        let Ok(metadata) = std::fs::metadata(&path) else {
            return FileInfo::not_found(subpath);
        };
        if !metadata.is_file() {
            return FileInfo::not_found(subpath);
        }

        let last_modified = metadata
            .modified()
            .map_or(DateTime::<Utc>::UNIX_EPOCH, DateTime::<Utc>::from);

        FileInfo {
            exists: true,
            length: metadata.len(),
            last_modified,
            physical_path: Some(path),
            subpath: subpath.to_string(),
        }
    }

    fn open_read<'a>(&'a self, file: &'a FileInfo) -> OpenReadFuture<'a> {
        Box::pin(async move {
            let path = file.physical_path.as_ref().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no physical path for {}", file.subpath),
                )
            })?;
            let handle = tokio::fs::File::open(path).await?;
            Ok(Box::new(handle) as Box<dyn ReadStream>)
        })
    }
}
