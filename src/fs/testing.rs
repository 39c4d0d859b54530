//! In-memory file system for tests

use super::{FileInfo, FileSystem, OpenReadFuture, ReadStream};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::PathBuf;

struct MemoryFile {
    content: Vec<u8>,
    /// Length reported by metadata, may differ from the content
    length: u64,
    last_modified: DateTime<Utc>,
    physical_path: Option<PathBuf>,
}

#[derive(Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, MemoryFile>,
}

/// Fixed modification time used by [`MemoryFileSystem::with_file`]
pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, subpath: &str, content: impl Into<Vec<u8>>) -> Self {
        self.with_file_at(subpath, content, test_time())
    }

    pub fn with_file_at(
        mut self,
        subpath: &str,
        content: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        let content = content.into();
        self.files.insert(
            subpath.to_string(),
            MemoryFile {
                length: content.len() as u64,
                content,
                last_modified,
                physical_path: None,
            },
        );
        self
    }

    /// Metadata claims `length` bytes while only `content` can be read
    pub fn with_short_file(mut self, subpath: &str, content: impl Into<Vec<u8>>, length: u64) -> Self {
        self.files.insert(
            subpath.to_string(),
            MemoryFile {
                content: content.into(),
                length,
                last_modified: test_time(),
                physical_path: None,
            },
        );
        self
    }

    /// Give a file a physical path so send-file can be chosen
    pub fn with_physical_path(mut self, subpath: &str, path: impl Into<PathBuf>) -> Self {
        if let Some(file) = self.files.get_mut(subpath) {
            file.physical_path = Some(path.into());
        }
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn file_info(&self, subpath: &str) -> FileInfo {
        match self.files.get(subpath) {
            Some(file) => FileInfo {
                exists: true,
                length: file.length,
                last_modified: file.last_modified,
                physical_path: file.physical_path.clone(),
                subpath: subpath.to_string(),
            },
            None => FileInfo::not_found(subpath),
        }
    }

    fn open_read<'a>(&'a self, file: &'a FileInfo) -> OpenReadFuture<'a> {
        let stream = self
            .files
            .get(&file.subpath)
            .map(|entry| Box::new(Cursor::new(entry.content.clone())) as Box<dyn ReadStream>)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound));
        Box::pin(std::future::ready(stream))
    }
}
