//! Body transfer
//!
//! Sends the selected byte span of a file to the response. Send-file is
//! used when the writer supports it and the file has a physical path;
//! otherwise the file stream is seeked and copied in chunks.

use crate::error::TransferError;
use crate::fs::{FileInfo, FileSystem};
use bytes::Bytes;
use std::future::Future;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;

/// Stream copy buffer size
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Response body sink provided by the host
pub trait BodyWriter: Send {
    /// Write one chunk of the body
    fn write(&mut self, chunk: Bytes) -> impl Future<Output = io::Result<()>> + Send;

    /// Whether [`BodyWriter::send_file`] can be used
    fn supports_send_file(&self) -> bool {
        false
    }

    /// Send `count` bytes of the file at `path` starting at `offset`
    fn send_file(
        &mut self,
        path: &Path,
        offset: u64,
        count: u64,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<(), TransferError>> + Send {
        let _ = (path, offset, count, cancel);
        async {
            Err(TransferError::Io(io::Error::new(
                io::ErrorKind::Unsupported,
                "send-file is not supported by this writer",
            )))
        }
    }
}

/// How a body transfer is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    SendFile,
    StreamCopy,
}

/// The byte span of a file a response still has to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyTransfer {
    pub file: FileInfo,
    pub offset: u64,
    pub count: u64,
}

impl BodyTransfer {
    /// Strategy used with a writer of the given capability
    pub const fn strategy(&self, supports_send_file: bool) -> TransferStrategy {
        if supports_send_file && self.file.physical_path.is_some() {
            TransferStrategy::SendFile
        } else {
            TransferStrategy::StreamCopy
        }
    }

    /// Send the span, returning the number of bytes written
    pub async fn run<W: BodyWriter>(
        &self,
        file_system: &dyn FileSystem,
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, TransferError> {
        if cancel.is_cancelled() {
            return Err(TransferError::Cancelled);
        }

        match (self.strategy(writer.supports_send_file()), &self.file.physical_path) {
            (TransferStrategy::SendFile, Some(path)) => {
                writer.send_file(path, self.offset, self.count, cancel).await?;
                Ok(self.count)
            }
            _ => self.copy_stream(file_system, writer, cancel).await,
        }
    }

    async fn copy_stream<W: BodyWriter>(
        &self,
        file_system: &dyn FileSystem,
        writer: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, TransferError> {
        let mut stream = file_system.open_read(&self.file).await?;
        if self.offset > 0 {
            stream.seek(SeekFrom::Start(self.offset)).await?;
        }

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut remaining = self.count;
        while remaining > 0 {
            let wanted = usize::try_from(remaining).map_or(buffer.len(), |r| r.min(buffer.len()));
            let read = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(TransferError::Cancelled),
                read = stream.read(&mut buffer[..wanted]) => read?,
            };
            if read == 0 {
                return Err(TransferError::UnexpectedEof {
                    expected: self.count,
                    copied: self.count - remaining,
                });
            }

            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(TransferError::Cancelled),
                written = writer.write(Bytes::copy_from_slice(&buffer[..read])) => written?,
            }
            remaining -= read as u64;
        }

        Ok(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::testing::MemoryFileSystem;
    use std::path::PathBuf;

    #[derive(Default)]
    struct RecordingWriter {
        body: Vec<u8>,
        chunks: usize,
        send_file: bool,
        sent_file: Option<(PathBuf, u64, u64)>,
        cancel_after_first: Option<CancellationToken>,
    }

    impl BodyWriter for RecordingWriter {
        async fn write(&mut self, chunk: Bytes) -> io::Result<()> {
            self.body.extend_from_slice(&chunk);
            self.chunks += 1;
            if let Some(token) = &self.cancel_after_first {
                token.cancel();
            }
            Ok(())
        }

        fn supports_send_file(&self) -> bool {
            self.send_file
        }

        async fn send_file(
            &mut self,
            path: &Path,
            offset: u64,
            count: u64,
            _cancel: &CancellationToken,
        ) -> Result<(), TransferError> {
            self.sent_file = Some((path.to_path_buf(), offset, count));
            Ok(())
        }
    }

    fn transfer(fs: &MemoryFileSystem, subpath: &str, offset: u64, count: u64) -> BodyTransfer {
        BodyTransfer {
            file: fs.file_info(subpath),
            offset,
            count,
        }
    }

    #[tokio::test]
    async fn test_stream_copy_span() {
        let fs = MemoryFileSystem::new().with_file("/a.txt", "0123456789");
        let mut writer = RecordingWriter::default();
        let sent = transfer(&fs, "/a.txt", 2, 5)
            .run(&fs, &mut writer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(sent, 5);
        assert_eq!(writer.body, b"23456");
    }

    #[tokio::test]
    async fn test_stream_copy_chunks_large_file() {
        let content = vec![7u8; COPY_BUFFER_SIZE * 2 + 10];
        let fs = MemoryFileSystem::new().with_file("/big.bin", content.clone());
        let mut writer = RecordingWriter::default();
        transfer(&fs, "/big.bin", 0, content.len() as u64)
            .run(&fs, &mut writer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(writer.chunks, 3);
        assert_eq!(writer.body, content);
    }

    #[tokio::test]
    async fn test_send_file_preferred() {
        let fs = MemoryFileSystem::new()
            .with_file("/a.txt", "0123456789")
            .with_physical_path("/a.txt", "/srv/a.txt");
        let mut writer = RecordingWriter {
            send_file: true,
            ..Default::default()
        };
        let job = transfer(&fs, "/a.txt", 3, 4);
        assert_eq!(job.strategy(true), TransferStrategy::SendFile);
        job.run(&fs, &mut writer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(writer.sent_file, Some((PathBuf::from("/srv/a.txt"), 3, 4)));
        assert!(writer.body.is_empty());
    }

    #[tokio::test]
    async fn test_no_physical_path_falls_back_to_copy() {
        let fs = MemoryFileSystem::new().with_file("/a.txt", "0123456789");
        let mut writer = RecordingWriter {
            send_file: true,
            ..Default::default()
        };
        let job = transfer(&fs, "/a.txt", 0, 10);
        assert_eq!(job.strategy(true), TransferStrategy::StreamCopy);
        job.run(&fs, &mut writer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(writer.sent_file, None);
        assert_eq!(writer.body, b"0123456789");
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let fs = MemoryFileSystem::new().with_file("/a.txt", "0123456789");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let mut writer = RecordingWriter::default();
        let result = transfer(&fs, "/a.txt", 0, 10)
            .run(&fs, &mut writer, &cancel)
            .await;
        assert!(matches!(result, Err(TransferError::Cancelled)));
        assert!(writer.body.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_mid_transfer() {
        let content = vec![1u8; COPY_BUFFER_SIZE * 3];
        let fs = MemoryFileSystem::new().with_file("/big.bin", content.clone());
        let cancel = CancellationToken::new();
        let mut writer = RecordingWriter {
            cancel_after_first: Some(cancel.clone()),
            ..Default::default()
        };
        let result = transfer(&fs, "/big.bin", 0, content.len() as u64)
            .run(&fs, &mut writer, &cancel)
            .await;
        assert!(matches!(result, Err(TransferError::Cancelled)));
        assert_eq!(writer.chunks, 1);
    }

    #[tokio::test]
    async fn test_short_file_reports_eof() {
        let fs = MemoryFileSystem::new().with_short_file("/a.txt", "01234", 10);
        let mut writer = RecordingWriter::default();
        let result = transfer(&fs, "/a.txt", 0, 10)
            .run(&fs, &mut writer, &CancellationToken::new())
            .await;
        assert!(matches!(
            result,
            Err(TransferError::UnexpectedEof {
                expected: 10,
                copied: 5
            })
        ));
        assert_eq!(writer.body, b"01234");
    }
}
