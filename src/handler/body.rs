//! Channel-backed response body
//!
//! hyper needs the response head before any body bytes exist. The body is
//! therefore a [`StreamBody`] fed through a bounded channel by a task that
//! runs the file transfer.

use crate::error::TransferError;
use crate::http::ResponseBody;
use crate::static_files::BodyWriter;
use bytes::Bytes;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::Frame;
use std::io::{self, SeekFrom};
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;

/// Chunks buffered between the transfer task and hyper
const CHANNEL_CAPACITY: usize = 4;
/// Read size when sending a file by path
const SEND_FILE_CHUNK: usize = 64 * 1024;

type FrameResult = Result<Frame<Bytes>, io::Error>;

/// Writing half of a streamed response body
pub struct ChannelBodyWriter {
    sender: mpsc::Sender<FrameResult>,
}

/// Create a connected writer and response body
pub fn channel_body() -> (ChannelBodyWriter, ResponseBody) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let body = StreamBody::new(ReceiverStream::new(receiver)).boxed();
    (ChannelBodyWriter { sender }, body)
}

impl ChannelBodyWriter {
    /// End the body with an error so hyper aborts the response
    pub async fn abort(self, error: io::Error) {
        let _ = self.sender.send(Err(error)).await;
    }
}

impl BodyWriter for ChannelBodyWriter {
    async fn write(&mut self, chunk: Bytes) -> io::Result<()> {
        self.sender
            .send(Ok(Frame::data(chunk)))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body dropped"))
    }

    fn supports_send_file(&self) -> bool {
        true
    }

    async fn send_file(
        &mut self,
        path: &Path,
        offset: u64,
        count: u64,
        cancel: &CancellationToken,
    ) -> Result<(), TransferError> {
        let mut file = tokio::fs::File::open(path).await?;
        file.seek(SeekFrom::Start(offset)).await?;
        let mut chunks = ReaderStream::with_capacity(file.take(count), SEND_FILE_CHUNK);

        let mut sent = 0u64;
        loop {
            let next = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(TransferError::Cancelled),
                next = chunks.next() => next,
            };
            let Some(chunk) = next else { break };
            let chunk = chunk?;
            sent += chunk.len() as u64;
            self.write(chunk).await?;
        }

        if sent < count {
            return Err(TransferError::UnexpectedEof {
                expected: count,
                copied: sent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chunks_reach_body() {
        let (mut writer, body) = channel_body();
        let producer = tokio::spawn(async move {
            writer.write(Bytes::from_static(b"hello ")).await.unwrap();
            writer.write(Bytes::from_static(b"world")).await.unwrap();
        });
        let collected = body.collect().await.unwrap().to_bytes();
        producer.await.unwrap();
        assert_eq!(collected, Bytes::from_static(b"hello world"));
    }

    #[tokio::test]
    async fn test_dropped_body_is_write_error() {
        let (mut writer, body) = channel_body();
        drop(body);
        let err = writer.write(Bytes::from_static(b"x")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_send_file_span() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let (mut writer, body) = channel_body();
        let producer = tokio::spawn(async move {
            writer
                .send_file(&path, 2, 5, &CancellationToken::new())
                .await
        });
        let collected = body.collect().await.unwrap().to_bytes();
        producer.await.unwrap().unwrap();
        assert_eq!(collected, Bytes::from_static(b"23456"));
    }

    #[tokio::test]
    async fn test_send_file_short_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, b"0123").unwrap();

        let (mut writer, body) = channel_body();
        let producer =
            tokio::spawn(async move { writer.send_file(&path, 0, 10, &CancellationToken::new()).await });
        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected, Bytes::from_static(b"0123"));
        assert!(matches!(
            producer.await.unwrap(),
            Err(TransferError::UnexpectedEof {
                expected: 10,
                copied: 4
            })
        ));
    }
}
