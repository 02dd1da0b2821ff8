//! Streaming construction of the multipart upload body
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tokio::fs::File;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::error::{GofileError, Result};

/// A function that receives progress updates while a file is uploaded.
///
/// Invoked with the cumulative number of bytes sent so far and the total file
/// size as measured when the file was opened.  The callback runs synchronously
/// on the task driving the upload, so it must not block or perform expensive
/// work.  It is never invoked for zero-byte reads, which means a zero-length
/// file may produce no invocations at all.
pub type ProgressCallback = Arc<Mutex<dyn FnMut(u64, u64) + Send + 'static>>;

/// Wraps a reader's chunk stream and reports progress as bytes are pulled
/// through it.
///
/// The transport drains this stream lazily, one chunk per poll, so memory
/// stays bounded by the chunk buffer no matter how large the file is.
pub(crate) struct ProgressStream<R> {
    inner: ReaderStream<R>,
    transferred: u64,
    size: u64,
    on_progress: Option<ProgressCallback>,
}

impl<R: AsyncRead> ProgressStream<R> {
    pub(crate) fn new(reader: R, size: u64, on_progress: Option<ProgressCallback>) -> Self {
        Self {
            inner: ReaderStream::new(reader),
            transferred: 0,
            size,
            on_progress,
        }
    }
}

impl<R: AsyncRead + Unpin> Stream for ProgressStream<R> {
    type Item = std::io::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_next(cx);
        if let Poll::Ready(Some(Ok(chunk))) = &poll {
            if !chunk.is_empty() {
                this.transferred += chunk.len() as u64;
                if let Some(listener) = this.on_progress.as_ref() {
                    if let Ok(mut on_read) = listener.lock() {
                        on_read(this.transferred, this.size);
                    }
                }
            }
        }
        poll
    }
}

/// Builds the multipart form for a file upload: a `folderId` text field
/// followed by a `file` part that streams the file's contents.
///
/// The file is opened and its size snapshotted here, before any request is
/// issued, so an unreadable path never reaches the network.  The multipart
/// boundary is fixed when the form is constructed, which makes the content
/// type available to the transport before the first file byte is read.
pub(crate) async fn file_form(
    file_path: &Path,
    folder_id: &str,
    on_progress: Option<ProgressCallback>,
) -> Result<Form> {
    let file = File::open(file_path)
        .await
        .map_err(|err| GofileError::FileOpen(file_path.to_path_buf(), err))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|err| GofileError::FileOpen(file_path.to_path_buf(), err))?;
    let size = metadata.len();
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let stream = ProgressStream::new(file, size, on_progress);
    let part = Part::stream_with_length(Body::wrap_stream(stream), size)
        .file_name(file_name)
        .mime_str("application/octet-stream")?;

    Ok(Form::new()
        .text("folderId", folder_id.to_string())
        .part("file", part))
}
