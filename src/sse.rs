//! Server-Sent Events stream processing for streamed chat replies.
//!
//! Wire format (one JSON event per `data: ` line, blank and foreign lines
//! are ignored, end of stream is the end of the response body):
//! ```text
//! data: {"type": "token", "content": "Hel"}
//! data: {"type": "token", "content": "lo"}
//! data: {"type": "complete", "content": "", "message_id": "m-42"}
//! ```
//!
//! [`token_stream`] turns a [`BodyReader`] into a lazy stream of
//! [`StreamToken`]s. Nothing is read until the stream is polled, the stream
//! ends right after a `complete` or `error` event, and the reader is
//! released exactly once however the stream ends, including when it is
//! dropped half way.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use std::collections::VecDeque;
use thiserror::Error;

use crate::client::ClientError;
use crate::decoder::LineDecoder;
use crate::model::StreamToken;

/// Marker that starts every event line.
pub const DATA_PREFIX: &str = "data: ";

/// A `data: ` line whose payload is not a valid event.
///
/// Never ends a stream: offending lines are logged and skipped.
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("malformed event payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Parse one decoded line.
///
/// Returns `Ok(None)` for lines that carry no event (blank lines, comments,
/// anything without the `data: ` prefix).
///
/// # Example
/// ```
/// use jarvis_chat::sse::parse_frame;
/// use jarvis_chat::model::StreamToken;
///
/// let token = parse_frame(r#"data: {"type":"token","content":"Hel"}"#).unwrap();
/// assert_eq!(token, Some(StreamToken::token("Hel")));
///
/// assert!(parse_frame(": keep-alive").unwrap().is_none());
/// assert!(parse_frame("data: {not json").is_err());
/// ```
pub fn parse_frame(line: &str) -> Result<Option<StreamToken>, FrameError> {
    match line.strip_prefix(DATA_PREFIX) {
        Some(payload) => Ok(Some(serde_json::from_str(payload)?)),
        None => Ok(None),
    }
}

/// Readable body of an in-flight response.
///
/// This is the seam between the stream reader and the HTTP transport.
#[async_trait]
pub trait BodyReader: Send {
    /// Read the next chunk. `Ok(None)` signals the end of the body.
    async fn read(&mut self) -> Result<Option<Bytes>, ClientError>;

    /// Give the underlying resource back. Called exactly once per session.
    fn release(&mut self) {}
}

#[async_trait]
impl BodyReader for reqwest::Response {
    async fn read(&mut self) -> Result<Option<Bytes>, ClientError> {
        Ok(self.chunk().await?)
    }
}

/// Holds the reader for the lifetime of a session and releases it on drop.
struct ReaderGuard<R: BodyReader>(R);

impl<R: BodyReader> Drop for ReaderGuard<R> {
    fn drop(&mut self) {
        self.0.release();
        tracing::debug!("stream reader released");
    }
}

/// State of one streamed reply.
struct Session<R: BodyReader> {
    /// `None` once the session reached a terminal state.
    reader: Option<ReaderGuard<R>>,
    decoder: LineDecoder,
    lines: VecDeque<String>,
}

impl<R: BodyReader> Session<R> {
    fn new(reader: R) -> Self {
        Self {
            reader: Some(ReaderGuard(reader)),
            decoder: LineDecoder::new(),
            lines: VecDeque::new(),
        }
    }

    async fn next_token(&mut self) -> Option<Result<StreamToken, ClientError>> {
        loop {
            while let Some(line) = self.lines.pop_front() {
                let token = match parse_frame(&line) {
                    Ok(Some(token)) => token,
                    Ok(None) => continue,
                    Err(err) => {
                        tracing::warn!(line = %line, error = %err, "skipping malformed event line");
                        continue;
                    }
                };

                if token.is_terminal() {
                    tracing::debug!(kind = ?token.kind, "stream reached terminal event");
                    self.lines.clear();
                    self.release();
                }
                return Some(Ok(token));
            }

            let reader = &mut self.reader.as_mut()?.0;
            let read = reader.read().await;

            match read {
                Ok(Some(chunk)) => {
                    tracing::trace!(len = chunk.len(), "received chunk");
                    self.lines.extend(self.decoder.feed(&chunk));
                }
                Ok(None) => {
                    // No terminal event; residual lines are still processed
                    // before the stream ends.
                    tracing::debug!("response body ended");
                    self.lines.extend(self.decoder.flush());
                    self.release();
                }
                Err(err) => {
                    tracing::debug!(error = %err, "transport failed mid-stream");
                    self.lines.clear();
                    self.release();
                    return Some(Err(err));
                }
            }
        }
    }

    fn release(&mut self) {
        self.reader.take();
    }
}

/// Turn a response body into a stream of reply events.
///
/// The stream yields `Err` only for transport failures after streaming has
/// started. A body that ends without a `complete` event simply ends the
/// stream, so callers must not rely on seeing one.
pub fn token_stream<R>(reader: R) -> impl Stream<Item = Result<StreamToken, ClientError>> + Send
where
    R: BodyReader + 'static,
{
    stream::unfold(Session::new(reader), |mut session| async move {
        let item = session.next_token().await?;
        Some((item, session))
    })
    .fuse()
}
