//! Helpers for consuming a reply stream.

use futures::{Stream, StreamExt};

use crate::client::ClientError;
use crate::model::{StreamToken, TokenKind};

/// Assistant reply assembled from streamed events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    /// Concatenated token text
    pub content: String,

    /// Server-side message id, taken from the latest event that carried one
    pub message_id: Option<String>,

    /// Whether a `complete` event was received. A stream may end without
    /// one and still be a successful reply.
    pub completed: bool,
}

impl Reply {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the reply.
    ///
    /// An `error` event becomes [`ClientError::Protocol`] carrying the server
    /// message.
    pub fn push(&mut self, token: &StreamToken) -> Result<(), ClientError> {
        if let Some(id) = &token.message_id {
            self.message_id = Some(id.clone());
        }

        match token.kind {
            TokenKind::Token => self.content.push_str(&token.content),
            TokenKind::Complete => self.completed = true,
            TokenKind::Error => return Err(ClientError::Protocol(token.content.clone())),
        }
        Ok(())
    }
}

/// Drain a reply stream into a [`Reply`].
///
/// # Example
/// ```no_run
/// use jarvis_chat::{collect_reply, ChatClient};
///
/// # async fn run(client: ChatClient) -> Result<(), jarvis_chat::ClientError> {
/// let stream = client.stream_message("chat-1", "Hi").await?;
/// let reply = collect_reply(stream).await?;
/// println!("{}", reply.content);
/// # Ok(())
/// # }
/// ```
pub async fn collect_reply<S>(stream: S) -> Result<Reply, ClientError>
where
    S: Stream<Item = Result<StreamToken, ClientError>>,
{
    futures::pin_mut!(stream);

    let mut reply = Reply::new();
    while let Some(token) = stream.next().await {
        reply.push(&token?)?;
    }
    Ok(reply)
}
