//! Chat API client and error types.

use futures::Stream;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::http::{add_extra_headers, build_http_client, ensure_success};
use crate::model::{
    Chat, ChatWithMessages, CreateChatRequest, HealthStatus, Message, StreamRequest, StreamToken,
};
use crate::options::ClientOptions;
use crate::sse::token_stream;

/// Title used when a chat is created without one.
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Errors that can occur during client operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Network or transport failure, before or during streaming.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Request { status: StatusCode, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The stream ended with an `error` event.
    #[error("Stream error: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status of a rejected request, if that is what this error is.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Request { status, .. } => Some(*status),
            ClientError::Http(err) => err.status(),
            _ => None,
        }
    }
}

/// Client for the chat backend.
///
/// # Example
/// ```no_run
/// use futures::StreamExt;
/// use jarvis_chat::{ChatClient, ClientOptions};
///
/// # async fn run() -> Result<(), jarvis_chat::ClientError> {
/// let client = ChatClient::new(ClientOptions::default())?;
/// let chat = client.create_chat(None).await?;
///
/// let stream = client.stream_message(&chat.id, "Hello!").await?;
/// futures::pin_mut!(stream);
/// while let Some(token) = stream.next().await {
///     print!("{}", token?.content);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    options: ClientOptions,
}

impl ChatClient {
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        if options.base_url.trim().is_empty() {
            return Err(ClientError::Config("base URL is required".to_string()));
        }

        let http = build_http_client(&options)?;
        Ok(Self { http, options })
    }

    /// Client configured from the environment, see [`ClientOptions::from_env`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(ClientOptions::from_env())
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Send `content` to a chat and stream the assistant reply.
    ///
    /// The request is sent when this future is awaited. A failure to connect
    /// or a non-2xx answer is returned as `Err` before any event exists; the
    /// returned stream only carries events and mid-stream transport errors.
    /// Dropping the stream early releases the response body.
    pub async fn stream_message(
        &self,
        chat_id: &str,
        content: &str,
    ) -> Result<impl Stream<Item = Result<StreamToken, ClientError>> + Send, ClientError> {
        let url = self.options.endpoint(&format!("/chats/{}/stream", chat_id));
        tracing::debug!(%chat_id, "opening reply stream");

        let req = self
            .request(Method::POST, url)
            .json(&StreamRequest { content });

        let response = ensure_success(req.send().await?).await?;
        Ok(token_stream(response))
    }

    /// List all chats.
    pub async fn get_chats(&self) -> Result<Vec<Chat>, ClientError> {
        let url = self.options.endpoint("/chats");
        self.fetch(self.request(Method::GET, url)).await
    }

    /// Create a chat, titled [`DEFAULT_CHAT_TITLE`] unless a title is given.
    pub async fn create_chat(&self, title: Option<&str>) -> Result<Chat, ClientError> {
        let title = title.filter(|t| !t.is_empty()).unwrap_or(DEFAULT_CHAT_TITLE);
        let req = self
            .request(Method::POST, self.options.endpoint("/chats"))
            .json(&CreateChatRequest { title });

        self.fetch(req).await
    }

    /// Fetch a chat with its full message history.
    pub async fn get_chat(&self, chat_id: &str) -> Result<ChatWithMessages, ClientError> {
        let url = self.options.endpoint(&format!("/chats/{}", chat_id));
        self.fetch(self.request(Method::GET, url)).await
    }

    /// Delete a chat. Whatever the server returns on success is ignored.
    pub async fn delete_chat(&self, chat_id: &str) -> Result<(), ClientError> {
        let url = self.options.endpoint(&format!("/chats/{}", chat_id));
        let response = self.request(Method::DELETE, url).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    /// List the messages of a chat.
    pub async fn get_messages(&self, chat_id: &str) -> Result<Vec<Message>, ClientError> {
        let url = self.options.endpoint(&format!("/chats/{}/messages", chat_id));
        self.fetch(self.request(Method::GET, url)).await
    }

    /// Query the backend health endpoint.
    pub async fn health_check(&self) -> Result<HealthStatus, ClientError> {
        let url = self.options.health_url();
        self.fetch(self.request(Method::GET, url)).await
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");
        add_extra_headers(req, &self.options.extra_headers)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let response = ensure_success(req.send().await?).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_base_url_rejected() {
        let err = ChatClient::new(ClientOptions::new("  ")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_request_error_displays_message() {
        let err = ClientError::Request {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "overloaded");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn test_protocol_error_has_no_status() {
        let err = ClientError::Protocol("model crashed".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Stream error: model crashed");
    }
}
