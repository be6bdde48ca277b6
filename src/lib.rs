//! # jarvis-chat - streaming client for the Jarvis chat backend
//!
//! The backend streams assistant replies as newline framed `data: <json>`
//! lines over a plain HTTP response body. This crate decodes that body
//! incrementally and hands it out as a lazy stream of typed events.
//!
//! ## Architecture
//!
//! ```text
//! response body ──▶ decoder::LineDecoder ──▶ sse::token_stream ──▶ StreamToken
//!   (byte chunks)      (complete lines)        (parse + classify)     (caller)
//! ```
//!
//! - [`decoder`]: turns arbitrary byte chunks into whole lines, tolerant of
//!   chunk boundaries inside lines or multibyte characters
//! - [`sse`]: recognizes `data: ` lines, parses them into [`StreamToken`]s
//!   and ends the stream on `complete` / `error`
//! - [`client`]: [`ChatClient`] for the stream endpoint and the plain chat
//!   endpoints (list, create, get, delete, messages, health)
//! - [`stream`]: folding a reply stream into a [`Reply`]
//!
//! ## Example
//! ```no_run
//! use futures::StreamExt;
//! use jarvis_chat::{ChatClient, ClientOptions, TokenKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChatClient::new(ClientOptions::from_env())?;
//!
//!     let stream = client.stream_message("chat-1", "Tell me a joke").await?;
//!     futures::pin_mut!(stream);
//!
//!     while let Some(token) = stream.next().await {
//!         let token = token?;
//!         match token.kind {
//!             TokenKind::Token => print!("{}", token.content),
//!             TokenKind::Complete => println!(),
//!             TokenKind::Error => eprintln!("\nerror: {}", token.content),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod decoder;
pub mod http;
pub mod model;
pub mod options;
pub mod sse;
pub mod stream;

// Re-exports for convenience
pub use client::{ChatClient, ClientError};
pub use model::{Chat, ChatWithMessages, HealthStatus, Message, Role, StreamToken, TokenKind};
pub use options::ClientOptions;
pub use stream::{collect_reply, Reply};
