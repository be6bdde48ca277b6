//! Stream a reply from a running Jarvis backend.
//!
//! Run with:
//! ```bash
//! export JARVIS_API_BASE_URL="http://localhost:8000/api"
//! RUST_LOG=jarvis_chat=debug cargo run --example chat_stream -- "Write a haiku about Rust"
//! ```

use futures::StreamExt;
use jarvis_chat::{ChatClient, TokenKind};
use std::io::Write;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, Jarvis!".to_string());

    let client = ChatClient::from_env()?;

    let health = client.health_check().await?;
    println!("Backend {} ({})", health.status, health.version);

    let chat = client.create_chat(Some("Demo")).await?;
    println!("Created chat {}\n", chat.id);

    let stream = client.stream_message(&chat.id, &prompt).await?;
    futures::pin_mut!(stream);

    while let Some(token) = stream.next().await {
        let token = token?;
        match token.kind {
            TokenKind::Token => {
                print!("{}", token.content);
                std::io::stdout().flush()?;
            }
            TokenKind::Complete => {
                println!("\n\n=== Stream Complete ===");
                if let Some(id) = token.message_id {
                    println!("Message id: {}", id);
                }
            }
            TokenKind::Error => {
                eprintln!("\n\nError in stream: {}", token.content);
            }
        }
    }

    let history = client.get_messages(&chat.id).await?;
    println!("Chat now holds {} messages", history.len());

    client.delete_chat(&chat.id).await?;
    Ok(())
}
