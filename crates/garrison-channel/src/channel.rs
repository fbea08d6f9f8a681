//! Core chat client trait and types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from chat session operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("chat session shut down")]
    Shutdown,

    #[error("{0}")]
    Other(String),
}

/// One inbound chat message, as delivered by the platform.
///
/// Owned by the chat session; the command core only reads it.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    /// User ID of the message author.
    pub author_id: String,
    /// Whether the author is a bot account.
    pub author_is_bot: bool,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Raw message text.
    pub text: String,
}

/// A bidirectional chat session.
///
/// Both methods take `&self`: implementations keep their poll cursor behind
/// interior mutability so one shared handle can serve the dispatch loop and
/// every handler concurrently.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a text message to a channel.
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError>;

    /// Pull the next unprocessed inbound message, if any.
    ///
    /// Returns `Ok(None)` when no new message is available; the caller
    /// decides how long to wait before polling again.
    async fn next_message(&self) -> Result<Option<IncomingMessage>, ChannelError>;

    /// Backend name for diagnostics.
    fn name(&self) -> &str;
}
