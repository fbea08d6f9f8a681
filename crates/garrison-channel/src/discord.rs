//! Discord REST channel adapter.
//!
//! Sends outbound messages via `POST /channels/{id}/messages` and pulls
//! inbound messages by polling `GET /channels/{id}/messages` with an
//! `after` cursor. Bot-authored messages are passed through (not filtered):
//! deployment-log ingestion depends on seeing messages from another bot.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::channel::{ChannelError, ChatClient, IncomingMessage};

const API_BASE: &str = "https://discord.com/api/v10";

/// How many messages to fetch per poll.
const POLL_LIMIT: u32 = 10;

/// Outbound message payload.
#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
}

/// Author object on a Discord message.
#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    #[serde(default)]
    bot: bool,
}

/// A message from the channel messages endpoint.
#[derive(Debug, Deserialize)]
struct DiscordMessage {
    id: String,
    #[serde(default)]
    content: String,
    channel_id: String,
    author: DiscordUser,
}

/// Discord chat client polling a single channel.
pub struct DiscordClient {
    client: Client,
    token: String,
    channel_id: String,
    /// Snowflake of the newest message we have seen.
    cursor: Mutex<Option<u64>>,
}

impl DiscordClient {
    /// Create a client for the given bot token and watched channel.
    pub fn new(token: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            token: token.into(),
            channel_id: channel_id.into(),
            cursor: Mutex::new(None),
        }
    }

    fn auth_value(&self) -> String {
        format!("Bot {}", self.token)
    }

    async fn fetch_batch(&self, after: Option<u64>) -> Result<Vec<DiscordMessage>, ChannelError> {
        let mut request = self
            .client
            .get(format!(
                "{API_BASE}/channels/{}/messages",
                self.channel_id
            ))
            .header("Authorization", self.auth_value())
            .query(&[("limit", POLL_LIMIT.to_string())]);

        if let Some(after) = after {
            request = request.query(&[("after", after.to_string())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            return Err(ChannelError::Api(format!(
                "message fetch returned {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

/// Parse a snowflake ID. Discord IDs are decimal u64 strings.
fn snowflake(id: &str) -> Option<u64> {
    id.parse().ok()
}

#[async_trait]
impl ChatClient for DiscordClient {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError> {
        let response = self
            .client
            .post(format!("{API_BASE}/channels/{channel_id}/messages"))
            .header("Authorization", self.auth_value())
            .json(&CreateMessage { content: text })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable>".to_string());
            return Err(ChannelError::Api(format!(
                "message send returned {status}: {body}"
            )));
        }

        Ok(())
    }

    async fn next_message(&self) -> Result<Option<IncomingMessage>, ChannelError> {
        let mut cursor = self.cursor.lock().await;

        // First poll: seed the cursor from the newest existing message so we
        // do not replay channel history from before the process started.
        if cursor.is_none() {
            let batch = self.fetch_batch(None).await?;
            *cursor = Some(
                batch
                    .first()
                    .and_then(|m| snowflake(&m.id))
                    .unwrap_or(0),
            );
            return Ok(None);
        }

        let batch = self.fetch_batch(*cursor).await?;

        // Messages come newest-first; walk in chronological order and return
        // the oldest one we have not seen. The cursor only advances to the
        // returned message, so the rest of the batch is re-fetched next poll.
        for msg in batch.iter().rev() {
            let id = match snowflake(&msg.id) {
                Some(id) => id,
                None => continue,
            };
            if cursor.is_some_and(|last| id <= last) {
                continue;
            }
            *cursor = Some(id);
            debug!(id = %msg.id, author = %msg.author.id, "received message");
            return Ok(Some(IncomingMessage {
                author_id: msg.author.id.clone(),
                author_is_bot: msg.author.bot,
                channel_id: msg.channel_id.clone(),
                text: msg.content.clone(),
            }));
        }

        Ok(None)
    }

    fn name(&self) -> &str {
        "discord"
    }
}
