//! Chat session abstraction for the garrison bot.
//!
//! A [`ChatClient`] implementation handles one messaging backend. Outbound
//! replies are sent via [`ChatClient::send_message`], and inbound messages
//! are pulled via [`ChatClient::next_message`]. The dispatch loop in the
//! daemon crate is written against the trait, so the Discord adapter can be
//! swapped for the scripted in-memory client in tests.

pub mod channel;
pub mod discord;
pub mod memory;

pub use channel::{ChannelError, ChatClient, IncomingMessage};
pub use discord::DiscordClient;
pub use memory::ScriptedChat;
