//! Core command handler types: context and trait.
//!
//! Every command implements [`Command`], which provides metadata (name,
//! aliases, help) and an async `execute` method. Commands receive the
//! incoming message, the parsed argument tokens, and a [`HandlerContext`]
//! bundling the shared clients they need but do not own.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use garrison_channel::{ChatClient, IncomingMessage};
use garrison_sheets::{DeploymentLogTable, RankTable, RowStore, StrikeTable};

use super::registry::CommandRegistry;

/// Shared dependencies injected into every command invocation.
///
/// Owned by the dispatch loop and passed by reference; handlers never hold
/// module-level singletons.
pub struct HandlerContext {
    /// Chat session used for replies and announcements.
    pub chat: Arc<dyn ChatClient>,
    /// Tabular row store.
    pub store: Arc<dyn RowStore>,
    /// Spreadsheet all tables live in.
    pub spreadsheet_id: String,
    /// Role ID used as the default mention target in announcements.
    pub default_role_id: String,
    /// Strike counter table.
    pub strikes: StrikeTable,
    /// Rank table.
    pub ranks: RankTable,
    /// Append-only deployment log table.
    pub deployments: DeploymentLogTable,
    /// The registry the command was dispatched from, for introspection
    /// (help listings).
    pub registry: Arc<CommandRegistry>,
}

impl HandlerContext {
    /// Send a reply to the channel the message came from.
    pub async fn reply(&self, msg: &IncomingMessage, text: &str) -> Result<()> {
        self.chat.send_message(&msg.channel_id, text).await?;
        Ok(())
    }
}

/// Trait all commands implement.
///
/// Commands are registered in the [`CommandRegistry`] under their primary
/// name and every alias; aliasing is pure reference sharing, so looking up
/// an alias yields the same handler object as the canonical name.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary command name, lowercase.
    fn name(&self) -> &str;

    /// Alternative names for this command.
    fn aliases(&self) -> Vec<&str> {
        vec![]
    }

    /// One-line description shown in help listings.
    fn description(&self) -> &str;

    /// Usage pattern shown in help listings.
    fn usage(&self) -> &str;

    /// Execute the command. Replies are sent through `ctx`; any error is
    /// caught at the dispatch boundary.
    async fn execute(
        &self,
        msg: &IncomingMessage,
        args: &[String],
        ctx: &HandlerContext,
    ) -> Result<()>;
}
