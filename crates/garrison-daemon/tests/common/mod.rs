//! Shared helpers for integration tests.
//!
//! Each integration test file compiles common/ as its own module, so not
//! every helper is used in every file.
#![allow(dead_code)]

use std::sync::Arc;

use garrison_channel::{ChatClient, IncomingMessage, ScriptedChat};
use garrison_daemon::commands::{register_builtins, CommandRegistry, HandlerContext};
use garrison_daemon::dispatch::Dispatcher;
use garrison_sheets::{DeploymentLogTable, MemoryStore, RankTable, RowStore, StrikeTable};
use garrison_types::BotConfig;

pub const CHANNEL: &str = "deploy-chan";
pub const LOG_AUTHOR: &str = "155149108183695360";
pub const SHEET: &str = "sheet-1";

/// Configuration used by every integration test.
pub fn test_config() -> BotConfig {
    BotConfig {
        bot_token: "test-token".into(),
        channel_id: CHANNEL.into(),
        log_author_id: LOG_AUTHOR.into(),
        spreadsheet_id: SHEET.into(),
        sheets_token: "test-sheets-token".into(),
        port: 10000,
        prefix: "!".into(),
        default_role_id: "999".into(),
    }
}

/// Build a dispatcher wired to a scripted chat and an in-memory store.
pub fn build_bot() -> (Arc<Dispatcher>, Arc<ScriptedChat>, Arc<MemoryStore>) {
    let config = test_config();
    let chat = Arc::new(ScriptedChat::new());
    let store = Arc::new(MemoryStore::new());

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    let registry = Arc::new(registry);

    let ctx = Arc::new(HandlerContext {
        chat: Arc::clone(&chat) as Arc<dyn ChatClient>,
        store: Arc::clone(&store) as Arc<dyn RowStore>,
        spreadsheet_id: config.spreadsheet_id.clone(),
        default_role_id: config.default_role_id.clone(),
        strikes: StrikeTable::new(),
        ranks: RankTable::new(),
        deployments: DeploymentLogTable::new(),
        registry: Arc::clone(&registry),
    });

    let dispatcher = Arc::new(Dispatcher::new(&config, registry, ctx));
    (dispatcher, chat, store)
}

/// A human message in the watched channel.
pub fn human_msg(text: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: "42".into(),
        author_is_bot: false,
        channel_id: CHANNEL.into(),
        text: text.into(),
    }
}

/// A message from the trusted deployment-log account.
pub fn log_msg(text: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: LOG_AUTHOR.into(),
        author_is_bot: true,
        channel_id: CHANNEL.into(),
        text: text.into(),
    }
}
