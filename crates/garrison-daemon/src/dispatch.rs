//! Per-message dispatch: the event loop and failure boundary.
//!
//! Each inbound message is classified once: deployment logs from the
//! trusted account are ingested, prefixed text from humans is routed to a
//! command, everything else is dropped. Handler failures are caught here —
//! logged with the command name, answered with a best-effort error reply —
//! and never escape the loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use garrison_channel::{ChannelError, ChatClient, IncomingMessage};
use garrison_types::BotConfig;

use crate::commands::{router, CommandRegistry, HandlerContext};
use crate::ingest::{DeploymentLogParser, LOG_MARKER};

/// Delay between polls when the channel has no new messages.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// The per-message dispatcher.
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    ctx: Arc<HandlerContext>,
    parser: DeploymentLogParser,
    prefix: String,
    watch_channel_id: String,
    log_author_id: String,
}

impl Dispatcher {
    pub fn new(
        config: &BotConfig,
        registry: Arc<CommandRegistry>,
        ctx: Arc<HandlerContext>,
    ) -> Self {
        Self {
            registry,
            ctx,
            parser: DeploymentLogParser::new(),
            prefix: config.prefix.clone(),
            watch_channel_id: config.channel_id.clone(),
            log_author_id: config.log_author_id.clone(),
        }
    }

    /// Poll the chat session and dispatch until it shuts down.
    ///
    /// Each message is handled in its own task, so a handler suspended on a
    /// store call does not stall the loop.
    pub async fn run(self: Arc<Self>, chat: Arc<dyn ChatClient>) {
        loop {
            match chat.next_message().await {
                Ok(Some(msg)) => {
                    let dispatcher = Arc::clone(&self);
                    tokio::spawn(async move { dispatcher.handle_message(msg).await });
                }
                Ok(None) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(ChannelError::Shutdown) => {
                    info!("chat session shut down; stopping dispatch loop");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "failed to poll chat session");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }
    }

    /// Classify and handle one message. Never fails.
    pub async fn handle_message(&self, msg: IncomingMessage) {
        if self.is_deployment_log(&msg) {
            self.ingest(&msg).await;
            return;
        }

        // Commands come from humans only.
        if msg.author_is_bot {
            return;
        }
        let Some(body) = msg.text.strip_prefix(self.prefix.as_str()) else {
            return;
        };
        let Some(parsed) = router::resolve(body, &self.registry) else {
            return;
        };
        let Some(cmd) = self.registry.lookup(&parsed.name) else {
            // Deliberate silence: unrecognized prefixed text must not
            // produce bot noise.
            debug!(command = %parsed.name, "unrecognized command ignored");
            return;
        };

        if let Err(e) = cmd.execute(&msg, &parsed.args, &self.ctx).await {
            let detail = format!("{e:#}");
            error!(command = %parsed.name, error = %detail, "command execution failed");
            if let Err(send_err) = self
                .ctx
                .chat
                .send_message(&msg.channel_id, "error executing this command")
                .await
            {
                warn!(error = %send_err, "failed to send error reply");
            }
        }
    }

    fn is_deployment_log(&self, msg: &IncomingMessage) -> bool {
        msg.channel_id == self.watch_channel_id
            && msg.author_id == self.log_author_id
            && msg.text.contains(LOG_MARKER)
    }

    async fn ingest(&self, msg: &IncomingMessage) {
        let record = match self.parser.parse(&msg.text) {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "failed to parse deployment log");
                return;
            }
        };

        match self
            .ctx
            .deployments
            .append(self.ctx.store.as_ref(), &self.ctx.spreadsheet_id, &record)
            .await
        {
            Ok(()) => info!(submitted_by = %record.submitted_by, "deployment logged"),
            Err(e) => error!(error = %e, "failed to append deployment log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use garrison_channel::ScriptedChat;
    use garrison_sheets::{DeploymentLogTable, MemoryStore, RankTable, RowStore, StrikeTable};

    use crate::commands::register_builtins;

    fn make_config() -> BotConfig {
        BotConfig {
            bot_token: "tok".into(),
            channel_id: "deploy-chan".into(),
            log_author_id: "dyno".into(),
            spreadsheet_id: "sheet-1".into(),
            sheets_token: "stok".into(),
            port: 10000,
            prefix: "!".into(),
            default_role_id: "999".into(),
        }
    }

    fn make_dispatcher() -> (Arc<Dispatcher>, Arc<ScriptedChat>, Arc<MemoryStore>) {
        let config = make_config();
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

    fn human_msg(text: &str) -> IncomingMessage {
        IncomingMessage {
            author_id: "42".into(),
            author_is_bot: false,
            channel_id: "deploy-chan".into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn test_unprefixed_text_is_ignored() {
        let (dispatcher, chat, _store) = make_dispatcher();
        dispatcher.handle_message(human_msg("just chatting")).await;
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_command_is_silently_ignored() {
        let (dispatcher, chat, _store) = make_dispatcher();
        dispatcher
            .handle_message(human_msg("!notacommand at all"))
            .await;
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_bot_authors_cannot_invoke_commands() {
        let (dispatcher, chat, store) = make_dispatcher();
        let mut msg = human_msg("!strike @alice");
        msg.author_is_bot = true;
        dispatcher.handle_message(msg).await;
        assert!(chat.sent().is_empty());
        assert!(store.rows("Strikes").is_empty());
    }

    #[tokio::test]
    async fn test_prefix_only_message_is_ignored() {
        let (dispatcher, chat, _store) = make_dispatcher();
        dispatcher.handle_message(human_msg("!")).await;
        dispatcher.handle_message(human_msg("!   ")).await;
        assert!(chat.sent().is_empty());
    }

    #[tokio::test]
    async fn test_alias_dispatches_to_canonical_handler() {
        let (dispatcher, chat, _store) = make_dispatcher();
        dispatcher
            .handle_message(human_msg("!deploy-start 0900 alpha"))
            .await;

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].1.contains("DEPLOYMENT START"));
    }

    #[tokio::test]
    async fn test_error_reply_failure_is_swallowed() {
        let (dispatcher, chat, store) = make_dispatcher();
        store.fail_all();
        chat.fail_sends();
        // Must not panic even though both the handler and the reply fail.
        dispatcher.handle_message(human_msg("!strike @alice")).await;
        assert!(chat.sent().is_empty());
    }
}
