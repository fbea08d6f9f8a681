//! Binary entry point: wire configuration, clients, and the dispatch loop.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use garrison_channel::{ChatClient, DiscordClient};
use garrison_daemon::commands::{register_builtins, CommandRegistry, HandlerContext};
use garrison_daemon::{dispatch::Dispatcher, keepalive};
use garrison_sheets::{DeploymentLogTable, RankTable, RowStore, SheetsClient, StrikeTable};
use garrison_types::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env()?;
    info!(
        port = config.port,
        prefix = %config.prefix,
        channel = %config.channel_id,
        "configuration loaded"
    );

    let chat: Arc<dyn ChatClient> =
        Arc::new(DiscordClient::new(&config.bot_token, &config.channel_id));
    let store: Arc<dyn RowStore> = Arc::new(SheetsClient::new(&config.sheets_token));

    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry);
    let registry = Arc::new(registry);

    let ctx = Arc::new(HandlerContext {
        chat: Arc::clone(&chat),
        store,
        spreadsheet_id: config.spreadsheet_id.clone(),
        default_role_id: config.default_role_id.clone(),
        strikes: StrikeTable::new(),
        ranks: RankTable::new(),
        deployments: DeploymentLogTable::new(),
        registry: Arc::clone(&registry),
    });

    let port = config.port;
    tokio::spawn(async move {
        if let Err(e) = keepalive::serve(port).await {
            error!(error = %e, "keep-alive listener stopped");
        }
    });

    let dispatcher = Arc::new(Dispatcher::new(&config, registry, ctx));
    info!("garrison ready");
    dispatcher.run(chat).await;

    Ok(())
}
