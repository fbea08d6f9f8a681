//! Keep-alive HTTP listener.
//!
//! Hosting platforms ping the process over HTTP to keep it awake; both `/`
//! and `/health` answer a static 200. Nothing here touches the bot's state.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tracing::info;

async fn ok() -> &'static str {
    "ok"
}

/// Serve the liveness endpoints on the given port until the process exits.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let app = Router::new().route("/", get(ok)).route("/health", get(ok));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "keep-alive listener started");

    axum::serve(listener, app).await?;
    Ok(())
}
