use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use pushdeck::config::Config;
use pushdeck::history::store::HistoryStore;
use pushdeck::notify::beams::{BeamsClient, PushGateway};
use pushdeck::notify::dispatch::Dispatcher;
use pushdeck::server::app::build_router;
use pushdeck::server::rate_limit::RateLimiter;
use pushdeck::server::state::AppState;
use pushdeck::uploads::UploadStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;

    let gateway: Option<Arc<dyn PushGateway>> = match config.pusher_credentials() {
        Some((instance_id, secret_key)) => {
            let client = BeamsClient::new(instance_id, secret_key)?;
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!(
                "push provider not configured; set PUSHER_INSTANCE_ID and PUSHER_SECRET_KEY to enable sends"
            );
            None
        }
    };

    let history = HistoryStore::new(config.history_path());
    let uploads = UploadStore::new(config.upload_dir());
    let server_config = config.server.clone();
    let state = AppState {
        dispatcher: Dispatcher::new(gateway, history.clone()),
        history,
        uploads,
        instance_id: config.instance_id(),
        rate_limiter: Some(RateLimiter::from_config(
            server_config
                .as_ref()
                .and_then(|server| server.rate_limit.as_ref()),
        )),
        server_config,
    };

    let public_dir = config.public_dir();
    let router = build_router(state, Some(public_dir.as_path()));

    let bind = config.bind();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, "pushdeck listening");
    axum::serve(listener, router).await.context("server failed")
}
