use std::sync::Arc;

use anyhow::Context;
use bench_common::storage::{BlobStore, FilesystemBlobStore};
use clap::Parser;
use tracing::{Level, info};

use bench_server::config::{AppConfig, CliArgs};
use bench_server::database::init_db;
use bench_server::oauth::DiscordOAuth;
use bench_server::reconcile::run_orphan_sweep;
use bench_server::services::SessionService;
use bench_server::state::AppState;
use bench_server::summarizer::{OpenAiClient, Summarizer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::load(CliArgs::parse()).context("invalid configuration")?;

    tokio::fs::create_dir_all(config.benchmarks_dir())
        .await
        .with_context(|| format!("failed to create {}", config.benchmarks_dir().display()))?;

    let db = init_db(&config.database_url())
        .await
        .context("failed to open database")?;

    let purged = SessionService::new(&db)
        .purge_expired()
        .await
        .context("failed to purge expired sessions")?;
    info!(purged, "Expired sessions removed");

    let blobs: Arc<dyn BlobStore> = Arc::new(
        FilesystemBlobStore::new(config.benchmarks_dir())
            .await
            .context("failed to open benchmark storage")?,
    );
    run_orphan_sweep(db.clone(), Arc::clone(&blobs)).await;

    let summarizer = match config.openai_api_key() {
        Some(key) => {
            info!(url = %config.openai_url, model = %config.openai_model, "AI summaries enabled");
            let client = OpenAiClient::new(&config.openai_url, &config.openai_model, key);
            Summarizer::new(Arc::new(client), db.clone())
        }
        None => {
            info!("No OpenAI API key configured, AI summaries disabled");
            Summarizer::disabled()
        }
    };

    let state = AppState {
        oauth: Arc::new(DiscordOAuth::new(&config)),
        config: Arc::new(config),
        db,
        blobs,
        summarizer,
    };
    let bind = state.config.bind.clone();
    let app = bench_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
