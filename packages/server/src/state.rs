use std::sync::Arc;

use bench_common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::oauth::DiscordOAuth;
use crate::summarizer::Summarizer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub blobs: Arc<dyn BlobStore>,
    pub summarizer: Summarizer,
    pub oauth: Arc<DiscordOAuth>,
}
