// src/state.rs
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::services::chatbot::{ChatService, HttpChatService, KeywordChatService};
use crate::services::music::{CatalogMusicService, MusicService};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub chat: Arc<dyn ChatService>,
    pub music: Arc<dyn MusicService>,
    pub db: Option<SqlitePool>,
}

impl AppState {
    pub fn new(chat: Arc<dyn ChatService>, music: Arc<dyn MusicService>) -> Self {
        Self { chat, music, db: None }
    }

    /// Wires the collaborators named by `config` around an open pool.
    pub fn from_config(config: &Config, pool: SqlitePool) -> Self {
        let chat: Arc<dyn ChatService> = match &config.chat_service_url {
            Some(url) => {
                tracing::info!("Using chat service at {}", url);
                Arc::new(HttpChatService::new(url.clone()))
            }
            None => Arc::new(KeywordChatService),
        };

        Self {
            chat,
            music: Arc::new(CatalogMusicService::new(pool.clone())),
            db: Some(pool),
        }
    }

    pub async fn close(&self) {
        if let Some(pool) = &self.db {
            pool.close().await;
        }
    }
}
