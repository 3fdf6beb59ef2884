use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, SqlitePool};

use crate::error::ServiceError;
use crate::message::{SongId, TrackRecord, value_text};

pub const SEARCH_LIMIT: i64 = 20;
pub const RECOMMEND_LIMIT: i64 = 10;

#[async_trait]
pub trait MusicService: Send + Sync {
    async fn search_music(&self, query: &Value) -> Result<Vec<TrackRecord>, ServiceError>;
    async fn get_recommendations(&self, song_id: &SongId) -> Result<Vec<TrackRecord>, ServiceError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Track {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub preview_url: Option<String>,
}

fn to_records(tracks: Vec<Track>) -> Result<Vec<TrackRecord>, ServiceError> {
    tracks
        .into_iter()
        .map(|t| serde_json::to_value(t).map_err(|e| ServiceError::Other(e.to_string())))
        .collect()
}

/// Escapes LIKE wildcards so user text is matched literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Music lookups against the local `tracks` table.
#[derive(Debug, Clone)]
pub struct CatalogMusicService {
    pool: SqlitePool,
}

impl CatalogMusicService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_track(&self, id: i64) -> Result<Option<Track>, ServiceError> {
        let track = sqlx::query_as::<_, Track>(
            "SELECT id, title, artist, album, genre, preview_url FROM tracks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(track)
    }
}

#[async_trait]
impl MusicService for CatalogMusicService {
    async fn search_music(&self, query: &Value) -> Result<Vec<TrackRecord>, ServiceError> {
        let query = value_text(query)?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, title, artist, album, genre, preview_url
            FROM tracks
            WHERE lower(title) LIKE ?1 ESCAPE '\'
               OR lower(artist) LIKE ?1 ESCAPE '\'
               OR lower(coalesce(album, '')) LIKE ?1 ESCAPE '\'
               OR lower(coalesce(genre, '')) LIKE ?1 ESCAPE '\'
            ORDER BY artist, title
            LIMIT ?2
            "#,
        )
        .bind(like_pattern(query))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        to_records(tracks)
    }

    async fn get_recommendations(&self, song_id: &SongId) -> Result<Vec<TrackRecord>, ServiceError> {
        let id = match song_id {
            SongId::Int(id) => *id,
            SongId::Text(text) => match text.trim().parse::<i64>() {
                Ok(id) => id,
                Err(_) => return Ok(Vec::new()),
            },
            // A fractional number can never name a row.
            SongId::Other(Value::Number(_)) => return Ok(Vec::new()),
            SongId::Other(other) => {
                return Err(ServiceError::InvalidInput(format!("unusable song id {}", other)));
            }
        };

        let Some(seed) = self.get_track(id).await? else {
            tracing::debug!("No catalog entry for song {}", id);
            return Ok(Vec::new());
        };

        // Same artist first, then same genre.
        let tracks = sqlx::query_as::<_, Track>(
            r#"
            SELECT id, title, artist, album, genre, preview_url
            FROM tracks
            WHERE id != ?1
              AND (lower(artist) = lower(?2)
                   OR (?3 IS NOT NULL AND lower(genre) = lower(?3)))
            ORDER BY (lower(artist) = lower(?2)) DESC, title
            LIMIT ?4
            "#,
        )
        .bind(seed.id)
        .bind(&seed.artist)
        .bind(&seed.genre)
        .bind(RECOMMEND_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        to_records(tracks)
    }
}
