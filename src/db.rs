//! SQLite persistence: pool setup, schema creation and catalog seeding.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use sqlx::{Executor, Sqlite, SqlitePool};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

/// Connections older than this are closed and reopened.
const POOL_MAX_LIFETIME: Duration = Duration::from_secs(300);

/// A track to be inserted into the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Opens the pool and makes sure the schema exists.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    // An in-memory database lives only as long as its single connection.
    let in_memory = database_url.contains(":memory:");
    let pool = SqlitePoolOptions::new()
        .max_connections(if in_memory { 1 } else { 5 })
        .max_lifetime(if in_memory { None } else { Some(POOL_MAX_LIFETIME) })
        .idle_timeout(if in_memory { None } else { Some(POOL_MAX_LIFETIME) })
        .test_before_acquire(true)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            album TEXT,
            genre TEXT,
            preview_url TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tracks_artist ON tracks (artist)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn insert_track<'e, E>(executor: E, track: &NewTrack) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO tracks (title, artist, album, genre, preview_url) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&track.title)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.genre)
    .bind(&track.preview_url)
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn count_tracks(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await
}

/// Loads a JSON array of tracks into an empty catalog. Returns how many were
/// inserted; a catalog that already has rows is left alone.
pub async fn seed_from_file(pool: &SqlitePool, path: &Path) -> anyhow::Result<usize> {
    if count_tracks(pool).await? > 0 {
        info!("Catalog already populated, skipping seed file {}", path.display());
        return Ok(0);
    }

    let content = tokio::fs::read_to_string(path).await?;
    let tracks: Vec<NewTrack> = serde_json::from_str(&content)?;

    let mut tx = pool.begin().await?;
    for track in &tracks {
        insert_track(&mut *tx, track).await?;
    }
    tx.commit().await?;

    info!("Seeded {} tracks from {}", tracks.len(), path.display());
    Ok(tracks.len())
}
