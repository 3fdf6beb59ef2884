use music_chat_backend::db::{self, NewTrack};
use music_chat_backend::message::SongId;
use music_chat_backend::services::music::{CatalogMusicService, MusicService};

use serde_json::{Value, json};
use sqlx::SqlitePool;
use std::io::Write;

fn track(title: &str, artist: &str, genre: Option<&str>) -> NewTrack {
    NewTrack {
        title: title.to_string(),
        artist: artist.to_string(),
        album: None,
        genre: genre.map(str::to_string),
        preview_url: None,
    }
}

async fn seeded_pool() -> (SqlitePool, Vec<i64>) {
    let pool = db::connect("sqlite::memory:").await.unwrap();
    let mut ids = Vec::new();
    for t in [
        track("So What", "Miles Davis", Some("Jazz")),
        track("Blue in Green", "Miles Davis", Some("Jazz")),
        track("Take Five", "The Dave Brubeck Quartet", Some("Jazz")),
        track("Bohemian Rhapsody", "Queen", Some("Rock")),
        track("100% Pure", "Test Artist", None),
    ] {
        ids.push(db::insert_track(&pool, &t).await.unwrap());
    }
    (pool, ids)
}

fn titles(records: &[Value]) -> Vec<&str> {
    records.iter().map(|r| r["title"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_search_matches_any_field_case_insensitively() {
    let (pool, _) = seeded_pool().await;
    let music = CatalogMusicService::new(pool);

    let results = music.search_music(&json!("MILES")).await.unwrap();
    assert_eq!(titles(&results), ["Blue in Green", "So What"]);

    let results = music.search_music(&json!("rock")).await.unwrap();
    assert_eq!(titles(&results), ["Bohemian Rhapsody"]);
    assert_eq!(results[0]["artist"], "Queen");
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let (pool, _) = seeded_pool().await;
    let music = CatalogMusicService::new(pool);

    assert_eq!(titles(&music.search_music(&json!("100%")).await.unwrap()), ["100% Pure"]);
    assert!(music.search_music(&json!("_")).await.unwrap().is_empty());
    assert!(music.search_music(&json!("   ")).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_recommendations_prefer_same_artist_then_genre() {
    let (pool, ids) = seeded_pool().await;
    let music = CatalogMusicService::new(pool);

    let results = music.get_recommendations(&SongId::Int(ids[0])).await.unwrap();
    assert_eq!(titles(&results), ["Blue in Green", "Take Five"]);

    let results = music
        .get_recommendations(&SongId::Text(ids[3].to_string()))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_recommendations_for_unknown_song_are_empty() {
    let (pool, _) = seeded_pool().await;
    let music = CatalogMusicService::new(pool);

    assert!(music.get_recommendations(&SongId::Int(9999)).await.unwrap().is_empty());
    assert!(
        music
            .get_recommendations(&SongId::Text("not-a-number".to_string()))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_non_text_inputs() {
    let (pool, _) = seeded_pool().await;
    let music = CatalogMusicService::new(pool);

    assert_eq!(titles(&music.search_music(&json!(100)).await.unwrap()), ["100% Pure"]);
    assert!(music.search_music(&Value::Null).await.is_err());
    assert!(music.search_music(&json!(["jazz"])).await.is_err());

    assert!(music.get_recommendations(&SongId::Other(json!(4.5))).await.unwrap().is_empty());
    assert!(music.get_recommendations(&SongId::Other(Value::Null)).await.is_err());
    assert!(music.get_recommendations(&SongId::Other(json!(true))).await.is_err());
}

#[tokio::test]
async fn test_closed_pool_surfaces_errors() {
    let (pool, _) = seeded_pool().await;
    let music = CatalogMusicService::new(pool.clone());
    pool.close().await;

    assert!(music.search_music(&json!("jazz")).await.is_err());
}

#[tokio::test]
async fn test_seed_from_file_only_fills_empty_catalog() {
    let pool = db::connect("sqlite::memory:").await.unwrap();

    let path = std::env::temp_dir().join(format!("catalog-seed-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"[{{"title": "Teardrop", "artist": "Massive Attack", "genre": "Trip Hop"}},
            {{"title": "Clair de Lune", "artist": "Claude Debussy"}}]"#
    )
    .unwrap();
    drop(file);

    assert_eq!(db::seed_from_file(&pool, &path).await.unwrap(), 2);
    assert_eq!(db::seed_from_file(&pool, &path).await.unwrap(), 0);
    assert_eq!(db::count_tracks(&pool).await.unwrap(), 2);

    std::fs::remove_file(&path).ok();
}
