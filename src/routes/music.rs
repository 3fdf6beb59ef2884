use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use super::call_collaborator;
use crate::{
    error::{AppError, Endpoint},
    message::{MusicSearchRequest, RecommendRequest, TrackRecord, parse_envelope},
    state::SharedState,
};

pub async fn search_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Vec<TrackRecord>>, AppError> {
    let payload: MusicSearchRequest = parse_envelope(&body, "query", "Missing query")?;
    info!("Searching for music: {}", payload.query);

    let music = state.music.clone();
    let results = call_collaborator(Endpoint::Search, async move {
        music.search_music(&payload.query).await
    })
    .await?;

    info!("Found {} music results", results.len());
    Ok(Json(results))
}

pub async fn recommend_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<Vec<TrackRecord>>, AppError> {
    let payload: RecommendRequest = parse_envelope(&body, "song_id", "Missing song ID")?;
    info!("Getting recommendations for song: {}", payload.song_id);

    let music = state.music.clone();
    let recommendations = call_collaborator(Endpoint::Recommend, async move {
        music.get_recommendations(&payload.song_id).await
    })
    .await?;

    info!("Found {} recommendations", recommendations.len());
    Ok(Json(recommendations))
}
