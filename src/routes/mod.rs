// src/routes/mod.rs
pub mod chat;
pub mod music;

use std::future::Future;
use std::path::Path;

use axum::{
    Router,
    response::Html,
    routing::{get, post},
};
use chat::chat_handler;
use music::{recommend_handler, search_handler};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, Endpoint, ServiceError};
use crate::state::SharedState;

const INDEX_HTML: &str = include_str!("../../templates/index.html");

pub fn create_router(static_dir: impl AsRef<Path>) -> Router<SharedState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/chat", post(chat_handler))
        .route("/search_music", post(search_handler))
        .route("/recommend", post(recommend_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
}

pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Runs a collaborator call on its own task so a dropped connection does not
/// cancel it, and maps both errors and panics to the endpoint's failure.
pub(crate) async fn call_collaborator<T, F>(endpoint: Endpoint, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, ServiceError>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(source)) => Err(AppError::Processing { endpoint, source }),
        Err(join_err) => Err(AppError::Processing {
            endpoint,
            source: ServiceError::Other(format!("collaborator task failed: {}", join_err)),
        }),
    }
}
