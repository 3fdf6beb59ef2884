// src/error.rs
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the chat and music collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

/// The endpoint a request was handled by. Decides the fixed 500 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    Search,
    Recommend,
}

impl Endpoint {
    pub fn failure_body(self) -> serde_json::Value {
        match self {
            Endpoint::Chat => json!({
                "response": "Sorry, something went wrong. Please try again.",
                "action": null,
                "query": null,
            }),
            Endpoint::Search => json!({ "error": "Failed to search music" }),
            Endpoint::Recommend => json!({ "error": "Failed to get recommendations" }),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{endpoint:?} failed: {source}")]
    Processing {
        endpoint: Endpoint,
        #[source]
        source: ServiceError,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::BadRequest(msg) => {
                tracing::error!("Invalid request: {}", msg);
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            AppError::Processing { endpoint, source } => {
                // Only the fixed payload leaves the server.
                tracing::error!("{:?} error: {}", endpoint, source);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(endpoint.failure_body())).into_response()
            }
        }
    }
}
