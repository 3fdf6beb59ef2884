use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use super::call_collaborator;
use crate::{
    error::{AppError, Endpoint},
    message::{ChatReply, ChatRequest, parse_envelope},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<ChatReply>, AppError> {
    let payload: ChatRequest = parse_envelope(&body, "message", "Missing message")?;
    info!("Received chat message: {}", payload.message);

    let chat = state.chat.clone();
    let reply = call_collaborator(Endpoint::Chat, async move {
        chat.get_chat_response(&payload.message).await
    })
    .await?;

    info!("Chat response: {:?}", reply);
    Ok(Json(reply))
}
