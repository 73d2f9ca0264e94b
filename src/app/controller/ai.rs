use axum::{extract::State, Json};
use serde::Deserialize;

use crate::app::AppState;
use crate::app::response::ChatReply;
use crate::error::RequestError;
use crate::services::ChatMessage;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

pub struct AiController;

#[docview_macros::controller(state = AppState)]
impl AiController {
    /// Forwards a conversation to the registered chat client.
    #[docview_macros::post]
    pub async fn chat(State(state): State<AppState>, Json(request): Json<ChatRequest>) -> Result<Json<ChatReply>, RequestError> {
        let content = state.services.chat_client().complete(&request.messages).await?;

        Ok(Json(ChatReply { content }))
    }
}
