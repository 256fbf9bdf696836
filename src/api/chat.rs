// src/api/chat.rs
// POST /chat: validate, select a provider, dispatch, normalize the reply

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::llm::{select_provider, ProviderChoice, UsageInfo};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub provider: ProviderChoice,
}

#[derive(Serialize)]
pub struct ChatReply {
    pub success: bool,
    pub reply: String,
    pub provider: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageInfo>,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatReply>> {
    // Malformed body (bad JSON, wrong types, unknown provider value) is a
    // distinct client error, reported before any provider work
    let Json(request) = payload.map_err(|e| {
        let err = ApiError::validation("Message is required and must be a string");
        if state.config.development {
            err.with_detail(e.body_text())
        } else {
            err
        }
    })?;

    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::validation(
            "Message is required and must be a non-empty string",
        ));
    }

    let provider_id = select_provider(request.provider, message);
    info!(
        "chat request: provider={} message_len={}",
        provider_id,
        message.len()
    );

    let reply = state
        .llm
        .invoke(provider_id, message)
        .await
        .map_err(|e| ApiError::from_provider(e, state.config.development))?;

    Ok(Json(ChatReply {
        success: true,
        reply: reply.text,
        provider: provider_id.as_str(),
        model: reply.model,
        usage: reply.usage,
    }))
}
