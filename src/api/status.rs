// src/api/status.rs
// GET /status: read-only report of which provider credentials are present

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub services: ServiceMap,
    pub available: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
pub struct ServiceMap {
    pub chatgpt: bool,
    pub deepseek: bool,
    pub gemini: bool,
}

/// Projection of the startup credential snapshot. Credentials are read once
/// into the injected config, so this is stable within one process lifetime
/// and changes only across restarts. Secret values are never exposed.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let (chatgpt, deepseek, gemini) = state.config.credential_presence();
    let available = chatgpt && deepseek && gemini;

    Json(StatusResponse {
        success: true,
        services: ServiceMap {
            chatgpt,
            deepseek,
            gemini,
        },
        available,
        message: if available {
            "All AI services are configured and ready"
        } else {
            "Some API keys are missing. Configure them in the server environment."
        },
    })
}
