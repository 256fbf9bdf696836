// src/api/router.rs
// HTTP router composition: routes, CORS, version header, method guard

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use super::chat::chat_handler;
use super::error::ApiError;
use super::status::status_handler;
use crate::state::AppState;

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create the router with all endpoints.
///
/// The permissive CORS layer answers `OPTIONS /chat` preflights with 200 and
/// an empty body before any handler runs; any other unsupported verb falls
/// through to the 405 fallback.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // API version header on all responses
    let version_header = SetResponseHeaderLayer::if_not_present(
        header::HeaderName::from_static("x-api-version"),
        HeaderValue::from_static(API_VERSION),
    );

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/status", get(status_handler))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(version_header)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}
