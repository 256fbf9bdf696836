// src/api/error.rs
// Centralized error handling for HTTP API responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::error;

use crate::llm::ProviderError;

/// Standard API error response format: `{success: false, error, detail?}`.
/// `detail` is attached only when the development flag is set; production
/// responses carry the sanitized message alone.
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub detail: Option<String>,
}

impl ApiError {
    /// Bad or missing input, the client's fault (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
            detail: None,
        }
    }

    /// Wrong verb on an endpoint (405)
    pub fn method_not_allowed() -> Self {
        Self {
            message: "Method not allowed. Use POST.".to_string(),
            status_code: StatusCode::METHOD_NOT_ALLOWED,
            detail: None,
        }
    }

    /// Missing server-side credential (500)
    pub fn configuration(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            detail: None,
        }
    }

    /// Provider call failed (502)
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_GATEWAY,
            detail: None,
        }
    }

    /// Provider signaled throttling (429)
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::TOO_MANY_REQUESTS,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Map a provider failure to its HTTP outcome. The raw error string is
    /// attached as detail only in development mode; production callers see
    /// the sanitized message.
    pub fn from_provider(err: ProviderError, development: bool) -> Self {
        let sanitized = match &err {
            ProviderError::Configuration { provider, credential } => {
                error!("{} credential missing: {}", provider, credential);
                Self::configuration(format!(
                    "Server configuration error: {} API key missing",
                    provider
                ))
            }
            ProviderError::RateLimited { provider } => {
                error!("{} rate limited", provider);
                Self::rate_limited("Rate limit exceeded. Please try again later.")
            }
            ProviderError::Upstream { provider, status, .. } => {
                error!("{} upstream failure (status {:?})", provider, status);
                Self::upstream(format!(
                    "Something went wrong with the {} service",
                    provider
                ))
            }
        };

        if development {
            sanitized.with_detail(err.to_string())
        } else {
            sanitized
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = json!({
            "success": false,
            "error": self.message,
        });

        if let Some(detail) = self.detail {
            body["detail"] = json!(detail);
        }

        (self.status_code, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
