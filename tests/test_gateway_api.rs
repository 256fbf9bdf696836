// tests/test_gateway_api.rs
// In-process integration tests for the chat gateway using stub providers

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use polychat::api::create_router;
use polychat::config::GatewayConfig;
use polychat::llm::{LlmProvider, LlmRouter, ProviderError, ProviderReply};
use polychat::state::AppState;

// ============================================================================
// Test Helpers
// ============================================================================

#[derive(Clone, Copy)]
enum StubMode {
    Reply(&'static str),
    MissingKey(&'static str),
    RateLimited,
    Upstream,
}

struct StubProvider {
    name: &'static str,
    mode: StubMode,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl LlmProvider for StubProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn chat(&self, _message: &str) -> Result<ProviderReply, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            StubMode::Reply(text) => Ok(ProviderReply {
                text: text.to_string(),
                model: Some("stub-model".to_string()),
                usage: None,
            }),
            StubMode::MissingKey(credential) => Err(ProviderError::Configuration {
                provider: self.name,
                credential,
            }),
            StubMode::RateLimited => Err(ProviderError::RateLimited {
                provider: self.name,
            }),
            StubMode::Upstream => Err(ProviderError::Upstream {
                provider: self.name,
                status: Some(500),
                detail: "upstream exploded".to_string(),
            }),
        }
    }
}

fn test_config(development: bool) -> GatewayConfig {
    GatewayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        development,
        log_level: "info".to_string(),
        upstream_timeout: 30,
        openai_api_key: Some("test-openai-key".to_string()),
        deepseek_api_key: Some("test-deepseek-key".to_string()),
        gemini_api_key: Some("test-gemini-key".to_string()),
        openai_base_url: "https://api.openai.com".to_string(),
        deepseek_base_url: "https://api.deepseek.com".to_string(),
        gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
        openai_model: "gpt-4o-mini".to_string(),
        deepseek_model: "deepseek-chat".to_string(),
        gemini_model: "gemini-pro".to_string(),
    }
}

struct TestGateway {
    app: axum::Router,
    chatgpt_calls: Arc<AtomicUsize>,
    deepseek_calls: Arc<AtomicUsize>,
    gemini_calls: Arc<AtomicUsize>,
}

fn build_gateway(
    chatgpt: StubMode,
    deepseek: StubMode,
    gemini: StubMode,
    config: GatewayConfig,
) -> TestGateway {
    let chatgpt_calls = Arc::new(AtomicUsize::new(0));
    let deepseek_calls = Arc::new(AtomicUsize::new(0));
    let gemini_calls = Arc::new(AtomicUsize::new(0));

    let llm = LlmRouter::new(
        Arc::new(StubProvider {
            name: "chatgpt",
            mode: chatgpt,
            calls: chatgpt_calls.clone(),
        }),
        Arc::new(StubProvider {
            name: "deepseek",
            mode: deepseek,
            calls: deepseek_calls.clone(),
        }),
        Arc::new(StubProvider {
            name: "gemini",
            mode: gemini,
            calls: gemini_calls.clone(),
        }),
    );

    let state = AppState::new(Arc::new(config), Arc::new(llm));

    TestGateway {
        app: create_router(state),
        chatgpt_calls,
        deepseek_calls,
        gemini_calls,
    }
}

fn default_gateway() -> TestGateway {
    build_gateway(
        StubMode::Reply("chatgpt says hi"),
        StubMode::Reply("deepseek says hi"),
        StubMode::Reply("gemini says hi"),
        test_config(false),
    )
}

async fn post_chat(app: axum::Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ============================================================================
// Chat: happy paths
// ============================================================================

#[tokio::test]
async fn chat_poem_routes_to_chatgpt() {
    let gw = build_gateway(
        StubMode::Reply("Raindrops fall..."),
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        test_config(false),
    );

    let (status, body) = post_chat(
        gw.app,
        json!({"message": "write me a short poem about rain"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["reply"], json!("Raindrops fall..."));
    assert_eq!(body["provider"], json!("chatgpt"));
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gw.deepseek_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gw.gemini_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_debug_routes_to_deepseek() {
    let gw = default_gateway();

    let (status, body) = post_chat(gw.app, json!({"message": "debug this python function"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], json!("deepseek"));
    assert_eq!(body["reply"], json!("deepseek says hi"));
    assert_eq!(gw.deepseek_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_explicit_provider_overrides_heuristic() {
    let gw = default_gateway();

    // Coding vocabulary would route to deepseek, but explicit choice wins
    let (status, body) = post_chat(
        gw.app,
        json!({"message": "debug this python function", "provider": "gemini"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["provider"], json!("gemini"));
    assert_eq!(gw.gemini_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gw.deepseek_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_reply_includes_model_when_known() {
    let gw = default_gateway();

    let (_, body) = post_chat(gw.app, json!({"message": "hello there"})).await;

    assert_eq!(body["model"], json!("stub-model"));
}

// ============================================================================
// Chat: validation
// ============================================================================

#[tokio::test]
async fn chat_empty_message_is_rejected_without_dispatch() {
    let gw = default_gateway();

    let (status, body) = post_chat(gw.app, json!({"message": ""})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].is_string());
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gw.deepseek_calls.load(Ordering::SeqCst), 0);
    assert_eq!(gw.gemini_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_whitespace_message_is_rejected() {
    let gw = default_gateway();

    let (status, body) = post_chat(gw.app, json!({"message": "   \t  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_missing_message_field_is_rejected() {
    let gw = default_gateway();

    let (status, body) = post_chat(gw.app, json!({"provider": "chatgpt"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_non_string_message_is_rejected() {
    let gw = default_gateway();

    let (status, body) = post_chat(gw.app, json!({"message": 42})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn chat_unknown_provider_value_is_rejected() {
    let gw = default_gateway();

    let (status, body) =
        post_chat(gw.app, json!({"message": "hello", "provider": "claude"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_malformed_json_body_is_rejected() {
    let gw = default_gateway();

    let response = gw
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Method guard and CORS preflight
// ============================================================================

#[tokio::test]
async fn chat_rejects_get_with_405() {
    let gw = default_gateway();

    let response = gw
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/chat")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn chat_preflight_returns_200_with_cors_headers() {
    let gw = default_gateway();

    let response = gw
        .app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/chat")
                .header("origin", "https://example.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap()),
        Some("*")
    );
    let allow_methods = response
        .headers()
        .get("access-control-allow-methods")
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    assert!(allow_methods.contains("POST"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.is_empty(), "preflight body should be empty");
    assert_eq!(gw.chatgpt_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn responses_carry_api_version_header() {
    let gw = default_gateway();

    let response = gw
        .app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-api-version"));
}

// ============================================================================
// Chat: provider failures
// ============================================================================

#[tokio::test]
async fn chat_missing_credential_reports_configuration_error() {
    let gw = build_gateway(
        StubMode::MissingKey("OPENAI_API_KEY"),
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        test_config(false),
    );

    let (status, body) = post_chat(gw.app, json!({"message": "hello there"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], json!(false));
    let text = body.to_string();
    assert!(!text.contains("test-openai-key"), "secret must never be echoed");
    assert!(body["error"].as_str().unwrap().contains("chatgpt"));
}

#[tokio::test]
async fn chat_rate_limited_maps_to_429() {
    let gw = build_gateway(
        StubMode::RateLimited,
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        test_config(false),
    );

    let (status, body) = post_chat(gw.app, json!({"message": "hello there"})).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn chat_upstream_failure_maps_to_502_and_is_sanitized() {
    let gw = build_gateway(
        StubMode::Upstream,
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        test_config(false),
    );

    let (status, body) = post_chat(gw.app, json!({"message": "hello there"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], json!(false));
    assert!(body.get("detail").is_none(), "production hides upstream detail");
    assert!(!body["error"].as_str().unwrap().contains("exploded"));
}

#[tokio::test]
async fn chat_upstream_failure_includes_detail_in_development() {
    let gw = build_gateway(
        StubMode::Upstream,
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        test_config(true),
    );

    let (status, body) = post_chat(gw.app, json!({"message": "hello there"})).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("upstream exploded"));
}

// ============================================================================
// Status endpoint
// ============================================================================

async fn get_status(app: axum::Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn status_reports_all_configured() {
    let gw = default_gateway();

    let (status, body) = get_status(gw.app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["services"]["chatgpt"], json!(true));
    assert_eq!(body["services"]["deepseek"], json!(true));
    assert_eq!(body["services"]["gemini"], json!(true));
    assert_eq!(body["available"], json!(true));
}

#[tokio::test]
async fn status_reflects_missing_credentials() {
    let mut config = test_config(false);
    config.deepseek_api_key = None;
    let gw = build_gateway(
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        StubMode::Reply("unused"),
        config,
    );

    let (status, body) = get_status(gw.app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["services"]["chatgpt"], json!(true));
    assert_eq!(body["services"]["deepseek"], json!(false));
    assert_eq!(body["available"], json!(false));
    // Presence only; never the value
    assert!(!body.to_string().contains("test-openai-key"));
}

#[tokio::test]
async fn status_rejects_post_with_405() {
    let gw = default_gateway();

    let response = gw
        .app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/status")
                .header("content-type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
