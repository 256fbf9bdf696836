// src/llm/provider/openai.rs
// ChatGPT (OpenAI Chat Completions) provider implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{LlmProvider, ProviderError, ProviderReply, UsageInfo};

const PROVIDER_NAME: &str = "chatgpt";
const CREDENTIAL_VAR: &str = "OPENAI_API_KEY";

const SYSTEM_PROMPT: &str = "You are ChatGPT, a helpful general-purpose AI assistant. \
    Provide clear, well-structured answers for writing, translation, and everyday questions.";

// Fixed request parameters; never user-controlled
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

pub struct OpenAiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(client: Client, api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Option<Vec<ChatCompletionChoice>>,
    usage: Option<ChatCompletionUsage>,
}

#[derive(Deserialize)]
struct ChatCompletionChoice {
    message: ChatCompletionChoiceMessage,
}

#[derive(Deserialize)]
struct ChatCompletionChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatCompletionUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

// ============================================================================
// Provider Implementation
// ============================================================================

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn chat(&self, message: &str) -> Result<ProviderReply, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Configuration {
            provider: PROVIDER_NAME,
            credential: CREDENTIAL_VAR,
        })?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatCompletionMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatCompletionMessage {
                    role: "user",
                    content: message,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        debug!("ChatGPT request: model={} message_len={}", self.model, message.len());

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("ChatGPT rate limited");
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_NAME,
            });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("ChatGPT API error {}", status);
            return Err(ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: Some(status.as_u16()),
                detail,
            });
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: e.to_string(),
            })?;

        let text = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: "no content in ChatGPT response".to_string(),
            })?;

        Ok(ProviderReply {
            text,
            model: parsed.model.or_else(|| Some(self.model.clone())),
            usage: parsed.usage.map(|u| UsageInfo {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}
