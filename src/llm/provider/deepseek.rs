// src/llm/provider/deepseek.rs
// DeepSeek Chat API provider implementation (OpenAI-compatible)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{LlmProvider, ProviderError, ProviderReply, UsageInfo};

const PROVIDER_NAME: &str = "deepseek";
const CREDENTIAL_VAR: &str = "DEEPSEEK_API_KEY";

const SYSTEM_PROMPT: &str = "You are DeepSeek, a coding and technical AI assistant. \
    Focus on providing accurate, efficient, and practical solutions for programming, \
    math, and technical problems.";

// Fixed request parameters; never user-controlled
const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

pub struct DeepSeekProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl DeepSeekProvider {
    pub fn new(client: Client, api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
            model,
        }
    }
}

#[async_trait]
impl LlmProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn chat(&self, message: &str) -> Result<ProviderReply, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Configuration {
            provider: PROVIDER_NAME,
            credential: CREDENTIAL_VAR,
        })?;

        let body = json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": SYSTEM_PROMPT
                },
                {
                    "role": "user",
                    "content": message
                }
            ],
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "top_p": 1,
            "frequency_penalty": 0,
            "presence_penalty": 0
        });

        debug!("DeepSeek request: model={} message_len={}", self.model, message.len());

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
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
            warn!("DeepSeek rate limited");
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_NAME,
            });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("DeepSeek API error {}", status);
            return Err(ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: Some(status.as_u16()),
                detail,
            });
        }

        let raw: Value = response.json().await.map_err(|e| ProviderError::Upstream {
            provider: PROVIDER_NAME,
            status: None,
            detail: e.to_string(),
        })?;

        // Extract content (OpenAI format)
        let text = raw["choices"][0]["message"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: "no content in DeepSeek response".to_string(),
            })?
            .to_string();

        let model = raw["model"].as_str().map(String::from).or_else(|| Some(self.model.clone()));
        let usage = serde_json::from_value::<UsageInfo>(raw["usage"].clone()).ok();

        Ok(ProviderReply { text, model, usage })
    }
}
