// src/llm/provider/gemini.rs
// Gemini (generateContent API) provider implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{LlmProvider, ProviderError, ProviderReply, UsageInfo};

const PROVIDER_NAME: &str = "gemini";
const CREDENTIAL_VAR: &str = "GEMINI_API_KEY";

const SYSTEM_PROMPT: &str = "You are Gemini, a multimodal AI assistant specialized in \
    visual understanding, creative tasks, and comprehensive explanations. Provide \
    detailed, engaging, and helpful responses.";

// Fixed request parameters; never user-controlled
const MAX_OUTPUT_TOKENS: u32 = 1500;
const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.8;
const TOP_K: u32 = 40;

pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl GeminiProvider {
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
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiTextPart<'a>>,
}

#[derive(Serialize)]
struct GeminiTextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiSystemPart>,
}

#[derive(Serialize)]
struct GeminiSystemPart {
    text: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsageMetadata>,
    error: Option<GeminiApiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct GeminiApiError {
    message: String,
    status: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn chat(&self, message: &str) -> Result<ProviderReply, ProviderError> {
        let api_key = self.api_key.as_deref().ok_or(ProviderError::Configuration {
            provider: PROVIDER_NAME,
            credential: CREDENTIAL_VAR,
        })?;

        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiTextPart { text: message }],
            }],
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiSystemPart {
                    text: SYSTEM_PROMPT,
                }],
            },
            generation_config: GeminiGenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
            },
        };

        debug!("Gemini request: model={} message_len={}", self.model, message.len());

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                // the key travels in the query string; strip URLs from client errors
                detail: e.without_url().to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Gemini rate limited");
            return Err(ProviderError::RateLimited {
                provider: PROVIDER_NAME,
            });
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("Gemini API error {}", status);
            return Err(ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: Some(status.as_u16()),
                detail,
            });
        }

        let parsed: GeminiResponse =
            response.json().await.map_err(|e| ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: e.without_url().to_string(),
            })?;

        if let Some(error) = parsed.error {
            if error.status.as_deref() == Some("RESOURCE_EXHAUSTED") {
                return Err(ProviderError::RateLimited {
                    provider: PROVIDER_NAME,
                });
            }
            return Err(ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: error.message,
            });
        }

        let mut text = String::new();
        if let Some(candidates) = parsed.candidates {
            if let Some(candidate) = candidates.into_iter().next() {
                for part in candidate.content.parts {
                    if let Some(t) = part.text {
                        text.push_str(&t);
                    }
                }
            }
        }

        if text.is_empty() {
            return Err(ProviderError::Upstream {
                provider: PROVIDER_NAME,
                status: None,
                detail: "no content in Gemini response".to_string(),
            });
        }

        let usage = parsed.usage_metadata.map(|u| UsageInfo {
            prompt_tokens: u.prompt_token_count.unwrap_or(0),
            completion_tokens: u.candidates_token_count.unwrap_or(0),
            total_tokens: u.total_token_count.unwrap_or(0),
        });

        Ok(ProviderReply {
            text,
            model: Some(self.model.clone()),
            usage,
        })
    }
}
