// src/llm/provider/mod.rs
// LLM provider trait and shared types for multi-provider support

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod deepseek;
pub mod gemini;
pub mod openai;

pub use deepseek::DeepSeekProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// The three upstream chat services the gateway can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    ChatGpt,
    DeepSeek,
    Gemini,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::ChatGpt => "chatgpt",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage reported by the upstream service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageInfo {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Normalized reply from any provider
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    pub model: Option<String>,
    pub usage: Option<UsageInfo>,
}

/// Failure kinds surfaced to the request pipeline.
/// `Upstream.detail` may carry the raw upstream body; callers must only
/// expose it under the development flag.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is not configured (missing {credential})")]
    Configuration {
        provider: &'static str,
        credential: &'static str,
    },

    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: &'static str },

    #[error("{provider} request failed{}: {detail}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        provider: &'static str,
        status: Option<u16>,
        detail: String,
    },
}

/// Universal provider interface. Adapters own the provider-specific wire
/// formats: the pipeline never branches on provider internals.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging/debugging
    fn name(&self) -> &'static str;

    /// Single-turn chat completion
    async fn chat(&self, message: &str) -> Result<ProviderReply, ProviderError>;
}
