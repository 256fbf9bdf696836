// src/llm/router.rs
// LLM router providing unified access to the three provider adapters

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use crate::config::GatewayConfig;

use super::provider::{
    DeepSeekProvider, GeminiProvider, LlmProvider, OpenAiProvider, ProviderError, ProviderId,
    ProviderReply,
};

pub struct LlmRouter {
    chatgpt: Arc<dyn LlmProvider>,
    deepseek: Arc<dyn LlmProvider>,
    gemini: Arc<dyn LlmProvider>,
}

impl LlmRouter {
    pub fn new(
        chatgpt: Arc<dyn LlmProvider>,
        deepseek: Arc<dyn LlmProvider>,
        gemini: Arc<dyn LlmProvider>,
    ) -> Self {
        Self {
            chatgpt,
            deepseek,
            gemini,
        }
    }

    /// Build the real adapters over one shared HTTP client with the
    /// configured upstream timeout.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout))
            .build()?;

        Ok(Self::new(
            Arc::new(OpenAiProvider::new(
                client.clone(),
                config.openai_api_key.clone(),
                config.openai_base_url.clone(),
                config.openai_model.clone(),
            )),
            Arc::new(DeepSeekProvider::new(
                client.clone(),
                config.deepseek_api_key.clone(),
                config.deepseek_base_url.clone(),
                config.deepseek_model.clone(),
            )),
            Arc::new(GeminiProvider::new(
                client,
                config.gemini_api_key.clone(),
                config.gemini_base_url.clone(),
                config.gemini_model.clone(),
            )),
        ))
    }

    pub fn provider(&self, id: ProviderId) -> &Arc<dyn LlmProvider> {
        match id {
            ProviderId::ChatGpt => &self.chatgpt,
            ProviderId::DeepSeek => &self.deepseek,
            ProviderId::Gemini => &self.gemini,
        }
    }

    /// Dispatch a message to the selected provider. One call, one outcome:
    /// no retries, no fallback to another provider.
    pub async fn invoke(
        &self,
        id: ProviderId,
        message: &str,
    ) -> Result<ProviderReply, ProviderError> {
        self.provider(id).chat(message).await
    }
}
