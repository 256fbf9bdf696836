// src/state.rs

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::llm::LlmRouter;

/// Shared server state: read-only configuration plus the provider router.
/// Nothing here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub llm: Arc<LlmRouter>,
}

impl AppState {
    pub fn new(config: Arc<GatewayConfig>, llm: Arc<LlmRouter>) -> Self {
        Self { config, llm }
    }
}
