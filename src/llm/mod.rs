// src/llm/mod.rs
// LLM module exports and submodule declarations

pub mod provider;
pub mod router;
pub mod selection;

pub use provider::{LlmProvider, ProviderError, ProviderId, ProviderReply, UsageInfo};
pub use router::LlmRouter;
pub use selection::{select_provider, ProviderChoice};
