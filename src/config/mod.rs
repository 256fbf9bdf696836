// src/config/mod.rs
// Gateway configuration, loaded once at startup and injected via AppState

use std::str::FromStr;

/// Process-wide configuration. Constructed once in `main` and passed down
/// explicitly; business logic never reads the environment ad hoc.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    // ── Server
    pub host: String,
    pub port: u16,

    // ── Behavior
    pub development: bool,
    pub log_level: String,
    pub upstream_timeout: u64,

    // ── Provider credentials (presence only is ever reported; values are
    // never logged or echoed)
    pub openai_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    pub gemini_api_key: Option<String>,

    // ── Provider endpoints and models
    pub openai_base_url: String,
    pub deepseek_base_url: String,
    pub gemini_base_url: String,
    pub openai_model: String,
    pub deepseek_model: String,
    pub gemini_model: String,
}

/// Strip inline comments and whitespace before parsing, so values like
/// `8080 # local port` work.
fn clean_value(raw: &str) -> &str {
    raw.split('#').next().unwrap_or("").trim()
}

fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => match clean_value(&val).parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                eprintln!("Config: {} has an unparseable value, using default", key);
                default
            }
        },
        Err(_) => default,
    }
}

/// Optional secret: present only if set and non-empty. Never logged.
fn env_var_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        // Load from .env file first if it exists
        let _ = dotenvy::dotenv();

        Self {
            host: env_var_or("POLYCHAT_HOST", "0.0.0.0".to_string()),
            port: env_var_or("POLYCHAT_PORT", 8080),
            development: env_var_or("POLYCHAT_ENV", "production".to_string()) == "development",
            log_level: env_var_or("POLYCHAT_LOG_LEVEL", "info".to_string()),
            upstream_timeout: env_var_or("POLYCHAT_UPSTREAM_TIMEOUT", 30),
            openai_api_key: env_var_opt("OPENAI_API_KEY"),
            deepseek_api_key: env_var_opt("DEEPSEEK_API_KEY"),
            gemini_api_key: env_var_opt("GEMINI_API_KEY"),
            openai_base_url: env_var_or("OPENAI_BASE_URL", "https://api.openai.com".to_string()),
            deepseek_base_url: env_var_or(
                "DEEPSEEK_BASE_URL",
                "https://api.deepseek.com".to_string(),
            ),
            gemini_base_url: env_var_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com".to_string(),
            ),
            openai_model: env_var_or("POLYCHAT_OPENAI_MODEL", "gpt-4o-mini".to_string()),
            deepseek_model: env_var_or("POLYCHAT_DEEPSEEK_MODEL", "deepseek-chat".to_string()),
            gemini_model: env_var_or("POLYCHAT_GEMINI_MODEL", "gemini-pro".to_string()),
        }
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Credential presence per provider, in (chatgpt, deepseek, gemini) order
    pub fn credential_presence(&self) -> (bool, bool, bool) {
        (
            self.openai_api_key.is_some(),
            self.deepseek_api_key.is_some(),
            self.gemini_api_key.is_some(),
        )
    }
}
