// src/llm/selection.rs
// Keyword-based provider selection for auto mode

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::provider::ProviderId;

/// Provider choice as sent by the client. `auto` (the default) delegates to
/// the keyword heuristic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderChoice {
    Chatgpt,
    Deepseek,
    Gemini,
    #[default]
    Auto,
}

// Ordered keyword groups, first match wins. Coding and math checks run
// before visual and writing so that "write a function" classifies as a
// coding request.
static CODING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(code|coding|program|programming|function|debug|debugging|bug|error|exception|compile|script|algorithm|api|sql|database|regex|python|javascript|typescript|java|rust|html|css)\b",
    )
    .unwrap()
});

static MATH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(calculate|calculation|equation|algebra|geometry|calculus|math|maths|solve|integral|derivative)\b")
        .unwrap()
});

static VISUAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(image|picture|photo|draw|drawing|design|visual|logo|diagram|illustration)\b")
        .unwrap()
});

static WRITING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(write|essay|story|poem|blog|article|letter|email|translate|translation|summarize|summary)\b")
        .unwrap()
});

/// Map a request to exactly one provider. Explicit choice always wins; auto
/// mode scans the lowercased message against the ordered keyword groups.
/// Pure and deterministic: same input, same output.
pub fn select_provider(choice: ProviderChoice, message: &str) -> ProviderId {
    match choice {
        ProviderChoice::Chatgpt => ProviderId::ChatGpt,
        ProviderChoice::Deepseek => ProviderId::DeepSeek,
        ProviderChoice::Gemini => ProviderId::Gemini,
        ProviderChoice::Auto => classify(&message.to_lowercase()),
    }
}

fn classify(message: &str) -> ProviderId {
    if CODING_RE.is_match(message) || MATH_RE.is_match(message) {
        ProviderId::DeepSeek
    } else if VISUAL_RE.is_match(message) {
        ProviderId::Gemini
    } else if WRITING_RE.is_match(message) {
        ProviderId::ChatGpt
    } else {
        ProviderId::ChatGpt
    }
}
