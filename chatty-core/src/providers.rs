//! OpenAI-compatible providers known by base URL
//!
//! All of them speak the same chat-completions dialect; they differ only in
//! where they live and which environment variable holds their API key.

use serde::{Deserialize, Serialize};

/// Default endpoint when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "OPENAI_API_BASE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Groq,
    Fireworks,
    Mistral,
    Hyperbolic,
    DeepSeek,
    Llama,
    Moonshot,
}

impl ProviderKind {
    const ALL: [ProviderKind; 8] = [
        ProviderKind::OpenAI,
        ProviderKind::Groq,
        ProviderKind::Fireworks,
        ProviderKind::Mistral,
        ProviderKind::Hyperbolic,
        ProviderKind::DeepSeek,
        ProviderKind::Llama,
        ProviderKind::Moonshot,
    ];

    /// Host prefix the provider is recognised by
    pub fn url_prefix(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "https://api.openai.com",
            ProviderKind::Groq => "https://api.groq.com",
            ProviderKind::Fireworks => "https://api.fireworks.ai",
            ProviderKind::Mistral => "https://api.mistral.ai",
            ProviderKind::Hyperbolic => "https://api.hyperbolic.xyz",
            ProviderKind::DeepSeek => "https://api.deepseek.com",
            ProviderKind::Llama => "https://api.llama.com",
            ProviderKind::Moonshot => "https://api.moonshot.ai",
        }
    }

    /// Environment variable holding the provider's API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::Fireworks => "FIREWORKS_API_KEY",
            ProviderKind::Mistral => "MISTRAL_API_KEY",
            ProviderKind::Hyperbolic => "HYPERBOLIC_API_KEY",
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderKind::Llama => "LLAMA_API_KEY",
            ProviderKind::Moonshot => "MOONSHOT_API_KEY",
        }
    }

    /// Identify the provider behind `base_url`.
    ///
    /// Unknown hosts (local servers, proxies) are treated as OpenAI.
    pub fn detect(base_url: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| base_url.starts_with(kind.url_prefix()))
            .unwrap_or(ProviderKind::OpenAI)
    }
}
