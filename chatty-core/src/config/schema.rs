//! Configuration values
//!
//! [`ClientConfig`] is what a [`crate::ChatQuery`] is built from. It is always
//! passed in explicitly; resolving it from the environment or from a file
//! happens here, before a client exists.

use super::secrets::SecretString;
use crate::error::{ChatError, ChatResult};
use crate::protocol::ChatOptions;
use crate::providers::{ProviderKind, BASE_URL_ENV, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

/// Default user agent
pub const USER_AGENT: &str = concat!("chatty/", env!("CARGO_PKG_VERSION"));

/// Endpoint and credential for one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL without trailing slash, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: SecretString,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<SecretString>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolve base URL and API key from the process environment.
    pub fn from_env() -> ChatResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve base URL and API key through `lookup`.
    ///
    /// The base URL comes from `OPENAI_API_BASE` (falling back to OpenAI);
    /// the key variable depends on which provider that URL points at.
    pub fn from_lookup<F>(lookup: F) -> ChatResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_key = api_key_for(&base_url, &lookup)?;
        Ok(Self::new(base_url, api_key))
    }

    pub fn provider(&self) -> ProviderKind {
        ProviderKind::detect(&self.base_url)
    }

    /// Full URL of the chat-completions endpoint
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn api_key_for<F>(base_url: &str, lookup: &F) -> ChatResult<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let var = ProviderKind::detect(base_url).api_key_env();
    lookup(var)
        .filter(|v| !v.is_empty())
        .map(SecretString::new)
        .ok_or_else(|| ChatError::Authentication(format!("{} is not set", var)))
}

/// On-disk configuration. Every field is optional; whatever is missing is
/// resolved from the environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChattyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<SecretString>,

    /// Model used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl ChattyConfig {
    pub fn options(&self) -> ChatOptions {
        ChatOptions {
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }

    /// Build a client config, preferring file values over the environment.
    pub fn resolve(&self) -> ChatResult<ClientConfig> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    pub fn resolve_with<F>(&self, lookup: F) -> ChatResult<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => lookup(BASE_URL_ENV)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };
        let api_key = match &self.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => api_key_for(&base_url, &lookup)?,
        };
        Ok(ClientConfig::new(base_url, api_key))
    }
}
