//! Node.js bindings for chatty
//!
//! ```js
//! const { ask } = require("chatty");
//! console.log(await ask("gpt-4o", "What is the C++ FQA?"));
//! ```

use chatty_core::{check_input, ChatError, ChatQuery, ChattyConfig, ErrorKind, SecretString};
use napi::bindgen_prelude::*;
use napi_derive::napi;

/// Optional overrides for a single `ask`
#[napi(object)]
#[derive(Debug, Default)]
pub struct AskOptions {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

impl From<AskOptions> for ChattyConfig {
    fn from(options: AskOptions) -> Self {
        ChattyConfig {
            base_url: options.base_url,
            api_key: options.api_key.map(SecretString::new),
            model: None,
            temperature: options.temperature,
            top_p: options.top_p,
        }
    }
}

/// Rejections carry the error kind as a prefix, e.g. `AuthenticationError: ...`
fn to_napi_err(err: ChatError) -> napi::Error {
    let status = match err.kind() {
        ErrorKind::InvalidInput => napi::Status::InvalidArg,
        _ => napi::Status::GenericFailure,
    };
    napi::Error::new(status, format!("{}: {}", err.kind().as_str(), err))
}

/// Ask `model` a single question; resolves to the answer text.
#[napi]
pub async fn ask(model: String, prompt: String, options: Option<AskOptions>) -> Result<String> {
    check_input(&model, &prompt).map_err(to_napi_err)?;

    let overrides = ChattyConfig::from(options.unwrap_or_default());
    let config = overrides.resolve().map_err(to_napi_err)?;
    let query = ChatQuery::new(config)
        .map_err(to_napi_err)?
        .with_options(overrides.options());

    query.ask(&model, &prompt).await.map_err(to_napi_err)
}

/// Returns the version of the chatty library.
#[napi]
pub fn version() -> String {
    chatty_core::version().to_string()
}
