//! Chatty Core Library
//!
//! A minimal chat-completion client: one prompt goes out to an
//! OpenAI-compatible provider, one answer comes back.
//!
//! ```no_run
//! use chatty_core::{ask, ClientConfig};
//!
//! let config = ClientConfig::from_env()?;
//! println!("{}", ask(&config, "gpt-4o", "What is the C++ FQA?")?);
//! # Ok::<(), chatty_core::ChatError>(())
//! ```

pub mod config;
pub mod error;
pub mod ffi;
pub mod http;
pub mod protocol;
pub mod providers;
pub mod query;

pub use config::{ChattyConfig, ClientConfig, SecretString};
pub use error::{ChatError, ChatResult, ErrorKind};
pub use protocol::{ChatOptions, ChatRequest, ChatResponse, Message, Role};
pub use providers::ProviderKind;
pub use query::{ask, check_input, check_request, ChatQuery};

/// Model used when none is given
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Returns the version of the Chatty Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
