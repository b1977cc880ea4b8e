//! Error taxonomy for chat queries

use thiserror::Error;

/// Everything that can go wrong during a single chat round trip.
///
/// None of these are recovered locally; they surface to the caller as-is.
#[derive(Debug, Error)]
pub enum ChatError {
    /// A precondition failed before any network call was made
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced an HTTP response
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Credential missing locally or rejected by the provider
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider answered with a non-success status
    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    /// The reply could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Flat discriminant used by the FFI and language bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    Transport,
    Authentication,
    Provider,
    MalformedResponse,
}

impl ChatError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Authentication(_) => ErrorKind::Authentication,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
        }
    }

    pub(crate) fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::Transport => "TransportError",
            Self::Authentication => "AuthenticationError",
            Self::Provider => "ProviderError",
            Self::MalformedResponse => "MalformedResponseError",
        }
    }
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;
