//! HTTP layer for talking to chat-completion providers
//!
//! This module handles:
//! - Building and sending the request with the right headers
//! - Mapping HTTP failures onto [`ChatError`]
//! - Strict decoding of the reply
//! - Request ID generation for log correlation

pub mod client;
pub mod error;

pub use client::HttpClient;

use crate::config::ClientConfig;
use crate::error::ChatResult;
use crate::protocol::{ChatRequest, ChatResponse};
use async_trait::async_trait;

/// Sends one chat request and returns the decoded reply.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait ChatExecutor: Send + Sync {
    async fn execute(&self, config: &ClientConfig, request: &ChatRequest)
        -> ChatResult<ChatResponse>;
}
