//! HTTP client implementation using reqwest

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::http::{error::map_http_error, ChatExecutor};
use crate::protocol::{ChatRequest, ChatResponse, CompletionResponse};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// reqwest-backed [`ChatExecutor`]
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Create a new HTTP client with reqwest's default settings
    pub fn new() -> ChatResult<Self> {
        let client = ClientBuilder::new()
            .gzip(true)
            .build()
            .map_err(|e| ChatError::transport("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            timeout: None,
        })
    }

    /// Bound the whole request, connect through last body byte
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ChatExecutor for HttpClient {
    async fn execute(
        &self,
        config: &ClientConfig,
        request: &ChatRequest,
    ) -> ChatResult<ChatResponse> {
        let request_id = Uuid::new_v4();
        let url = config.chat_url();

        debug!(
            "Sending chat request to {} (model: {}, messages: {}) [request_id: {}]",
            url,
            request.model,
            request.messages.len(),
            request_id
        );

        let mut req_builder = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(
                AUTHORIZATION,
                format!("Bearer {}", config.api_key.expose_secret()),
            )
            .header(USER_AGENT, config.user_agent.as_str())
            .header("X-Request-ID", request_id.to_string())
            .json(request);

        if let Some(timeout) = self.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await.map_err(|e| {
            error!("Request to {} failed [request_id: {}]: {}", url, request_id, e);
            let message = if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_timeout() {
                format!("Request timed out: {}", e)
            } else {
                e.to_string()
            };
            ChatError::transport(message, e)
        })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();
            warn!(
                "Request failed with status {} [request_id: {}]",
                status, request_id
            );
            return Err(map_http_error(status, body));
        }

        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body [request_id: {}]: {}", request_id, e);
            ChatError::transport(format!("Failed to read response body: {}", e), e)
        })?;

        let completion: CompletionResponse = serde_json::from_slice(&body).map_err(|e| {
            error!("Failed to decode response [request_id: {}]: {}", request_id, e);
            ChatError::MalformedResponse(format!("Invalid response format: {}", e))
        })?;

        completion.into_chat_response().ok_or_else(|| {
            error!("Response carried no choices [request_id: {}]", request_id);
            ChatError::MalformedResponse("Response contains no choices".to_string())
        })
    }
}
