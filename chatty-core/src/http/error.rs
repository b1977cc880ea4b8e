//! HTTP error mapping utilities

use crate::error::ChatError;
use reqwest::StatusCode;
use serde_json::Value;

/// Map a non-success status code and response body to a [`ChatError`]
pub fn map_http_error(status: StatusCode, body: Option<String>) -> ChatError {
    let message = body
        .as_deref()
        .and_then(|b| serde_json::from_str::<Value>(b).ok())
        .and_then(|v| extract_error_message(&v))
        .or_else(|| body.filter(|b| !b.trim().is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()))
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChatError::Authentication(message),
        _ => ChatError::Provider {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a human-readable message out of an error body
fn extract_error_message(json: &Value) -> Option<String> {
    // OpenAI format: { "error": { "message": "...", "type": "...", "code": "..." } }
    if let Some(message) = json
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
    {
        return Some(message.to_string());
    }

    // Generic format: { "message": "..." }
    if let Some(message) = json.get("message").and_then(|v| v.as_str()) {
        return Some(message.to_string());
    }

    // { "error": "..." }
    json.get("error")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}
