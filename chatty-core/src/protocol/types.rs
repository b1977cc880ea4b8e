//! Core protocol types for chat completions
//!
//! The request side mirrors what OpenAI-compatible providers accept. The
//! response side is split in two: the wire shape (`CompletionResponse`) that
//! is decoded strictly from the provider's JSON, and the reduced
//! `ChatResponse` handed back to callers.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions that guide the model's behavior
    System,
    /// User input message
    User,
    /// Assistant (model) response
    Assistant,
    /// Tool output; only ever seen in replies
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged chunk of text. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}

/// Optional sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChatOptions {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// Nucleus sampling parameter (0.0 to 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

impl ChatOptions {
    pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;
    pub const TOP_P_RANGE: std::ops::RangeInclusive<f64> = 0.0..=1.0;

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Returns a description of the first out-of-range value, if any.
    pub fn check(&self) -> Result<(), String> {
        if let Some(t) = self.temperature {
            if !Self::TEMPERATURE_RANGE.contains(&t) {
                return Err(format!("temperature {} is outside 0.0..=2.0", t));
            }
        }
        if let Some(p) = self.top_p {
            if !Self::TOP_P_RANGE.contains(&p) {
                return Err(format!("top_p {} is outside 0.0..=1.0", p));
            }
        }
        Ok(())
    }
}

/// Chat completion request as sent on the wire
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model identifier to use
    pub model: String,

    /// Messages in conversation order
    pub messages: Vec<Message>,

    #[serde(flatten)]
    pub options: ChatOptions,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: ChatOptions::default(),
        }
    }

    /// A request carrying one user message.
    pub fn single(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model, vec![Message::user(prompt)])
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }
}

/// The provider's reply, reduced to the first choice's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub role: Role,
    pub content: String,
}

impl ChatResponse {
    pub fn into_text(self) -> String {
        self.content
    }
}

/// Wire shape of a chat completion reply. Only the fields read are declared;
/// all but the message role are required.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    /// Some compatible servers omit the role on replies
    #[serde(default = "assistant_role")]
    pub role: Role,
    pub content: String,
}

fn assistant_role() -> Role {
    Role::Assistant
}

impl CompletionResponse {
    /// Take the top choice, or `None` when the provider sent no choices.
    pub fn into_chat_response(self) -> Option<ChatResponse> {
        self.choices.into_iter().next().map(|choice| ChatResponse {
            role: choice.message.role,
            content: choice.message.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let request = ChatRequest::single("gpt-4o", "hello");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn test_options_are_flattened_when_set() {
        let request = ChatRequest::single("gpt-4o", "hello")
            .with_options(ChatOptions::default().with_temperature(0.5).with_top_p(0.9));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["temperature"], json!(0.5));
        assert_eq!(value["top_p"], json!(0.9));
        assert!(value.get("stream").is_none());
    }

    #[test]
    fn test_message_order_is_preserved() {
        let request = ChatRequest::new(
            "gpt-4o",
            vec![
                Message::system("be brief"),
                Message::user("hi"),
                Message::assistant("hello"),
                Message::user("what is the C++ FQA?"),
            ],
        );
        let value = serde_json::to_value(&request).unwrap();
        let roles: Vec<_> = value["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["system", "user", "assistant", "user"]);
    }

    #[test]
    fn test_completion_response_ignores_extra_fields() {
        let body = json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "X"},
                "finish_reason": "stop"
            }],
            "usage": {"total_tokens": 3}
        });
        let parsed: CompletionResponse = serde_json::from_value(body).unwrap();
        let response = parsed.into_chat_response().unwrap();
        assert_eq!(response.role, Role::Assistant);
        assert_eq!(response.content, "X");
    }

    #[test]
    fn test_completion_response_rejects_null_content() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
    }

    #[test]
    fn test_completion_response_rejects_unknown_role() {
        let body = json!({"choices": [{"message": {"role": "robot", "content": "X"}}]});
        assert!(serde_json::from_value::<CompletionResponse>(body).is_err());
    }

    #[test]
    fn test_missing_role_defaults_to_assistant() {
        let body = json!({"choices": [{"message": {"content": "X"}}]});
        let parsed: CompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.into_chat_response().unwrap().role, Role::Assistant);
    }

    #[test]
    fn test_empty_choices_yield_none() {
        let parsed: CompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(parsed.into_chat_response().is_none());
    }

    #[test]
    fn test_option_ranges() {
        assert!(ChatOptions::default().check().is_ok());
        assert!(ChatOptions::default().with_temperature(2.0).check().is_ok());
        assert!(ChatOptions::default().with_temperature(2.1).check().is_err());
        assert!(ChatOptions::default().with_top_p(-0.1).check().is_err());
        assert!(ChatOptions::default().with_temperature(f64::NAN).check().is_err());
    }
}
