//! Protocol module for chat-completion request/response structures

pub mod types;

pub use types::{
    ChatOptions, ChatRequest, ChatResponse, CompletionChoice, CompletionMessage,
    CompletionResponse, Message, Role,
};
