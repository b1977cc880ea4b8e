//! Single-turn chat queries

use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult};
use crate::http::{ChatExecutor, HttpClient};
use crate::protocol::{ChatOptions, ChatRequest, ChatResponse};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// One request/response round trip against a configured provider.
///
/// Holds no per-call state; a single `ChatQuery` can serve any number of
/// independent calls.
#[derive(Clone)]
pub struct ChatQuery {
    config: ClientConfig,
    executor: Arc<dyn ChatExecutor>,
    options: ChatOptions,
}

impl std::fmt::Debug for ChatQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatQuery")
            .field("config", &self.config)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ChatQuery {
    /// Create a query backed by a fresh [`HttpClient`].
    pub fn new(config: ClientConfig) -> ChatResult<Self> {
        Ok(Self::with_executor(config, Arc::new(HttpClient::new()?)))
    }

    pub fn with_executor(config: ClientConfig, executor: Arc<dyn ChatExecutor>) -> Self {
        Self {
            config,
            executor,
            options: ChatOptions::default(),
        }
    }

    /// Sampling options applied to every [`ask`](Self::ask)
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `prompt` as a single user message and return the reply text
    /// verbatim.
    pub async fn ask(&self, model: &str, prompt: &str) -> ChatResult<String> {
        check_input(model, prompt)?;

        let request = ChatRequest::single(model, prompt).with_options(self.options);
        self.chat(request).await.map(ChatResponse::into_text)
    }

    /// Send a caller-built request.
    pub async fn chat(&self, request: ChatRequest) -> ChatResult<ChatResponse> {
        check_request(&request)?;
        debug!(
            "Chat query against {:?} with model {}",
            self.config.provider(),
            request.model
        );
        self.executor.execute(&self.config, &request).await
    }

    /// Blocking form of [`ask`](Self::ask).
    ///
    /// Runs the request on a private current-thread runtime. Called from
    /// inside a tokio runtime, that private runtime lives on a scoped worker
    /// thread and the calling thread blocks until it finishes.
    pub fn ask_blocking(&self, model: &str, prompt: &str) -> ChatResult<String> {
        block_on(self.ask(model, prompt))
    }

    /// Blocking form of [`chat`](Self::chat).
    pub fn chat_blocking(&self, request: ChatRequest) -> ChatResult<ChatResponse> {
        block_on(self.chat(request))
    }
}

/// Preconditions of [`ChatQuery::ask`], checked without touching the
/// network or the environment.
pub fn check_input(model: &str, prompt: &str) -> ChatResult<()> {
    check_model(model)?;
    if prompt.is_empty() {
        return Err(ChatError::InvalidInput("prompt must not be empty".to_string()));
    }
    Ok(())
}

/// Preconditions of [`ChatQuery::chat`].
pub fn check_request(request: &ChatRequest) -> ChatResult<()> {
    check_model(&request.model)?;
    if request.messages.is_empty() {
        return Err(ChatError::InvalidInput(
            "request must contain at least one message".to_string(),
        ));
    }
    request.options.check().map_err(ChatError::InvalidInput)
}

fn check_model(model: &str) -> ChatResult<()> {
    if model.trim().is_empty() {
        return Err(ChatError::InvalidInput("model must not be empty".to_string()));
    }
    Ok(())
}

fn block_on<T, F>(future: F) -> ChatResult<T>
where
    T: Send,
    F: Future<Output = ChatResult<T>> + Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return run_private(future);
    }

    // A runtime cannot be entered from one of its own threads
    std::thread::scope(|scope| {
        scope
            .spawn(move || run_private(future))
            .join()
            .unwrap_or_else(|_| {
                Err(ChatError::Transport {
                    message: "Blocking worker thread panicked".to_string(),
                    source: None,
                })
            })
    })
}

fn run_private<T, F>(future: F) -> ChatResult<T>
where
    F: Future<Output = ChatResult<T>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ChatError::Transport {
            message: format!("Failed to start runtime: {}", e),
            source: None,
        })?;
    runtime.block_on(future)
}

/// Ask `model` a single question and block until the answer arrives.
pub fn ask(config: &ClientConfig, model: &str, prompt: &str) -> ChatResult<String> {
    ChatQuery::new(config.clone())?.ask_blocking(model, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Message, Role};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Records every request and answers with a fixed reply.
    #[derive(Default)]
    struct RecordingExecutor {
        requests: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatExecutor for RecordingExecutor {
        async fn execute(
            &self,
            _config: &ClientConfig,
            request: &ChatRequest,
        ) -> ChatResult<ChatResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(ChatResponse {
                role: Role::Assistant,
                content: "stubbed".to_string(),
            })
        }
    }

    fn query() -> (ChatQuery, Arc<RecordingExecutor>) {
        let executor = Arc::new(RecordingExecutor::default());
        let config = ClientConfig::new("http://localhost/v1", "sk-test");
        (ChatQuery::with_executor(config, executor.clone()), executor)
    }

    #[tokio::test]
    async fn test_ask_sends_single_user_message() {
        let (query, executor) = query();
        let answer = query.ask("gpt-4o", "What is the C++ FQA?").await.unwrap();
        assert_eq!(answer, "stubbed");

        let requests = executor.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-4o");
        assert_eq!(requests[0].messages, vec![Message::user("What is the C++ FQA?")]);
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_network() {
        let (query, executor) = query();
        let err = query.ask("gpt-4o", "").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        assert!(executor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_model_rejected_before_network() {
        let (query, executor) = query();
        let err = query.ask("", "hello").await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        assert!(executor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message_list() {
        let (query, executor) = query();
        let err = query
            .chat(ChatRequest::new("gpt-4o", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidInput(_)));
        assert!(executor.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_options_are_forwarded() {
        let (query, executor) = query();
        let query = query.with_options(ChatOptions::default().with_temperature(0.3));
        query.ask("gpt-4o", "hi").await.unwrap();
        let requests = executor.requests.lock().unwrap();
        assert_eq!(requests[0].options.temperature, Some(0.3));
        assert_eq!(requests[0].options.top_p, None);
    }

    #[test]
    fn test_ask_blocking_outside_runtime() {
        let (query, executor) = query();
        assert_eq!(query.ask_blocking("gpt-4o", "hi").unwrap(), "stubbed");
        assert_eq!(executor.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ask_blocking_inside_runtime() {
        let (query, executor) = query();
        assert_eq!(query.ask_blocking("gpt-4o", "hi").unwrap(), "stubbed");
        assert_eq!(executor.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_chat_blocking_inside_multi_thread_runtime() {
        let (query, executor) = query();
        let response = query
            .chat_blocking(ChatRequest::single("gpt-4o", "hi"))
            .unwrap();
        assert_eq!(response.content, "stubbed");
        assert_eq!(executor.requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_check_input() {
        assert!(check_input("gpt-4o", "hi").is_ok());
        assert!(check_input("gpt-4o", " ").is_ok());
        assert!(matches!(check_input("gpt-4o", ""), Err(ChatError::InvalidInput(_))));
        assert!(matches!(check_input("  ", "hi"), Err(ChatError::InvalidInput(_))));
    }

    #[test]
    fn test_check_request_rejects_out_of_range_top_p() {
        let request = ChatRequest::single("gpt-4o", "hi")
            .with_options(ChatOptions::default().with_top_p(1.5));
        assert!(matches!(check_request(&request), Err(ChatError::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn prop_out_of_range_temperature_never_reaches_executor(t in 2.0001f64..100.0) {
            let (query, executor) = query();
            let query = query.with_options(ChatOptions::default().with_temperature(t));
            let result = query.ask_blocking("gpt-4o", "hi");
            prop_assert!(matches!(result, Err(ChatError::InvalidInput(_))));
            prop_assert!(executor.requests.lock().unwrap().is_empty());
        }

        #[test]
        fn prop_non_empty_prompt_is_sent_verbatim(prompt in ".{1,64}") {
            let (query, executor) = query();
            let answer = query.ask_blocking("gpt-4o", &prompt);
            prop_assert_eq!(answer.unwrap(), "stubbed");
            let requests = executor.requests.lock().unwrap();
            prop_assert_eq!(requests[0].messages[0].content(), prompt.as_str());
        }
    }
}
