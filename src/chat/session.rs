//! Core chat session management.
//!
//! This module provides the [`ChatSession`] struct which owns the
//! conversation history and the request status, and drives one request per
//! [`ChatSession::send`].

use std::time::{Duration, Instant};

use crate::Renderer;
use crate::chat::config::ChatConfig;
use crate::client::{ChatBackend, ChatClient};
use crate::error::{Error, Result};
use crate::observability::{SESSION_EMPTY_SUBMISSIONS, SESSION_FAILED_TURNS, SESSION_TURNS};
use crate::types::{Message, MessageRole, RequestStatus};

/// Message shown when a failure carries no usable text of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Request failed";

/// A failed turn, as the session presents it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFailure {
    /// The failure carried a human-readable message.
    Transport(String),

    /// Nothing readable was available.
    Unknown,
}

impl ChatFailure {
    /// The text to show in the error row.
    pub fn message(&self) -> &str {
        match self {
            ChatFailure::Transport(message) => message,
            ChatFailure::Unknown => FALLBACK_ERROR_MESSAGE,
        }
    }
}

impl From<&Error> for ChatFailure {
    fn from(err: &Error) -> Self {
        let message = err.message().trim();
        if message.is_empty() {
            ChatFailure::Unknown
        } else {
            ChatFailure::Transport(message.to_string())
        }
    }
}

/// Holds the status in `Loading` and guarantees it leaves `Loading`.
///
/// If the turn is abandoned (its future dropped mid-request, or the backend
/// panics) the status falls back to an error instead of staying stuck.
struct LoadingGuard<'a> {
    status: &'a mut RequestStatus,
}

impl<'a> LoadingGuard<'a> {
    fn enter(status: &'a mut RequestStatus) -> Self {
        *status = RequestStatus::Loading;
        Self { status }
    }

    fn settle(self, next: RequestStatus) {
        *self.status = next;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.status.is_loading() {
            *self.status = RequestStatus::Error(FALLBACK_ERROR_MESSAGE.to_string());
        }
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// Messages written by the user.
    pub user_messages: usize,
    /// Messages written by the assistant.
    pub assistant_messages: usize,
    /// Total number of backend requests made.
    pub total_requests: u64,
    /// Requests that ended in the error state.
    pub failed_requests: u64,
    /// Wall time of the most recent request, if any.
    pub last_latency: Option<Duration>,
    /// The current request status.
    pub status: RequestStatus,
}

/// A chat session that manages conversation state and backend interactions.
///
/// History is append-only; [`ChatSession::reset`] is the only way to remove
/// messages.  `send` takes `&mut self`, so one session can never have two
/// requests in flight.
pub struct ChatSession<B: ChatBackend = ChatClient> {
    backend: B,
    messages: Vec<Message>,
    status: RequestStatus,
    request_count: u64,
    failed_count: u64,
    last_latency: Option<Duration>,
}

impl ChatSession<ChatClient> {
    /// Creates a session talking to the backend named by `config`.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        Ok(Self::new(ChatClient::new(config)?))
    }
}

impl<B: ChatBackend> ChatSession<B> {
    /// Creates a new, idle session with an empty history.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            status: RequestStatus::Idle,
            request_count: 0,
            failed_count: 0,
            last_latency: None,
        }
    }

    /// Sends a user message and waits for the answer.
    ///
    /// This method:
    /// 1. Ignores text that is empty after trimming
    /// 2. Clears any previous error
    /// 3. Adds the user message to history, before any network activity
    /// 4. Enters `Loading` and asks the backend
    /// 5. Adds the assistant answer and returns to `Idle`, or records the
    ///    failure as `Error(message)` without adding anything
    ///
    /// Failures never escape; the returned status is the outcome.
    pub async fn send(&mut self, text: &str, renderer: &mut dyn Renderer) -> &RequestStatus {
        if text.trim().is_empty() {
            SESSION_EMPTY_SUBMISSIONS.click();
            return &self.status;
        }
        SESSION_TURNS.click();

        let Self {
            backend,
            messages,
            status,
            request_count,
            failed_count,
            last_latency,
        } = self;

        *status = RequestStatus::Idle;
        messages.push(Message::user(text));

        let guard = LoadingGuard::enter(status);
        renderer.print_loading();

        *request_count += 1;
        let start = Instant::now();
        let result = backend.chat(text).await;
        *last_latency = Some(start.elapsed());
        renderer.clear_loading();

        match result {
            Ok(response) => {
                let message = Message::from(response);
                renderer.print_message(&message);
                messages.push(message);
                guard.settle(RequestStatus::Idle);
            }
            Err(err) => {
                SESSION_FAILED_TURNS.click();
                *failed_count += 1;
                let failure = ChatFailure::from(&err);
                renderer.print_error(failure.message());
                guard.settle(RequestStatus::Error(failure.message().to_string()));
            }
        }

        &self.status
    }

    /// Sends the most recent user message again.
    ///
    /// The retried text is appended as a new user message like any other
    /// send.  Does nothing when the history has no user message.
    pub async fn retry_last(&mut self, renderer: &mut dyn Renderer) -> &RequestStatus {
        let Some(text) = self.last_user_message().map(|m| m.content.clone()) else {
            return &self.status;
        };
        self.send(&text, renderer).await
    }

    /// Clears the conversation history and any error.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.status = RequestStatus::Idle;
    }

    /// The conversation history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// The current request status.
    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The most recent user message, if any.
    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let user_messages = self
            .messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();
        SessionStats {
            message_count: self.messages.len(),
            user_messages,
            assistant_messages: self.messages.len() - user_messages,
            total_requests: self.request_count,
            failed_requests: self.failed_count,
            last_latency: self.last_latency,
            status: self.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::NullRenderer;
    use crate::types::{ChatResponse, StructuredAnswer};

    /// Replays canned results and records the queries it was asked.
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<Result<ChatResponse>>>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn with(replies: Vec<Result<ChatResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(&self, query: &str) -> Result<ChatResponse> {
            self.queries.lock().unwrap().push(query.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::unknown("no scripted reply")))
        }
    }

    /// Never answers.
    struct SilentBackend;

    #[async_trait::async_trait]
    impl ChatBackend for SilentBackend {
        async fn chat(&self, _: &str) -> Result<ChatResponse> {
            std::future::pending().await
        }
    }

    struct PanickingBackend;

    #[async_trait::async_trait]
    impl ChatBackend for PanickingBackend {
        async fn chat(&self, _: &str) -> Result<ChatResponse> {
            panic!("backend exploded");
        }
    }

    /// Records the calls a session makes on its renderer.
    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn print_message(&mut self, message: &Message) {
            self.events.push(format!("message:{}", message.content));
        }

        fn print_loading(&mut self) {
            self.events.push("loading".to_string());
        }

        fn clear_loading(&mut self) {
            self.events.push("clear".to_string());
        }

        fn print_error(&mut self, error: &str) {
            self.events.push(format!("error:{error}"));
        }

        fn print_info(&mut self, info: &str) {
            self.events.push(format!("info:{info}"));
        }
    }

    fn hi_there() -> ChatResponse {
        ChatResponse {
            answer: "Hi there".to_string(),
            structured: None,
            sources: vec![],
            confidence: Some(0.9),
        }
    }

    #[test]
    fn new_session_empty() {
        let session = ChatSession::new(ScriptedBackend::default());
        assert_eq!(session.message_count(), 0);
        assert!(session.status().is_idle());
    }

    #[tokio::test]
    async fn hello_scenario() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![Ok(hi_there())]));
        let status = session.send("Hello", &mut NullRenderer).await.clone();
        assert_eq!(status, RequestStatus::Idle);

        let mut expected_reply = Message::assistant("Hi there");
        expected_reply.sources = Some(vec![]);
        expected_reply.confidence = Some(0.9);
        assert_eq!(
            session.messages(),
            &[Message::user("Hello"), expected_reply][..]
        );
        assert!(session.messages()[1].structured.is_none());
    }

    #[tokio::test]
    async fn broken_scenario() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![Err(
            Error::connection("Network Error", None),
        )]));
        session.send("Broken?", &mut NullRenderer).await;
        assert_eq!(session.messages(), &[Message::user("Broken?")][..]);
        assert_eq!(
            session.status(),
            &RequestStatus::Error("Network Error".to_string())
        );
    }

    #[tokio::test]
    async fn structured_answer_is_attached() {
        let response = ChatResponse {
            answer: "Two things.".to_string(),
            structured: Some(StructuredAnswer::new("two", vec!["A".into(), "B".into()])),
            sources: vec!["faq.md".to_string()],
            confidence: Some(0.4),
        };
        let mut session = ChatSession::new(ScriptedBackend::with(vec![Ok(response.clone())]));
        session.send("What?", &mut NullRenderer).await;
        let reply = &session.messages()[1];
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, response.answer);
        assert_eq!(reply.structured, response.structured);
        assert_eq!(reply.sources, Some(response.sources));
        assert_eq!(reply.confidence, response.confidence);
    }

    #[tokio::test]
    async fn blank_text_changes_nothing() {
        let backend = ScriptedBackend::with(vec![Err(Error::api(500, "boom"))]);
        let mut session = ChatSession::new(backend);
        session.send("oops", &mut NullRenderer).await;
        let before = session.status().clone();

        for blank in ["", "   ", "\n\t"] {
            session.send(blank, &mut NullRenderer).await;
        }
        assert_eq!(session.status(), &before);
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.backend().queries(), vec!["oops"]);
    }

    #[tokio::test]
    async fn error_is_cleared_by_next_send() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![
            Err(Error::timeout("timeout of 20000ms exceeded", Some(20.0))),
            Ok(hi_there()),
        ]));
        session.send("first", &mut NullRenderer).await;
        assert_eq!(
            session.status().error_message(),
            Some("timeout of 20000ms exceeded")
        );
        session.send("second", &mut NullRenderer).await;
        assert!(session.status().is_idle());

        let roles: Vec<MessageRole> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::User, MessageRole::Assistant]
        );
    }

    #[tokio::test]
    async fn messageless_failure_uses_fallback() {
        let mut session =
            ChatSession::new(ScriptedBackend::with(vec![Err(Error::unknown("  "))]));
        session.send("Hello", &mut NullRenderer).await;
        assert_eq!(
            session.status(),
            &RequestStatus::Error(FALLBACK_ERROR_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn renderer_sees_lifecycle() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![
            Ok(hi_there()),
            Err(Error::api(500, "Internal server error")),
        ]));
        let mut renderer = RecordingRenderer::default();
        session.send("Hello", &mut renderer).await;
        session.send("Again", &mut renderer).await;
        assert_eq!(
            renderer.events,
            vec![
                "loading",
                "clear",
                "message:Hi there",
                "loading",
                "clear",
                "error:Internal server error",
            ]
        );
    }

    #[test]
    fn user_message_precedes_completion_and_drop_leaves_loading() {
        let mut session = ChatSession::new(SilentBackend);
        {
            let mut renderer = NullRenderer;
            let mut turn = tokio_test::task::spawn(session.send("Hello", &mut renderer));
            assert!(turn.poll().is_pending());
        }
        assert_eq!(session.messages(), &[Message::user("Hello")][..]);
        assert_eq!(
            session.status(),
            &RequestStatus::Error(FALLBACK_ERROR_MESSAGE.to_string())
        );
    }

    #[test]
    fn panicking_backend_does_not_stick_in_loading() {
        let mut session = ChatSession::new(PanickingBackend);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tokio_test::block_on(session.send("Hello", &mut NullRenderer));
        }));
        assert!(outcome.is_err());
        assert!(!session.status().is_loading());
        assert_eq!(session.message_count(), 1);
    }

    #[tokio::test]
    async fn retry_resends_last_user_message() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![
            Err(Error::connection("Network Error", None)),
            Ok(hi_there()),
        ]));
        session.send("Broken?", &mut NullRenderer).await;
        session.retry_last(&mut NullRenderer).await;
        assert!(session.status().is_idle());
        assert_eq!(session.backend().queries(), vec!["Broken?", "Broken?"]);
        assert_eq!(session.message_count(), 3);
        assert_eq!(session.last_user_message().unwrap().content, "Broken?");
    }

    #[tokio::test]
    async fn retry_without_history_is_noop() {
        let mut session = ChatSession::new(ScriptedBackend::default());
        session.retry_last(&mut NullRenderer).await;
        assert!(session.backend().queries().is_empty());
        assert!(session.status().is_idle());
    }

    #[tokio::test]
    async fn reset_session() {
        let mut session =
            ChatSession::new(ScriptedBackend::with(vec![Err(Error::api(502, "Bad Gateway"))]));
        session.send("Hello", &mut NullRenderer).await;
        session.reset();
        assert_eq!(session.message_count(), 0);
        assert!(session.status().is_idle());
    }

    #[tokio::test]
    async fn stats_track_requests() {
        let mut session = ChatSession::new(ScriptedBackend::with(vec![
            Ok(hi_there()),
            Err(Error::api(500, "boom")),
        ]));
        session.send("one", &mut NullRenderer).await;
        session.send("two", &mut NullRenderer).await;
        let stats = session.stats();
        assert_eq!(stats.message_count, 3);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.assistant_messages, 1);
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 1);
        assert!(stats.last_latency.is_some());
        assert_eq!(stats.status, RequestStatus::Error("boom".to_string()));
    }

    #[test]
    fn failure_classification() {
        assert_eq!(
            ChatFailure::from(&Error::api(500, "Internal server error")),
            ChatFailure::Transport("Internal server error".to_string())
        );
        assert_eq!(ChatFailure::from(&Error::unknown("")), ChatFailure::Unknown);
        assert_eq!(ChatFailure::Unknown.message(), "Request failed");
    }
}
