// Scripted chat client for tests and local runs without a provider

use crate::streaming::StreamEvent;
use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenStream};
use crate::types::Role;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock answers for a matching request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Whole reply; streamed as a single chunk
    Text(String),
    /// Streamed chunk by chunk; joined for non-streaming calls
    Chunks(Vec<String>),
    /// Request fails before any output
    Fail(String),
    /// Emits the chunks, then the stream errors
    FailAfter(Vec<String>, String),
}

impl MockReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Chunks(chunks.into_iter().map(Into::into).collect())
    }
}

/// Mock chat client
///
/// Rules are matched in insertion order against the system prompt of the
/// request (falling back to every message when there is no system prompt).
/// Unmatched requests get the default reply.
pub struct MockChatClient {
    rules: Vec<(String, MockReply)>,
    default: MockReply,
    calls: Mutex<Vec<ChatRequest>>,
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new(MockReply::text(""))
    }
}

impl MockChatClient {
    pub fn new(default: MockReply) -> Self {
        Self {
            rules: Vec::new(),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `reply` whenever the system prompt contains `pattern`
    pub fn when(mut self, pattern: impl Into<String>, reply: MockReply) -> Self {
        self.rules.push((pattern.into(), reply));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of recorded requests whose system prompt contains `pattern`
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.calls()
            .iter()
            .filter(|request| Self::haystack(request).contains(pattern))
            .count()
    }

    fn haystack(request: &ChatRequest) -> String {
        let system: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        if system.is_empty() {
            request
                .messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            system.join("\n")
        }
    }

    fn record(&self, request: &ChatRequest) -> MockReply {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request.clone());
        }

        let haystack = Self::haystack(request);
        self.rules
            .iter()
            .find(|(pattern, _)| haystack.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        match self.record(&request) {
            MockReply::Text(text) => Ok(ChatResponse::text(text)),
            MockReply::Chunks(chunks) => Ok(ChatResponse::text(chunks.concat())),
            MockReply::Fail(reason) | MockReply::FailAfter(_, reason) => {
                anyhow::bail!("Mock chat failure: {}", reason)
            }
        }
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<TokenStream> {
        let (chunks, failure) = match self.record(&request) {
            MockReply::Text(text) => (vec![text], None),
            MockReply::Chunks(chunks) => (chunks, None),
            MockReply::Fail(reason) => anyhow::bail!("Mock chat failure: {}", reason),
            MockReply::FailAfter(chunks, reason) => (chunks, Some(reason)),
        };

        Ok(Box::pin(async_stream::stream! {
            for content in chunks {
                yield Ok(StreamEvent::Message { content });
            }
            match failure {
                Some(reason) => yield Err(anyhow::anyhow!("Mock stream failure: {}", reason)),
                None => yield Ok(StreamEvent::Done { finish_reason: Some("stop".to_string()) }),
            }
        }))
    }
}
