// OpenAI-compatible chat completions client

use crate::streaming::parse_chat_sse_stream;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenStream, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI client (HTTP direct, no SDK)
///
/// Works against any endpoint that speaks the `/chat/completions` protocol,
/// which is how tests point it at a local mock server.
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenAIClient {
    /// Create new client with API key
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: OPENAI_API_BASE.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_chat_request(
        &self,
        model: &str,
        messages: &[Message],
        options: &ChatOptions,
        stream: bool,
    ) -> Value {
        let mut request = Map::new();
        request.insert("model".to_string(), Value::from(model));
        request.insert(
            "messages".to_string(),
            Value::Array(messages.iter().map(convert_message).collect()),
        );
        request.insert("stream".to_string(), Value::Bool(stream));

        if let Some(temp) = options.temperature {
            request.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            request.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }

        Value::Object(request)
    }

    async fn send(&self, request: &ChatRequest, stream: bool) -> Result<reqwest::Response> {
        let payload = self.build_chat_request(
            &request.model,
            &request.messages,
            &request.options,
            stream,
        );

        let mut builder = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&payload);
        if let Some(timeout) = request.options.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(model = %request.model, stream, "Sending chat completion request");

        let response = builder.send().await.context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

fn convert_message(message: &Message) -> Value {
    serde_json::json!({
        "role": message.role.as_str(),
        "content": message.content,
    })
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let response = self.send(&request, false).await?;

        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        let choice = raw.choices.into_iter().next();
        Ok(ChatResponse {
            content: choice.as_ref().and_then(|c| c.message.content.clone()),
            usage: raw.usage.map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason),
        })
    }

    async fn chat_stream(&self, request: ChatRequest) -> Result<TokenStream> {
        let response = self.send(&request, true).await?;
        Ok(parse_chat_sse_stream(response))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_chat_request() {
        let client = OpenAIClient::new("test-key").unwrap();
        let messages = vec![Message::system("Eres un asistente."), Message::human("Hola")];
        let options = ChatOptions::new().temperature(0.0).max_tokens(10);

        let payload = client.build_chat_request("gpt-4o-mini", &messages, &options, true);

        assert_eq!(payload["model"], "gpt-4o-mini");
        assert_eq!(payload["stream"], true);
        assert_eq!(payload["max_tokens"], 10);
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "Hola");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = OpenAIClient::new("k").unwrap().with_base_url("http://localhost:9/v1/");
        assert_eq!(client.base_url(), "http://localhost:9/v1");
    }
}
