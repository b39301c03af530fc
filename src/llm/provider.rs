//! HTTP model client implementation
//!
//! Implements `LlmClient` against any OpenAI-compatible `/chat/completions`
//! endpoint through `async-openai`.
//!
//! Configuration (see [`LlmSettings`](crate::LlmSettings)):
//! - `HF_BASE_URL`: API base, `/chat/completions` is appended
//! - `MODEL_NAME`: model identifier
//! - `OPENAI_API_KEY`: optional bearer token
//! - `LLM_MAX_TOKENS`: completion budget

use super::traits::{ChatMessage, LlmClient, Role, TextStream};
use crate::LlmSettings;
use anyhow::{Context, Result};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client as OpenAIClient,
};
use async_trait::async_trait;
use futures::StreamExt;

/// Model client for OpenAI-compatible chat-completion endpoints.
///
/// Cheaply cloneable (shares the HTTP client internally).
#[derive(Clone)]
pub struct HttpLlmClient {
    client: OpenAIClient<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl HttpLlmClient {
    /// Create a client with explicit configuration.
    pub fn new(base_url: &str, model: String, api_key: Option<String>, max_tokens: u32) -> Self {
        let mut config = OpenAIConfig::new().with_api_base(base_url.trim_end_matches('/'));
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            config = config.with_api_key(key);
        }

        Self {
            client: OpenAIClient::with_config(config),
            model,
            max_tokens,
        }
    }

    /// Create a client from the `llm` configuration section
    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self::new(
            &settings.base_url,
            settings.model.clone(),
            settings.api_key.clone(),
            settings.max_tokens,
        )
    }

    fn request(&self, messages: Vec<ChatMessage>) -> Result<CreateChatCompletionRequest> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(u16::try_from(self.max_tokens).unwrap_or(u16::MAX))
            .messages(convert_messages(messages)?)
            .build()?;
        Ok(request)
    }
}

fn convert_messages(messages: Vec<ChatMessage>) -> Result<Vec<ChatCompletionRequestMessage>> {
    messages
        .into_iter()
        .map(|msg| -> Result<ChatCompletionRequestMessage> {
            let converted = match msg.role {
                Role::User => ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessageArgs::default()
                        .content(msg.content)
                        .build()?,
                ),
                Role::Assistant => ChatCompletionRequestMessage::Assistant(
                    ChatCompletionRequestAssistantMessageArgs::default()
                        .content(msg.content)
                        .build()?,
                ),
            };
            Ok(converted)
        })
        .collect()
}

fn api_error(e: OpenAIError) -> anyhow::Error {
    anyhow::anyhow!("Model API error: {}", e)
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let request = self.request(messages)?;
        let response = self.client.chat().create(request).await.map_err(api_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Model API returned no choices")
    }

    async fn stream(&self, messages: Vec<ChatMessage>) -> Result<TextStream> {
        let request = self.request(messages)?;
        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(api_error)?;

        // A refused connection or error status arrives as the first item;
        // surface it as the call's error so nothing has been shown yet.
        let first = match stream.next().await {
            Some(Err(e)) => return Err(api_error(e)),
            other => other,
        };

        let deltas = futures::stream::iter(first)
            .chain(stream)
            .filter_map(|item| async move {
                match item {
                    Ok(response) => response
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|choice| choice.delta.content)
                        .filter(|s| !s.is_empty())
                        .map(Ok),
                    Err(e) => {
                        tracing::error!("Model stream failed: {}", e);
                        Some(Err(api_error(e).context("Model stream interrupted")))
                    }
                }
            });

        Ok(deltas.boxed())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sse(deltas: &[&str]) -> String {
        let mut body = String::new();
        for d in deltas {
            let chunk = json!({
                "id": "chatcmpl-1",
                "object": "chat.completion.chunk",
                "created": 1_700_000_000u32,
                "model": "m",
                "choices": [{"index": 0, "delta": {"content": d}, "finish_reason": null}]
            });
            body.push_str(&format!("data: {}\n\n", chunk));
        }
        body.push_str("data: [DONE]\n\n");
        body
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "math-7b",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[test]
    fn test_new_keeps_model_name() {
        let client = HttpLlmClient::new("http://host/v1/", "m".into(), Some(String::new()), 10);
        assert_eq!(client.model_name(), "m");
    }

    #[test]
    fn test_request_carries_history_and_budget() {
        let client = HttpLlmClient::new("http://host/v1", "m".into(), None, 42);
        let request = client
            .request(vec![ChatMessage::user("1+1"), ChatMessage::assistant("2")])
            .unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model"], "m");
        assert_eq!(body["max_tokens"], 42);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["messages"][1]["content"], "2");
    }

    #[tokio::test]
    async fn test_complete_parses_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "math-7b", "max_tokens": 100})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("x = 2")))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(
            &format!("{}/v1", server.uri()),
            "math-7b".into(),
            Some("sk-test".into()),
            100,
        );
        let answer = client
            .complete(vec![ChatMessage::user("solve 2x = 4")])
            .await
            .unwrap();
        assert_eq!(answer, "x = 2");
    }

    #[tokio::test]
    async fn test_stream_yields_deltas_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"stream": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(sse(&["Step", " 1", "", "."]), "text/event-stream"),
            )
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(&server.uri(), "m".into(), None, 100);
        let chunks: Vec<String> = client
            .stream(vec![ChatMessage::user("1+1")])
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(chunks, vec!["Step", " 1", "."]);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "model not found", "type": "invalid_request_error"}
            })))
            .mount(&server)
            .await;

        let client = HttpLlmClient::new(&server.uri(), "m".into(), None, 100);
        let err = client
            .complete(vec![ChatMessage::user("1+1")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model not found"));

        assert!(client.stream(vec![ChatMessage::user("1+1")]).await.is_err());
    }
}
