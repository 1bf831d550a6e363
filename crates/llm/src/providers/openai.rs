//! OpenAI completion provider.
//!
//! Uses the chat-completions endpoint. The system instruction and the
//! prompt are sent as separate messages; streaming uses server-sent
//! events with `data:` framed JSON deltas.

use crate::client::{
    CompletionChunk, CompletionClient, CompletionRequest, CompletionResponse, CompletionStream,
};
use colloquy_core::{AppError, AppResult};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI completion client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client with the given API key against the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_OPENAI_URL)
    }

    /// Create a client with a custom base URL (e.g., a compatible proxy).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }

        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: request.stream,
        }
    }

    async fn post_chat(&self, body: &ChatRequest) -> AppResult<reqwest::Response> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn invoke(&self, request: &CompletionRequest) -> AppResult<CompletionResponse> {
        tracing::info!("Sending completion request to OpenAI");
        tracing::debug!("Model: {}, prompt bytes: {}", request.model, request.prompt.len());

        let mut body = self.to_chat_request(request);
        body.stream = false;

        let response = self.post_chat(&body).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::Llm("OpenAI response contained no choices".to_string()))?;

        tracing::info!("Received completion from OpenAI");

        Ok(CompletionResponse {
            content,
            model: chat.model,
        })
    }

    async fn stream(&self, request: &CompletionRequest) -> AppResult<CompletionStream> {
        tracing::info!("Starting streaming request to OpenAI");

        let mut body = self.to_chat_request(request);
        body.stream = true;

        let response = self.post_chat(&body).await?;

        // OpenAI streams server-sent events: `data: {json}` lines, with a
        // final `data: [DONE]` marker.
        let stream = response.bytes_stream().map(move |result| {
            let bytes = result.map_err(|e| AppError::Llm(format!("Stream error: {}", e)))?;

            let text = String::from_utf8_lossy(&bytes);
            let chunks: Vec<AppResult<CompletionChunk>> = text
                .lines()
                .filter_map(|line| line.strip_prefix("data: "))
                .filter(|payload| !payload.trim().is_empty())
                .map(|payload| {
                    if payload.trim() == "[DONE]" {
                        return Ok(CompletionChunk {
                            content: String::new(),
                            done: true,
                        });
                    }

                    let event: StreamEvent = serde_json::from_str(payload)
                        .map_err(|e| AppError::Llm(format!("Failed to parse chunk: {}", e)))?;

                    let (content, done) = event
                        .choices
                        .into_iter()
                        .next()
                        .map(|c| (c.delta.content.unwrap_or_default(), c.finish_reason.is_some()))
                        .unwrap_or_default();

                    Ok(CompletionChunk { content, done })
                })
                .collect();

            Ok(futures::stream::iter(chunks))
        });

        Ok(Box::pin(stream.flat_map(|result| match result {
            Ok(chunks) => chunks,
            Err(e) => futures::stream::iter(vec![Err(e)]),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_conversion() {
        let client = OpenAiClient::new("sk-test");
        let request = CompletionRequest::new("What is GitLab?", "gpt-3.5-turbo")
            .with_system("Answer briefly.")
            .with_temperature(0.0);

        let body = client.to_chat_request(&request);
        assert_eq!(body.model, "gpt-3.5-turbo");
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[1].role, "user");
        assert_eq!(body.messages[1].content, "What is GitLab?");
    }

    #[test]
    fn test_chat_request_without_system() {
        let client = OpenAiClient::new("sk-test");
        let request = CompletionRequest::new("q", "gpt-3.5-turbo");

        let body = client.to_chat_request(&request);
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
    }

    #[test]
    fn test_stream_event_parsing() {
        let payload = r#"{"choices":[{"delta":{"content":"Hi"},"finish_reason":null}]}"#;
        let event: StreamEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event.choices[0].delta.content.as_deref(), Some("Hi"));
        assert!(event.choices[0].finish_reason.is_none());
    }
}
