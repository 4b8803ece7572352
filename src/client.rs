//! Tutor Backend Client
//!
//! HTTP client for the Study Bright chat backend (OpenAI-compatible
//! `chat/completions` with `stream: true`).
//!
//! All failures travel through the event channel rather than a fallible
//! return: request send failures, non-2xx responses, and mid-stream read
//! errors each become the stream's single terminal [`StreamEvent::Error`].
//! That keeps the consumer facing one contract (zero or more deltas, then
//! exactly one of `Done`/`Error`) no matter where things went wrong.
//! Retry policy, if any, belongs to the caller.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::TutorConfig;
use crate::error::StreamError;
use crate::message::ChatMessage;
use crate::sse::{pump, Dispatcher, StreamEvent};

/// Channel capacity for streaming events.
const EVENT_CHANNEL_CAPACITY: usize = 100;

/// A chat completion request.
#[derive(Clone, Debug, Default)]
pub struct ChatRequest {
    /// Conversation history, oldest first
    pub messages: Vec<ChatMessage>,
    /// Model override (falls back to the configured model)
    pub model: Option<String>,
    /// Sampling temperature (omitted when `None`)
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Create an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the history.
    #[must_use]
    pub fn with_message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Append a user message.
    #[must_use]
    pub fn with_user(self, content: impl Into<String>) -> Self {
        self.with_message(ChatMessage::user(content))
    }

    /// Set the model override.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature.clamp(0.0, 2.0));
        self
    }
}

/// Client for the tutor chat backend.
#[derive(Clone)]
pub struct TutorClient {
    /// HTTP client
    http: reqwest::Client,
    /// Endpoint and model configuration
    config: TutorConfig,
}

impl TutorClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: TutorConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(config.request_timeout)
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    /// The configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check if the backend is reachable.
    pub async fn health_check(&self) -> bool {
        self.http
            .get(self.models_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }

    /// Get the chat completions endpoint URL
    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Get the models endpoint URL
    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the request body
    fn build_body(&self, request: &ChatRequest) -> serde_json::Value {
        let messages: Vec<serde_json::Value> = request
            .messages
            .iter()
            .map(|m| {
                serde_json::json!({
                    "role": m.role,
                    "content": m.content(),
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": request.model.as_deref().unwrap_or(&self.config.model),
            "messages": messages,
            "stream": true,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        body
    }

    /// Send a request and stream the response.
    ///
    /// Returns immediately with the event receiver: zero or more
    /// [`StreamEvent::Delta`]s in arrival order, then exactly one of
    /// [`StreamEvent::Done`] / [`StreamEvent::Error`]. Dropping the
    /// receiver abandons the stream.
    pub fn stream_chat(&self, request: &ChatRequest) -> mpsc::Receiver<StreamEvent> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let http = self.http.clone();
        let url = self.chat_url();
        let body = self.build_body(request);
        let api_key = self.config.api_key.clone();

        tokio::spawn(async move {
            let mut dispatcher = Dispatcher::new(tx);

            tracing::debug!(url = %url, "starting chat stream");

            let mut builder = http.post(&url).json(&body);
            if let Some(ref key) = api_key {
                builder = builder.bearer_auth(key);
            }

            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) => {
                    dispatcher.fail(StreamError::request(err)).await;
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                dispatcher.fail(api_error(status, &body)).await;
                return;
            }

            // bytes_stream is not guaranteed Unpin; pin it to the heap.
            pump(Box::pin(response.bytes_stream()), &mut dispatcher).await;
        });

        rx
    }

    /// Like [`stream_chat`](Self::stream_chat), but as a `Stream` for
    /// combinator-style consumption.
    pub fn stream_chat_events(
        &self,
        request: &ChatRequest,
    ) -> tokio_stream::wrappers::ReceiverStream<StreamEvent> {
        tokio_stream::wrappers::ReceiverStream::new(self.stream_chat(request))
    }

    /// Send a request and wait for the complete response text.
    ///
    /// Streams internally and concatenates the deltas.
    ///
    /// # Errors
    ///
    /// Returns the stream's terminal error, or a read error if the stream
    /// vanished without one.
    pub async fn send(&self, request: &ChatRequest) -> Result<String, StreamError> {
        let mut rx = self.stream_chat(request);
        let mut content = String::new();

        while let Some(event) = rx.recv().await {
            match event {
                StreamEvent::Delta(text) => content.push_str(&text),
                StreamEvent::Done => return Ok(content),
                StreamEvent::Error(err) => return Err(err),
            }
        }

        Err(StreamError::read("stream closed without completing"))
    }
}

/// Build the terminal error for a non-2xx response.
///
/// Best effort: prefer a server-provided message from the JSON body
/// (either `{"error": "..."}` or `{"error": {"message": "..."}}`),
/// falling back to the status line.
fn api_error(status: reqwest::StatusCode, body: &str) -> StreamError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            let error = value.get("error")?;
            match error {
                serde_json::Value::String(s) => Some(s.clone()),
                _ => error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(String::from),
            }
        })
        .unwrap_or_else(|| status.to_string());

    StreamError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageRole;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    fn client() -> TutorClient {
        TutorClient::new(TutorConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            model: "test-model".to_string(),
            ..TutorConfig::default()
        })
    }

    #[test]
    fn test_chat_url_strips_trailing_slash() {
        assert_eq!(
            client().chat_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }

    #[test]
    fn test_build_body_roles_and_model() {
        let request = ChatRequest::new()
            .with_user("Explain mitosis")
            .with_message(ChatMessage::user("briefly"));

        let body = client().build_body(&request);
        assert_eq!(body["model"], "test-model");
        assert_eq!(body["stream"], true);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Explain mitosis");
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn test_build_body_model_override_and_temperature() {
        let request = ChatRequest::new()
            .with_user("hi")
            .with_model("other-model")
            .with_temperature(0.3);

        let body = client().build_body(&request);
        assert_eq!(body["model"], "other-model");
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_temperature_clamped() {
        let request = ChatRequest::new().with_temperature(9.0);
        assert_eq!(request.temperature, Some(2.0));
    }

    #[test]
    fn test_api_error_string_body() {
        let err = api_error(StatusCode::TOO_MANY_REQUESTS, r#"{"error":"rate limited"}"#);
        assert_eq!(
            err,
            StreamError::Api {
                status: 429,
                message: "rate limited".to_string(),
            }
        );
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_api_error_object_body() {
        let err = api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":{"message":"model not found","type":"invalid_request_error"}}"#,
        );
        assert_eq!(
            err,
            StreamError::Api {
                status: 400,
                message: "model not found".to_string(),
            }
        );
    }

    #[test]
    fn test_api_error_falls_back_to_status_line() {
        let err = api_error(StatusCode::INTERNAL_SERVER_ERROR, "not json at all");
        assert_eq!(
            err,
            StreamError::Api {
                status: 500,
                message: "500 Internal Server Error".to_string(),
            }
        );
    }

    #[test]
    fn test_api_error_empty_body() {
        let err = api_error(StatusCode::BAD_GATEWAY, "");
        assert_eq!(
            err,
            StreamError::Api {
                status: 502,
                message: "502 Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_streaming_role_wire_format() {
        let value = serde_json::to_value(MessageRole::Assistant).unwrap();
        assert_eq!(value, "assistant");
    }
}
