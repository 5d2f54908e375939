//! HttpChatBackend - REST implementation of the chatbot backend.
//!
//! Calls `POST {base_url}/chatbot/start` and `POST {base_url}/chatbot/message`
//! with JSON bodies.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use jobchat_core::WidgetConfig;
use jobchat_core::backend::{
    ChatBackend, PostMessageRequest, PostMessageResponse, StartSessionRequest,
    StartSessionResponse,
};
use jobchat_core::error::{ChatError, Result};

const START_PATH: &str = "chatbot/start";
const MESSAGE_PATH: &str = "chatbot/message";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Backend implementation that talks to the job board REST API.
#[derive(Clone)]
pub struct HttpChatBackend {
    client: Client,
    base_url: String,
}

impl HttpChatBackend {
    /// Creates a backend for `base_url` with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a backend whose requests fail after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Uses a preconfigured client (shared connection pool, custom headers, ...).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self> {
        Self::with_timeout(config.api_base_url.clone(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> std::result::Result<R, String>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| describe_transport_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(describe_http_error(status, &body_text));
        }

        response
            .json::<R>()
            .await
            .map_err(|err| format!("Failed to parse response from {url}: {err}"))
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn start_session(&self, request: &StartSessionRequest) -> Result<StartSessionResponse> {
        self.post_json(START_PATH, request)
            .await
            .map_err(ChatError::session_creation)
    }

    async fn post_message(&self, request: &PostMessageRequest) -> Result<PostMessageResponse> {
        self.post_json(MESSAGE_PATH, request)
            .await
            .map_err(ChatError::message_post)
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {err}")
    } else if err.is_connect() {
        format!("backend unreachable: {err}")
    } else {
        format!("request failed: {err}")
    }
}

/// Error bodies of this API look like `{ "success": false, "message": "..." }`.
fn describe_http_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let backend = HttpChatBackend::new("https://jobs.example.com/api/").unwrap();
        assert_eq!(backend.base_url(), "https://jobs.example.com/api");
        assert_eq!(
            backend.endpoint(START_PATH),
            "https://jobs.example.com/api/chatbot/start"
        );
    }

    #[test]
    fn test_http_error_prefers_message_field() {
        let text = describe_http_error(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"success":false,"message":"Chatbot is offline"}"#,
        );
        assert_eq!(text, "HTTP 503 Service Unavailable: Chatbot is offline");
    }

    #[test]
    fn test_http_error_with_empty_body() {
        assert_eq!(
            describe_http_error(StatusCode::BAD_GATEWAY, ""),
            "HTTP 502 Bad Gateway"
        );
    }
}
