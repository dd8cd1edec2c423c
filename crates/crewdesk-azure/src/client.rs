// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Azure OpenAI chat-completions API.
//!
//! Provides [`AzureOpenAiClient`] which handles request construction,
//! authentication, and the bounded per-call timeout. There is deliberately no
//! retry logic: callers own the degradation policy per task.

use std::time::Duration;

use crewdesk_core::CrewdeskError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};

/// HTTP client for Azure OpenAI chat completions.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    chat_url: String,
    deployment: String,
    endpoint_host: String,
    request_timeout: Duration,
}

impl AzureOpenAiClient {
    /// Creates a new Azure OpenAI client.
    ///
    /// # Arguments
    /// * `api_key` - key for the Azure OpenAI resource, sent as `api-key`
    /// * `endpoint` - resource endpoint, e.g. `https://my-resource.openai.azure.com`
    /// * `deployment` - deployment identifier of the chat model
    /// * `api_version` - API version query parameter
    /// * `request_timeout` - bound placed on every call
    pub fn new(
        api_key: &str,
        endpoint: &str,
        deployment: &str,
        api_version: &str,
        request_timeout: Duration,
    ) -> Result<Self, CrewdeskError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "api-key",
            HeaderValue::from_str(api_key).map_err(|e| {
                CrewdeskError::Config(format!("invalid API key header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| CrewdeskError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        let endpoint = endpoint.trim_end_matches('/');
        let chat_url = format!(
            "{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}"
        );

        Ok(Self {
            client,
            chat_url,
            deployment: deployment.to_string(),
            endpoint_host: host_of(endpoint),
            request_timeout,
        })
    }

    /// Deployment identifier, included in error context for diagnosis.
    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    /// Endpoint host, included in error context for diagnosis.
    pub fn endpoint_host(&self) -> &str {
        &self.endpoint_host
    }

    /// Overrides the chat URL (for testing with wiremock).
    #[cfg(test)]
    pub(crate) fn with_chat_url(mut self, url: String) -> Self {
        self.chat_url = url;
        self
    }

    /// Sends one chat-completion request and returns the first choice's text.
    ///
    /// The whole call is wrapped in a bounded wait; expiry surfaces as
    /// [`CrewdeskError::Timeout`] rather than stalling the channel forever.
    pub async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, CrewdeskError> {
        let call = self.send(request);
        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CrewdeskError::Timeout {
                duration: self.request_timeout,
            }),
        }
    }

    async fn send(&self, request: &ChatCompletionRequest) -> Result<String, CrewdeskError> {
        let response = self
            .client
            .post(&self.chat_url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.provider_error(format!("HTTP request failed: {e}"), Some(e)))?;

        let status = response.status();
        debug!(status = %status, deployment = %self.deployment, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| self.provider_error(format!("failed to read response body: {e}"), Some(e)))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Azure OpenAI error ({}): {}",
                    api_err.error.code.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(self.provider_error(message, None::<reqwest::Error>));
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| self.provider_error(format!("failed to parse API response: {e}"), Some(e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| self.provider_error("response contained no choices".to_string(), None::<reqwest::Error>))
    }

    /// Wraps a message with deployment/endpoint context so configuration
    /// problems are diagnosable from the log line alone.
    fn provider_error<E>(&self, message: String, source: Option<E>) -> CrewdeskError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CrewdeskError::Provider {
            message: format!(
                "{message} (deployment {}, endpoint {})",
                self.deployment, self.endpoint_host
            ),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}

fn host_of(endpoint: &str) -> String {
    endpoint
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(endpoint)
        .split('/')
        .next()
        .unwrap_or(endpoint)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChatMessage, CompletionOptions};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AzureOpenAiClient {
        AzureOpenAiClient::new(
            "test-api-key",
            "https://support.openai.azure.com",
            "gpt-4o",
            "2024-02-15-preview",
            Duration::from_secs(5),
        )
        .unwrap()
        .with_chat_url(format!("{base_url}/chat"))
    }

    fn test_request() -> ChatCompletionRequest {
        ChatCompletionRequest::new(
            vec![ChatMessage::user("Hello")],
            CompletionOptions::default(),
        )
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn chat_url_is_built_from_config() {
        let client = AzureOpenAiClient::new(
            "key",
            "https://support.openai.azure.com/",
            "gpt-4o",
            "2024-02-15-preview",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            client.chat_url,
            "https://support.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview"
        );
        assert_eq!(client.endpoint_host(), "support.openai.azure.com");
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("api-key", "test-api-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hi there!")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let content = client.complete(&test_request()).await.unwrap();
        assert_eq!(content, "Hi there!");
    }

    #[tokio::test]
    async fn api_error_body_is_surfaced_with_context() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"code": "DeploymentNotFound", "message": "No such deployment"}
        });
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(404).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(&test_request()).await.unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("DeploymentNotFound"), "got: {rendered}");
        assert!(rendered.contains("gpt-4o"), "got: {rendered}");
        assert!(rendered.contains("support.openai.azure.com"), "got: {rendered}");
    }

    #[tokio::test]
    async fn empty_choices_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.complete(&test_request()).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("too late"))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.request_timeout = Duration::from_millis(100);
        let err = client.complete(&test_request()).await.unwrap_err();
        assert!(matches!(err, CrewdeskError::Timeout { .. }));
    }
}
