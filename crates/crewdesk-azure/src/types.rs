// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the Azure OpenAI chat-completions API.

use serde::{Deserialize, Serialize};

/// Sampling parameters for one completion call.
///
/// Defaults match the service-wide baseline; each task overrides only the
/// knobs it cares about.
#[derive(Debug, Clone, Copy)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens: 800,
        }
    }
}

impl CompletionOptions {
    /// FAQ matching forces a low temperature for precision and a small
    /// token ceiling for the structured verdict.
    pub fn faq_match() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 300,
            ..Self::default()
        }
    }

    /// Suggestion generation runs a little hotter for variety.
    pub fn suggestions() -> Self {
        Self {
            temperature: 0.8,
            ..Self::default()
        }
    }

    /// Summaries get a tight token budget.
    pub fn summary() -> Self {
        Self {
            max_tokens: 200,
            ..Self::default()
        }
    }
}

/// One chat turn sent to the API.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn new(messages: Vec<ChatMessage>, options: CompletionOptions) -> Self {
        Self {
            messages,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            max_tokens: options.max_tokens,
        }
    }
}

/// Response body from the chat-completions endpoint (only the fields we read).
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_match_service_baseline() {
        let options = CompletionOptions::default();
        assert_eq!(options.temperature, 0.7);
        assert_eq!(options.top_p, 0.95);
        assert_eq!(options.frequency_penalty, 0.0);
        assert_eq!(options.presence_penalty, 0.0);
        assert_eq!(options.max_tokens, 800);
    }

    #[test]
    fn task_overrides_only_touch_their_knobs() {
        let faq = CompletionOptions::faq_match();
        assert_eq!(faq.temperature, 0.1);
        assert_eq!(faq.max_tokens, 300);
        assert_eq!(faq.top_p, 0.95);

        let suggestions = CompletionOptions::suggestions();
        assert_eq!(suggestions.temperature, 0.8);
        assert_eq!(suggestions.max_tokens, 800);

        let summary = CompletionOptions::summary();
        assert_eq!(summary.temperature, 0.7);
        assert_eq!(summary.max_tokens, 200);
    }

    #[test]
    fn request_serializes_all_sampling_fields() {
        let request = ChatCompletionRequest::new(
            vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            CompletionOptions::default(),
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 800);
        assert_eq!(json["top_p"], 0.95);
    }

    #[test]
    fn response_parses_with_missing_content() {
        let response: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {}}]}"#).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
