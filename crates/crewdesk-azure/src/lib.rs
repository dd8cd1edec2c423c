// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Azure OpenAI completion provider for the Crewdesk support service.
//!
//! Implements [`CompletionProvider`] over a single hosted chat-completions
//! endpoint with task-specific sampling parameters. The degradation policy
//! lives here: language detection, FAQ matching, suggestion generation, and
//! summarization absorb their own failures; only reply generation propagates.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::{info, warn};

use crewdesk_config::AzureConfig;
use crewdesk_core::types::{Faq, FaqMatch, Message, MessageRole, DEFAULT_LANGUAGE};
use crewdesk_core::{CompletionProvider, CrewdeskError};

use crate::client::AzureOpenAiClient;
use crate::types::{ChatCompletionRequest, ChatMessage, CompletionOptions};

const DETECT_PROMPT: &str = "Identify the language of the user's message. \
Respond with exactly one ISO 639-1 two-letter code and nothing else.";

const FAQ_MATCH_PROMPT: &str = "You decide whether one of the provided FAQ entries answers the \
customer's message. Respond with only a JSON object of the form \
{\"matched\": boolean, \"confidence\": number between 0 and 1, \"answer\": string or null, \
\"suggestions\": array of up to three short follow-up questions, \
\"needsHumanReview\": boolean}. Use the FAQ answer text verbatim when matched. \
Set needsHumanReview when the customer seems frustrated or the issue needs a person.";

const REPLY_PROMPT: &str = "You are a friendly customer support assistant. Answer the \
customer's latest message helpfully and concisely using the conversation so far.";

const SUGGESTIONS_PROMPT: &str = "Given an assistant reply, propose exactly three short \
follow-up questions a customer might ask next. Respond with only a JSON array of three strings.";

const SUMMARY_PROMPT: &str = "Summarize the conversation so far in one short paragraph, \
keeping customer details that matter for follow-up support.";

/// [`CompletionProvider`] backed by an Azure OpenAI deployment.
#[derive(Debug)]
pub struct AzureCompletionGateway {
    client: AzureOpenAiClient,
}

impl AzureCompletionGateway {
    /// Creates the gateway from the `[azure]` config section.
    ///
    /// # API key resolution
    /// 1. `config.azure.api_key` if set
    /// 2. `AZURE_OPENAI_API_KEY` environment variable
    /// 3. Error if neither is available
    ///
    /// Endpoint and deployment must be present; this is the fail-fast point
    /// for Azure credentials at startup.
    pub fn new(config: &AzureConfig) -> Result<Self, CrewdeskError> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => std::env::var("AZURE_OPENAI_API_KEY").map_err(|_| {
                CrewdeskError::Config(
                    "azure.api_key is not set and AZURE_OPENAI_API_KEY is not in the environment"
                        .to_string(),
                )
            })?,
        };
        let endpoint = config
            .endpoint
            .as_deref()
            .ok_or_else(|| CrewdeskError::Config("azure.endpoint is not set".to_string()))?;
        let deployment = config
            .deployment
            .as_deref()
            .ok_or_else(|| CrewdeskError::Config("azure.deployment is not set".to_string()))?;

        let client = AzureOpenAiClient::new(
            &api_key,
            endpoint,
            deployment,
            &config.api_version,
            std::time::Duration::from_secs(config.request_timeout_secs),
        )?;

        info!(
            deployment = deployment,
            endpoint = %client.endpoint_host(),
            "Azure OpenAI provider initialized"
        );

        Ok(Self { client })
    }

    #[cfg(test)]
    fn with_client(client: AzureOpenAiClient) -> Self {
        Self { client }
    }

    fn history_messages(history: &[Message]) -> Vec<ChatMessage> {
        history
            .iter()
            .map(|m| ChatMessage {
                role: match m.role {
                    MessageRole::User => "user",
                    MessageRole::Assistant => "assistant",
                    MessageRole::System => "system",
                }
                .to_string(),
                content: m.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionProvider for AzureCompletionGateway {
    async fn detect_language(&self, text: &str) -> String {
        let request = ChatCompletionRequest::new(
            vec![ChatMessage::system(DETECT_PROMPT), ChatMessage::user(text)],
            CompletionOptions::default(),
        );
        match self.client.complete(&request).await {
            Ok(raw) => {
                let code = raw.trim().to_lowercase();
                if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                    code
                } else {
                    warn!(raw = %raw, "language detection returned a non-ISO code, using default");
                    DEFAULT_LANGUAGE.to_string()
                }
            }
            Err(e) => {
                warn!(error = %e, "language detection failed, using default");
                DEFAULT_LANGUAGE.to_string()
            }
        }
    }

    async fn match_faq(&self, message: &str, faqs: &[Faq]) -> Option<FaqMatch> {
        if faqs.is_empty() {
            return None;
        }

        let listing = faqs
            .iter()
            .map(|faq| format!("Q: {}\nA: {}", faq.question, faq.answer))
            .collect::<Vec<_>>()
            .join("\n---\n");
        let request = ChatCompletionRequest::new(
            vec![
                ChatMessage::system(FAQ_MATCH_PROMPT),
                ChatMessage::user(format!("FAQ entries:\n{listing}\n\nCustomer message: {message}")),
            ],
            CompletionOptions::faq_match(),
        );

        let raw = match self.client.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "FAQ matching call failed, falling through to generation");
                return None;
            }
        };

        match serde_json::from_str::<FaqMatch>(strip_code_fences(&raw)) {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                warn!(error = %e, raw = %raw, "FAQ match response was not valid JSON");
                None
            }
        }
    }

    async fn generate_reply(
        &self,
        history: &[Message],
        context_summary: Option<&str>,
        language: &str,
    ) -> Result<String, CrewdeskError> {
        let mut system = format!("{REPLY_PROMPT} Respond in the language with ISO code \"{language}\".");
        if let Some(summary) = context_summary {
            if !summary.is_empty() {
                system.push_str("\nContext from earlier in the conversation: ");
                system.push_str(summary);
            }
        }

        let mut messages = vec![ChatMessage::system(system)];
        messages.extend(Self::history_messages(history));

        let request = ChatCompletionRequest::new(messages, CompletionOptions::default());
        self.client.complete(&request).await
    }

    async fn generate_suggestions(&self, reply: &str) -> Vec<String> {
        let request = ChatCompletionRequest::new(
            vec![
                ChatMessage::system(SUGGESTIONS_PROMPT),
                ChatMessage::user(reply),
            ],
            CompletionOptions::suggestions(),
        );

        let raw = match self.client.complete(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "suggestion generation failed, returning none");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<String>>(strip_code_fences(&raw)) {
            Ok(mut suggestions) => {
                suggestions.truncate(3);
                suggestions
            }
            Err(e) => {
                warn!(error = %e, raw = %raw, "suggestion response was not a JSON array");
                Vec::new()
            }
        }
    }

    async fn summarize(&self, history: &[Message]) -> Option<String> {
        if history.is_empty() {
            return None;
        }

        let transcript = history
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n");
        let request = ChatCompletionRequest::new(
            vec![
                ChatMessage::system(SUMMARY_PROMPT),
                ChatMessage::user(transcript),
            ],
            CompletionOptions::summary(),
        );

        match self.client.complete(&request).await {
            Ok(summary) => {
                let summary = summary.trim().to_string();
                if summary.is_empty() { None } else { Some(summary) }
            }
            Err(e) => {
                warn!(error = %e, "summarization failed, keeping previous context");
                None
            }
        }
    }
}

/// Models often wrap structured output in markdown fences; strip them before
/// parsing.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.trim_start().strip_suffix("```").unwrap_or(inner).trim()
}
