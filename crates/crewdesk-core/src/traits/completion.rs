// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion provider trait wrapping the hosted language-model service.

use async_trait::async_trait;

use crate::error::CrewdeskError;
use crate::types::{Faq, FaqMatch, Message};

/// The four generation tasks Crewdesk delegates to a hosted model, plus
/// language detection.
///
/// Degradation policy is part of the contract: only [`generate_reply`] is
/// allowed to fail. The other operations absorb transport and parse errors
/// internally (logging them) and return a best-effort fallback, so a flaky
/// provider degrades the experience instead of breaking the channel.
///
/// [`generate_reply`]: CompletionProvider::generate_reply
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Detects the ISO 639-1 language code of `text`.
    ///
    /// Falls back to `"en"` on any failure; never fatal.
    async fn detect_language(&self, text: &str) -> String;

    /// Asks the model whether any of `faqs` answers `message`.
    ///
    /// Returns `None` when the call or the structured parse fails; the
    /// caller then proceeds to free-form generation. The caller is also
    /// responsible for applying its confidence threshold to a `Some` result.
    async fn match_faq(&self, message: &str, faqs: &[Faq]) -> Option<FaqMatch>;

    /// Generates a free-form assistant reply conditioned on the conversation
    /// history and the latest stored summary.
    ///
    /// This is the one fatal path: errors propagate to the protocol handler,
    /// which reports them as an `error` event.
    async fn generate_reply(
        &self,
        history: &[Message],
        context_summary: Option<&str>,
        language: &str,
    ) -> Result<String, CrewdeskError>;

    /// Asks for exactly three short follow-up suggestions for `reply`.
    ///
    /// Degrades to an empty list on failure.
    async fn generate_suggestions(&self, reply: &str) -> Vec<String>;

    /// Produces a one-paragraph summary of the conversation so far.
    ///
    /// Degrades to `None` on failure.
    async fn summarize(&self, history: &[Message]) -> Option<String>;
}
