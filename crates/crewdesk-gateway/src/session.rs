// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-connection session protocol handler.
//!
//! One [`SessionHandler`] exists per WebSocket connection. It starts Unbound
//! (no conversation) and becomes Bound on the first `start_conversation`
//! event; there is no transition back. Errors raised while handling an event
//! are caught at the top level and reported as a single `error` event; the
//! socket itself is never closed from here.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crewdesk_core::types::{
    ConversationPatch, MessageRole, NewConversation, NewMessage, ReplySource,
};
use crewdesk_core::{CompletionProvider, CrewdeskError, Store};

use crate::ws::{
    ClientEvent, ErrorPayload, MessageEventPayload, MessagePayload, ServerEvent,
    SettingsUpdatedPayload, StartConversationPayload, UpdateSettingsPayload,
};

/// A FAQ verdict below this confidence falls through to free-form generation.
pub const FAQ_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Server-side state for one channel: the bound conversation (if any) and
/// the latest context-memory blob.
pub struct SessionHandler {
    store: Arc<dyn Store>,
    completion: Arc<dyn CompletionProvider>,
    conversation_id: Option<i64>,
    context_memory: serde_json::Value,
}

impl SessionHandler {
    pub fn new(store: Arc<dyn Store>, completion: Arc<dyn CompletionProvider>) -> Self {
        Self {
            store,
            completion,
            conversation_id: None,
            context_memory: serde_json::json!({}),
        }
    }

    /// Id of the bound conversation, if the channel is bound.
    pub fn conversation_id(&self) -> Option<i64> {
        self.conversation_id
    }

    /// Handles one raw inbound frame, emitting outbound events on `out`.
    ///
    /// This is the top-level catch point: any failure in parsing or
    /// dispatching becomes exactly one `error` event.
    pub async fn handle_text(&mut self, text: &str, out: &mpsc::Sender<ServerEvent>) {
        let result = match crate::ws::parse_client_event(text) {
            Ok(event) => self.dispatch(event, out).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(error = %e, "event handling failed");
            let _ = out
                .send(ServerEvent::Error(ErrorPayload {
                    message: e.to_string(),
                }))
                .await;
        }
    }

    async fn dispatch(
        &mut self,
        event: ClientEvent,
        out: &mpsc::Sender<ServerEvent>,
    ) -> Result<(), CrewdeskError> {
        match event {
            ClientEvent::StartConversation(payload) => {
                self.start_conversation(payload, out).await
            }
            ClientEvent::Message(payload) => self.handle_message(payload, out).await,
            ClientEvent::UpdateSettings(payload) => self.update_settings(payload, out).await,
            ClientEvent::Typing => self.emit(out, ServerEvent::Typing).await,
            ClientEvent::StopTyping => self.emit(out, ServerEvent::StopTyping).await,
        }
    }

    async fn start_conversation(
        &mut self,
        payload: StartConversationPayload,
        out: &mpsc::Sender<ServerEvent>,
    ) -> Result<(), CrewdeskError> {
        let crm = self.store.get_crm_record(&payload.customer_id).await?;
        let language = crm
            .as_ref()
            .map(|record| record.preferred_language.clone());

        let conversation = self
            .store
            .create_conversation(NewConversation {
                customer_id: payload.customer_id,
                language: language.clone(),
                settings: payload.settings,
            })
            .await?;

        let greeting = welcome_text(
            &conversation.language,
            crm.as_ref().map(|record| record.name.as_str()),
        );
        let welcome = self
            .store
            .create_message(NewMessage {
                language: Some(conversation.language.clone()),
                ..NewMessage::text(conversation.id, MessageRole::Assistant, greeting)
            })
            .await?;

        // A start on an already-bound channel is not guarded: it creates a
        // fresh conversation and silently rebinds, orphaning the old one.
        if let Some(previous) = self.conversation_id {
            warn!(
                previous_conversation = previous,
                new_conversation = conversation.id,
                "start_conversation on a bound channel, rebinding"
            );
        }
        self.conversation_id = Some(conversation.id);
        self.context_memory = conversation.context_memory.clone();

        debug!(conversation_id = conversation.id, "conversation started");
        self.emit(out, ServerEvent::started(&conversation, vec![welcome]))
            .await
    }

    async fn handle_message(
        &mut self,
        payload: MessagePayload,
        out: &mpsc::Sender<ServerEvent>,
    ) -> Result<(), CrewdeskError> {
        let conversation_id = self.conversation_id.ok_or_else(|| CrewdeskError::Channel {
            message: "no active conversation".to_string(),
            source: None,
        })?;

        if payload.content.trim().is_empty() {
            return Err(CrewdeskError::Invalid(
                "message content must not be empty".to_string(),
            ));
        }

        // Attachments ride along as an inline annotation in the text.
        let mut content = payload.content.clone();
        if let Some(attachment) = &payload.attachment {
            content.push_str(&format!("\n[attachment: {}]", attachment.mime_type));
        }

        let language = self.completion.detect_language(&content).await;

        let user_message = self
            .store
            .create_message(NewMessage {
                conversation_id,
                content,
                role: MessageRole::User,
                attachment: payload.attachment,
                language: Some(language.clone()),
                suggestions: None,
                needs_human_review: false,
            })
            .await?;

        // Immediate acknowledgement, then the typing indicator while the
        // reply is produced.
        self.emit(out, ServerEvent::Message(MessageEventPayload::echo(user_message.clone())))
            .await?;
        self.emit(out, ServerEvent::Typing).await?;

        // Feed the popular-search ranking with the raw query text.
        self.store.track_search(payload.content.trim()).await?;

        let history = self.store.get_messages(conversation_id).await?;
        let faqs: Vec<_> = self
            .store
            .get_faqs(Some(&language))
            .await?
            .into_iter()
            .filter(|faq| faq.enabled)
            .collect();

        let summary = self.completion.summarize(&history).await;

        let verdict = self
            .completion
            .match_faq(&user_message.content, &faqs)
            .await;

        let (reply_text, source, confidence, suggestions, needs_human_review) = match verdict {
            Some(v)
                if v.matched && v.confidence > FAQ_CONFIDENCE_THRESHOLD && v.answer.is_some() =>
            {
                let answer = v.answer.unwrap_or_default();
                (
                    answer,
                    ReplySource::Faq,
                    Some(v.confidence),
                    v.suggestions,
                    v.needs_human_review,
                )
            }
            _ => {
                // Free-form generation is the one fatal path: a failure here
                // propagates and surfaces as an error event.
                let reply = self
                    .completion
                    .generate_reply(&history, summary.as_deref(), &language)
                    .await?;
                let suggestions = self.completion.generate_suggestions(&reply).await;
                let needs_review = reply.contains("human");
                (
                    reply,
                    ReplySource::Generated,
                    None,
                    suggestions,
                    needs_review,
                )
            }
        };

        let assistant = self
            .store
            .create_message(NewMessage {
                conversation_id,
                content: reply_text,
                role: MessageRole::Assistant,
                attachment: None,
                language: Some(language),
                suggestions: if suggestions.is_empty() {
                    None
                } else {
                    Some(suggestions.clone())
                },
                needs_human_review,
            })
            .await?;

        // Refresh the stored summary and context memory. A degraded summary
        // keeps the previous context instead of erasing it.
        if let Some(summary) = summary {
            self.context_memory = serde_json::json!({ "lastSummary": summary });
            self.store
                .update_conversation(
                    conversation_id,
                    ConversationPatch {
                        summary: Some(Some(summary)),
                        context_memory: Some(self.context_memory.clone()),
                        ..Default::default()
                    },
                )
                .await?;
        }

        self.emit(
            out,
            ServerEvent::Message(MessageEventPayload {
                message: assistant,
                source: Some(source),
                confidence,
                suggestions: if suggestions.is_empty() {
                    None
                } else {
                    Some(suggestions)
                },
                needs_human_review: Some(needs_human_review),
            }),
        )
        .await
    }

    async fn update_settings(
        &mut self,
        payload: UpdateSettingsPayload,
        out: &mpsc::Sender<ServerEvent>,
    ) -> Result<(), CrewdeskError> {
        let conversation_id = self.conversation_id.ok_or_else(|| CrewdeskError::Channel {
            message: "no active conversation".to_string(),
            source: None,
        })?;

        let updated = self
            .store
            .update_conversation(
                conversation_id,
                ConversationPatch {
                    settings: Some(payload.settings),
                    ..Default::default()
                },
            )
            .await?;

        self.emit(
            out,
            ServerEvent::SettingsUpdated(SettingsUpdatedPayload {
                settings: updated.settings,
            }),
        )
        .await
    }

    async fn emit(
        &self,
        out: &mpsc::Sender<ServerEvent>,
        event: ServerEvent,
    ) -> Result<(), CrewdeskError> {
        out.send(event).await.map_err(|_| CrewdeskError::Channel {
            message: "outbound channel closed".to_string(),
            source: None,
        })
    }
}

/// Localized welcome text for the seeded locales; anything else greets in
/// English.
fn welcome_text(language: &str, name: Option<&str>) -> String {
    let name = name.map(|n| format!(" {n}")).unwrap_or_default();
    match language {
        "es" => format!("¡Hola{name}! ¿Cómo puedo ayudarte hoy?"),
        "fr" => format!("Bonjour{name} ! Comment puis-je vous aider aujourd'hui ?"),
        "de" => format!("Hallo{name}! Wie kann ich Ihnen heute helfen?"),
        _ => format!("Hello{name}! How can I help you today?"),
    }
}
