// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model shared across the Crewdesk workspace.
//!
//! All wire-facing structs serialize with camelCase field names to match the
//! JSON the browser client exchanges over the WebSocket channel and REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default ISO 639-1 language code applied wherever a language is unset.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Lifecycle status of a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConversationStatus {
    #[default]
    Active,
    Closed,
}

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Per-conversation behavior settings chosen by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSettings {
    /// Personality label passed through to reply generation.
    #[serde(default)]
    pub personality: Option<String>,
    /// Whether the client wants voice output enabled.
    #[serde(default)]
    pub voice_enabled: bool,
}

/// Partial settings update; unset fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub voice_enabled: Option<bool>,
}

impl ConversationSettings {
    /// Merges a partial update into these settings, field by field.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(personality) = &patch.personality {
            self.personality = Some(personality.clone());
        }
        if let Some(voice_enabled) = patch.voice_enabled {
            self.voice_enabled = voice_enabled;
        }
    }
}

/// One customer-support conversation.
///
/// Created on session start, mutated on every inbound user message (summary
/// and context refresh) and on settings updates. Never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: i64,
    /// Foreign reference to a CRM record; not enforced.
    pub customer_id: String,
    pub status: ConversationStatus,
    /// ISO 639-1 code, default "en".
    pub language: String,
    /// Latest summary produced by the completion provider.
    pub summary: Option<String>,
    /// Opaque blob carrying the latest summary for prompt conditioning.
    pub context_memory: serde_json::Value,
    pub settings: ConversationSettings,
}

/// Fields supplied when creating a conversation; the store fills defaults.
#[derive(Debug, Clone, Default)]
pub struct NewConversation {
    pub customer_id: String,
    pub language: Option<String>,
    pub settings: Option<ConversationSettings>,
}

/// Partial conversation update; unset fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ConversationPatch {
    pub status: Option<ConversationStatus>,
    pub language: Option<String>,
    pub summary: Option<Option<String>>,
    pub context_memory: Option<serde_json::Value>,
    pub settings: Option<SettingsPatch>,
}

/// An inline file attachment carried on a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub mime_type: String,
    /// Inline payload, base64-encoded by the client.
    pub data: String,
}

/// One message in a conversation. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub content: String,
    pub role: MessageRole,
    /// Stamped by the store at persist time; non-decreasing per conversation.
    pub created_at: DateTime<Utc>,
    pub attachment: Option<Attachment>,
    pub language: String,
    /// Reserved; never set in the current scope.
    pub sentiment: Option<String>,
    /// Ordered follow-up suggestions attached to assistant replies.
    pub suggestions: Option<Vec<String>>,
    pub needs_human_review: bool,
}

/// Fields supplied when creating a message; the store fills defaults.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: i64,
    pub content: String,
    pub role: MessageRole,
    pub attachment: Option<Attachment>,
    pub language: Option<String>,
    pub suggestions: Option<Vec<String>>,
    pub needs_human_review: bool,
}

impl NewMessage {
    /// A plain message with just a conversation, role, and content.
    pub fn text(conversation_id: i64, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: content.into(),
            role,
            attachment: None,
            language: None,
            suggestions: None,
            needs_human_review: false,
        }
    }
}

/// A frequently-asked-question entry, managed over the REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub enabled: bool,
    /// Unset means the entry matches every requested language.
    pub language: Option<String>,
    pub category: Option<String>,
}

/// Fields supplied when creating a FAQ.
#[derive(Debug, Clone, Default)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    pub language: Option<String>,
    pub category: Option<String>,
}

/// Partial FAQ update; unset fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub enabled: Option<bool>,
    pub language: Option<String>,
    pub category: Option<String>,
}

/// A mock CRM record, seeded at startup and read-only at runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmRecord {
    pub id: i64,
    /// Unique lookup key; last write wins on duplicates.
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub details: serde_json::Value,
    pub preferred_language: String,
}

/// Fields supplied when seeding a CRM record.
#[derive(Debug, Clone)]
pub struct NewCrmRecord {
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub details: serde_json::Value,
    pub preferred_language: Option<String>,
}

/// One entry in the ephemeral popular-search ranking.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSearch {
    /// First-seen casing; matching is case-insensitive.
    pub query: String,
    pub count: u64,
    pub last_seen: DateTime<Utc>,
}

/// Structured result of asking the model whether a FAQ answers a message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqMatch {
    pub matched: bool,
    /// Model-reported confidence in [0, 1].
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub needs_human_review: bool,
}

/// Where an assistant reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReplySource {
    Faq,
    Generated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_apply_merges_field_wise() {
        let mut settings = ConversationSettings {
            personality: Some("formal".into()),
            voice_enabled: false,
        };
        settings.apply(&SettingsPatch {
            personality: None,
            voice_enabled: Some(true),
        });
        assert_eq!(settings.personality.as_deref(), Some("formal"));
        assert!(settings.voice_enabled);
    }

    #[test]
    fn conversation_serializes_camel_case() {
        let conversation = Conversation {
            id: 1,
            customer_id: "CUST001".into(),
            status: ConversationStatus::Active,
            language: "en".into(),
            summary: None,
            context_memory: serde_json::json!({}),
            settings: ConversationSettings::default(),
        };
        let json = serde_json::to_string(&conversation).unwrap();
        assert!(json.contains("\"customerId\":\"CUST001\""));
        assert!(json.contains("\"status\":\"active\""));
        assert!(json.contains("\"contextMemory\":{}"));
    }

    #[test]
    fn message_role_round_trips() {
        use std::str::FromStr;
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            let parsed = MessageRole::from_str(&role.to_string()).unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn faq_match_deserializes_partial_payload() {
        let m: FaqMatch = serde_json::from_str(r#"{"matched": true, "confidence": 0.93}"#).unwrap();
        assert!(m.matched);
        assert!(m.answer.is_none());
        assert!(m.suggestions.is_empty());
        assert!(!m.needs_human_review);
    }

    #[test]
    fn reply_source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ReplySource::Faq).unwrap(), "\"faq\"");
        assert_eq!(ReplySource::Generated.to_string(), "generated");
    }
}
