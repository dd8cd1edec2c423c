// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket channel: JSON event envelopes and the per-connection loop.
//!
//! Client -> Server (JSON):
//! ```json
//! {"type": "start_conversation", "payload": {"customerId": "CUST001"}}
//! {"type": "message", "payload": {"content": "How do I reset my password?"}}
//! {"type": "update_settings", "payload": {"settings": {"voiceEnabled": true}}}
//! {"type": "typing"}
//! ```
//!
//! Server -> Client (JSON):
//! ```json
//! {"type": "conversation_started", "payload": {"conversationId": 1, "messages": [...], "settings": {...}}}
//! {"type": "message", "payload": {"message": {...}, "source": "faq", "confidence": 0.93}}
//! {"type": "typing"}
//! {"type": "error", "payload": {"message": "..."}}
//! ```

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crewdesk_core::types::{
    Attachment, Conversation, ConversationSettings, Message, ReplySource, SettingsPatch,
};
use crewdesk_core::CrewdeskError;

use crate::server::AppState;
use crate::session::SessionHandler;

/// Raw event envelope; the payload is decoded per event kind so an unknown
/// kind can be reported with the exact offending type name.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

/// Payload of an inbound `start_conversation` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationPayload {
    pub customer_id: String,
    #[serde(default)]
    pub settings: Option<ConversationSettings>,
}

/// Payload of an inbound `message` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub content: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

/// Payload of an inbound `update_settings` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    pub settings: SettingsPatch,
}

/// A typed inbound event from the client.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    StartConversation(StartConversationPayload),
    Message(MessagePayload),
    UpdateSettings(UpdateSettingsPayload),
    Typing,
    StopTyping,
}

/// Parses one inbound frame into a [`ClientEvent`].
///
/// Unknown event kinds fail with `unknown message type: <kind>`.
pub fn parse_client_event(text: &str) -> Result<ClientEvent, CrewdeskError> {
    let envelope: RawEnvelope = serde_json::from_str(text).map_err(|e| CrewdeskError::Channel {
        message: format!("malformed event: {e}"),
        source: Some(Box::new(e)),
    })?;

    fn payload<T: serde::de::DeserializeOwned>(
        kind: &str,
        value: serde_json::Value,
    ) -> Result<T, CrewdeskError> {
        serde_json::from_value(value).map_err(|e| CrewdeskError::Channel {
            message: format!("invalid payload for {kind}: {e}"),
            source: Some(Box::new(e)),
        })
    }

    match envelope.kind.as_str() {
        "start_conversation" => Ok(ClientEvent::StartConversation(payload(
            "start_conversation",
            envelope.payload,
        )?)),
        "message" => Ok(ClientEvent::Message(payload("message", envelope.payload)?)),
        "update_settings" => Ok(ClientEvent::UpdateSettings(payload(
            "update_settings",
            envelope.payload,
        )?)),
        "typing" => Ok(ClientEvent::Typing),
        "stop_typing" => Ok(ClientEvent::StopTyping),
        other => Err(CrewdeskError::Channel {
            message: format!("unknown message type: {other}"),
            source: None,
        }),
    }
}

/// Payload of an outbound `conversation_started` event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStartedPayload {
    pub conversation_id: i64,
    pub messages: Vec<Message>,
    pub settings: ConversationSettings,
}

/// Payload of an outbound `message` event.
///
/// The reply metadata fields are only present on assistant replies; the echo
/// of a user message carries just the message itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEventPayload {
    pub message: Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ReplySource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_human_review: Option<bool>,
}

impl MessageEventPayload {
    /// An echo of a persisted user message, without reply metadata.
    pub fn echo(message: Message) -> Self {
        Self {
            message,
            source: None,
            confidence: None,
            suggestions: None,
            needs_human_review: None,
        }
    }
}

/// Payload of an outbound `settings_updated` event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdatedPayload {
    pub settings: ConversationSettings,
}

/// Payload of an outbound `error` event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
}

/// A typed outbound event to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ServerEvent {
    ConversationStarted(ConversationStartedPayload),
    Message(MessageEventPayload),
    Typing,
    StopTyping,
    SettingsUpdated(SettingsUpdatedPayload),
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Event kind name, for logging and test assertions.
    pub fn kind(&self) -> &'static str {
        match self {
            ServerEvent::ConversationStarted(_) => "conversation_started",
            ServerEvent::Message(_) => "message",
            ServerEvent::Typing => "typing",
            ServerEvent::StopTyping => "stop_typing",
            ServerEvent::SettingsUpdated(_) => "settings_updated",
            ServerEvent::Error(_) => "error",
        }
    }

    pub(crate) fn started(conversation: &Conversation, messages: Vec<Message>) -> Self {
        ServerEvent::ConversationStarted(ConversationStartedPayload {
            conversation_id: conversation.id,
            messages,
            settings: conversation.settings.clone(),
        })
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
///
/// A sender task forwards serialized [`ServerEvent`]s to the client while the
/// receive loop feeds inbound frames to one [`SessionHandler`]. Events are
/// handled to completion one at a time, so a second frame on the same channel
/// waits for the previous one's store and completion calls to finish.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerEvent>(64);

    let sender_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(e) => {
                    error!(error = %e, "failed to serialize outbound event");
                    continue;
                }
            };
            if ws_sender.send(WsMessage::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    let mut session = SessionHandler::new(state.store.clone(), state.completion.clone());

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            WsMessage::Text(text) => session.handle_text(&text, &tx).await,
            WsMessage::Close(_) => break,
            _ => {} // Ignore binary and ping frames.
        }
    }

    debug!("websocket closed");
    drop(tx);
    let _ = sender_task.await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_start_conversation_with_minimal_payload() {
        let event = parse_client_event(
            r#"{"type": "start_conversation", "payload": {"customerId": "CUST001"}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::StartConversation(payload) => {
                assert_eq!(payload.customer_id, "CUST001");
                assert!(payload.settings.is_none());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_message_with_attachment() {
        let event = parse_client_event(
            r#"{"type": "message", "payload": {"content": "see this",
                "attachment": {"mimeType": "image/png", "data": "aGk="}}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::Message(payload) => {
                assert_eq!(payload.content, "see this");
                assert_eq!(payload.attachment.unwrap().mime_type, "image/png");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn typing_events_need_no_payload() {
        assert!(matches!(
            parse_client_event(r#"{"type": "typing"}"#).unwrap(),
            ClientEvent::Typing
        ));
        assert!(matches!(
            parse_client_event(r#"{"type": "stop_typing", "payload": {}}"#).unwrap(),
            ClientEvent::StopTyping
        ));
    }

    #[test]
    fn unknown_kind_reports_the_offending_type() {
        let err = parse_client_event(r#"{"type": "bogus", "payload": {}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown message type: bogus"));
    }

    #[test]
    fn malformed_json_is_a_channel_error() {
        let err = parse_client_event("{not json").unwrap_err();
        assert!(err.to_string().contains("malformed event"));
    }

    #[test]
    fn server_events_serialize_as_envelopes() {
        let json = serde_json::to_value(&ServerEvent::Typing).unwrap();
        assert_eq!(json, serde_json::json!({"type": "typing"}));

        let json = serde_json::to_value(&ServerEvent::Error(ErrorPayload {
            message: "boom".into(),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "error", "payload": {"message": "boom"}})
        );
    }

    #[test]
    fn echo_payload_skips_reply_metadata() {
        use crewdesk_core::types::MessageRole;
        let message = Message {
            id: 1,
            conversation_id: 1,
            content: "hi".into(),
            role: MessageRole::User,
            created_at: chrono_now(),
            attachment: None,
            language: "en".into(),
            sentiment: None,
            suggestions: None,
            needs_human_review: false,
        };
        let json = serde_json::to_value(&ServerEvent::Message(MessageEventPayload::echo(message)))
            .unwrap();
        assert!(json["payload"].get("source").is_none());
        assert!(json["payload"].get("confidence").is_none());
        assert_eq!(json["payload"]["message"]["content"], "hi");
    }

    fn chrono_now() -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}
