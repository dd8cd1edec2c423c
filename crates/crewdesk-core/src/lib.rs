// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Crewdesk customer-support service.
//!
//! This crate provides the domain model, the shared error type, and the trait
//! seams between the gateway, the store, and the completion provider. The
//! other workspace crates depend on these definitions rather than on each
//! other's concrete types.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CrewdeskError;
pub use traits::{CompletionProvider, Store};
pub use types::{
    Attachment, Conversation, ConversationPatch, ConversationSettings, ConversationStatus,
    CrmRecord, Faq, FaqMatch, FaqPatch, Message, MessageRole, NewConversation, NewCrmRecord,
    NewFaq, NewMessage, PopularSearch, ReplySource, SettingsPatch, DEFAULT_LANGUAGE,
};
