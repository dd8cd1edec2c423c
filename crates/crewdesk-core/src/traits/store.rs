// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for conversation, message, FAQ, CRM, and popular-search data.

use async_trait::async_trait;

use crate::error::CrewdeskError;
use crate::types::{
    Conversation, ConversationPatch, CrmRecord, Faq, FaqPatch, Message, NewConversation,
    NewCrmRecord, NewFaq, NewMessage, PopularSearch,
};

/// Persistence seam for all Crewdesk entities.
///
/// Identifiers are assigned by the implementation, monotonically increasing
/// per entity kind, unique within a process lifetime, and never reused.
/// Implementations must make each operation atomic: a multi-threaded backend
/// needs mutual exclusion around read-modify-write sequences so concurrent
/// channels cannot lose updates.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates a conversation, applying defaults for unset fields
    /// (status active, language "en", empty summary and context memory).
    async fn create_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, CrewdeskError>;

    /// Looks up a conversation by id. A miss is not an error.
    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, CrewdeskError>;

    /// Merges partial fields into an existing conversation.
    ///
    /// Fails with [`CrewdeskError::NotFound`] when the id is unknown.
    async fn update_conversation(
        &self,
        id: i64,
        patch: ConversationPatch,
    ) -> Result<Conversation, CrewdeskError>;

    /// Creates a message, stamping the current time. Timestamps are
    /// non-decreasing within a conversation.
    async fn create_message(&self, new: NewMessage) -> Result<Message, CrewdeskError>;

    /// Returns all messages for a conversation in insertion order.
    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, CrewdeskError>;

    /// Creates a FAQ. Entries are always created enabled.
    async fn create_faq(&self, new: NewFaq) -> Result<Faq, CrewdeskError>;

    /// Returns all FAQs, or when a language is given, FAQs whose language is
    /// unset or equal to the requested one.
    async fn get_faqs(&self, language: Option<&str>) -> Result<Vec<Faq>, CrewdeskError>;

    /// Merges partial fields into an existing FAQ.
    ///
    /// Fails with [`CrewdeskError::NotFound`] when the id is unknown.
    async fn update_faq(&self, id: i64, patch: FaqPatch) -> Result<Faq, CrewdeskError>;

    /// Removes a FAQ if present. Deleting an unknown id is not an error.
    async fn delete_faq(&self, id: i64) -> Result<(), CrewdeskError>;

    /// Looks up a CRM record by customer id (not by internal id).
    async fn get_crm_record(
        &self,
        customer_id: &str,
    ) -> Result<Option<CrmRecord>, CrewdeskError>;

    /// Creates a CRM record keyed by customer id; last write wins on
    /// duplicate customer ids.
    async fn create_crm_record(&self, new: NewCrmRecord) -> Result<CrmRecord, CrewdeskError>;

    /// Records a search query: case-insensitive increment on match, append
    /// otherwise, then evicts entries older than 24 hours.
    async fn track_search(&self, query: &str) -> Result<(), CrewdeskError>;

    /// Snapshot of the ranking sorted by descending count, truncated to
    /// `limit`. Reads never evict; eviction only happens on writes.
    async fn get_popular_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularSearch>, CrewdeskError>;
}
