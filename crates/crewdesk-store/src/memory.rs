// SPDX-FileCopyrightText: 2026 Crewdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store backed by `BTreeMap`s behind a single async mutex.
//!
//! Identifiers are assigned from per-entity counters, so `BTreeMap` iteration
//! order equals creation order and [`Store::get_messages`] needs no separate
//! sort key. The single mutex makes every operation a critical section, which
//! gives multi-channel callers the "last write wins, no lost updates"
//! guarantee without per-conversation locks.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crewdesk_core::error::CrewdeskError;
use crewdesk_core::types::{
    Conversation, ConversationPatch, ConversationStatus, CrmRecord, Faq, FaqPatch, Message,
    NewConversation, NewCrmRecord, NewFaq, NewMessage, PopularSearch, DEFAULT_LANGUAGE,
};
use crewdesk_core::Store;

/// Popular-search entries older than this are evicted on every write.
const SEARCH_EVICTION_WINDOW_HOURS: i64 = 24;

#[derive(Default)]
struct State {
    conversations: BTreeMap<i64, Conversation>,
    messages: BTreeMap<i64, Message>,
    faqs: BTreeMap<i64, Faq>,
    crm: HashMap<String, CrmRecord>,
    popular: Vec<PopularSearch>,
    /// Latest message timestamp per conversation, for monotonic stamping.
    last_message_at: HashMap<i64, DateTime<Utc>>,
    next_conversation_id: i64,
    next_message_id: i64,
    next_faq_id: i64,
    next_crm_id: i64,
}

impl State {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// In-memory [`Store`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites the `last_seen` timestamp of a popular-search entry, so
    /// tests can exercise the eviction window without waiting 24 hours.
    #[cfg(test)]
    async fn backdate_search(&self, query: &str, last_seen: DateTime<Utc>) {
        let mut state = self.state.lock().await;
        let needle = query.to_lowercase();
        if let Some(entry) = state
            .popular
            .iter_mut()
            .find(|e| e.query.to_lowercase() == needle)
        {
            entry.last_seen = last_seen;
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_conversation(
        &self,
        new: NewConversation,
    ) -> Result<Conversation, CrewdeskError> {
        let mut state = self.state.lock().await;
        let id = State::next_id(&mut state.next_conversation_id);
        let conversation = Conversation {
            id,
            customer_id: new.customer_id,
            status: ConversationStatus::Active,
            language: new.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            summary: None,
            context_memory: serde_json::json!({}),
            settings: new.settings.unwrap_or_default(),
        };
        state.conversations.insert(id, conversation.clone());
        debug!(conversation_id = id, "created conversation");
        Ok(conversation)
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>, CrewdeskError> {
        let state = self.state.lock().await;
        Ok(state.conversations.get(&id).cloned())
    }

    async fn update_conversation(
        &self,
        id: i64,
        patch: ConversationPatch,
    ) -> Result<Conversation, CrewdeskError> {
        let mut state = self.state.lock().await;
        let conversation = state
            .conversations
            .get_mut(&id)
            .ok_or_else(|| CrewdeskError::not_found("conversation", id))?;

        if let Some(status) = patch.status {
            conversation.status = status;
        }
        if let Some(language) = patch.language {
            conversation.language = language;
        }
        if let Some(summary) = patch.summary {
            conversation.summary = summary;
        }
        if let Some(context_memory) = patch.context_memory {
            conversation.context_memory = context_memory;
        }
        if let Some(settings) = &patch.settings {
            conversation.settings.apply(settings);
        }
        Ok(conversation.clone())
    }

    async fn create_message(&self, new: NewMessage) -> Result<Message, CrewdeskError> {
        let mut state = self.state.lock().await;
        let id = State::next_id(&mut state.next_message_id);

        // Wall clocks can step backwards; clamp so timestamps never decrease
        // within a conversation.
        let mut created_at = Utc::now();
        if let Some(last) = state.last_message_at.get(&new.conversation_id) {
            if created_at < *last {
                created_at = *last;
            }
        }
        state.last_message_at.insert(new.conversation_id, created_at);

        let message = Message {
            id,
            conversation_id: new.conversation_id,
            content: new.content,
            role: new.role,
            created_at,
            attachment: new.attachment,
            language: new.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            sentiment: None,
            suggestions: new.suggestions,
            needs_human_review: new.needs_human_review,
        };
        state.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn get_messages(&self, conversation_id: i64) -> Result<Vec<Message>, CrewdeskError> {
        let state = self.state.lock().await;
        Ok(state
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn create_faq(&self, new: NewFaq) -> Result<Faq, CrewdeskError> {
        let mut state = self.state.lock().await;
        let id = State::next_id(&mut state.next_faq_id);
        let faq = Faq {
            id,
            question: new.question,
            answer: new.answer,
            enabled: true,
            language: new.language.or_else(|| Some(DEFAULT_LANGUAGE.to_string())),
            category: new.category,
        };
        state.faqs.insert(id, faq.clone());
        Ok(faq)
    }

    async fn get_faqs(&self, language: Option<&str>) -> Result<Vec<Faq>, CrewdeskError> {
        let state = self.state.lock().await;
        Ok(state
            .faqs
            .values()
            .filter(|faq| match (language, faq.language.as_deref()) {
                (None, _) => true,
                // An unset language on a FAQ matches every requested language.
                (Some(_), None) => true,
                (Some(requested), Some(lang)) => lang == requested,
            })
            .cloned()
            .collect())
    }

    async fn update_faq(&self, id: i64, patch: FaqPatch) -> Result<Faq, CrewdeskError> {
        let mut state = self.state.lock().await;
        let faq = state
            .faqs
            .get_mut(&id)
            .ok_or_else(|| CrewdeskError::not_found("faq", id))?;

        if let Some(question) = patch.question {
            faq.question = question;
        }
        if let Some(answer) = patch.answer {
            faq.answer = answer;
        }
        if let Some(enabled) = patch.enabled {
            faq.enabled = enabled;
        }
        if let Some(language) = patch.language {
            faq.language = Some(language);
        }
        if let Some(category) = patch.category {
            faq.category = Some(category);
        }
        Ok(faq.clone())
    }

    async fn delete_faq(&self, id: i64) -> Result<(), CrewdeskError> {
        let mut state = self.state.lock().await;
        state.faqs.remove(&id);
        Ok(())
    }

    async fn get_crm_record(
        &self,
        customer_id: &str,
    ) -> Result<Option<CrmRecord>, CrewdeskError> {
        let state = self.state.lock().await;
        Ok(state.crm.get(customer_id).cloned())
    }

    async fn create_crm_record(&self, new: NewCrmRecord) -> Result<CrmRecord, CrewdeskError> {
        let mut state = self.state.lock().await;
        let id = State::next_id(&mut state.next_crm_id);
        let record = CrmRecord {
            id,
            customer_id: new.customer_id.clone(),
            name: new.name,
            email: new.email,
            details: new.details,
            preferred_language: new
                .preferred_language
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        };
        state.crm.insert(new.customer_id, record.clone());
        Ok(record)
    }

    async fn track_search(&self, query: &str) -> Result<(), CrewdeskError> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let needle = query.to_lowercase();

        match state
            .popular
            .iter_mut()
            .find(|e| e.query.to_lowercase() == needle)
        {
            Some(entry) => {
                entry.count += 1;
                entry.last_seen = now;
            }
            None => state.popular.push(PopularSearch {
                query: query.to_string(),
                count: 1,
                last_seen: now,
            }),
        }

        let cutoff = now - Duration::hours(SEARCH_EVICTION_WINDOW_HOURS);
        state.popular.retain(|e| e.last_seen >= cutoff);
        Ok(())
    }

    async fn get_popular_searches(
        &self,
        limit: usize,
    ) -> Result<Vec<PopularSearch>, CrewdeskError> {
        let state = self.state.lock().await;
        let mut ranked = state.popular.clone();
        // Stable sort keeps ties in insertion/update order.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        Ok(ranked)
    }
}
