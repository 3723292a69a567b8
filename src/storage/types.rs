use crate::providers::{ChatMessage, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters of the first question used as a title
pub const TITLE_CHARS: usize = 50;

/// A stored coaching conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Monotonically increasing identifier
    pub id: u64,
    /// Title derived from the first question
    pub title: String,
    /// Ordered transcript
    pub messages: Vec<ChatMessage>,
    /// When the session was created
    pub timestamp: DateTime<Utc>,
    /// When the session was last written
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    /// Derive a session title from its transcript
    ///
    /// Uses the first user message (or the first message when there is
    /// none), cut to [`TITLE_CHARS`] characters and suffixed with `...`.
    pub fn derive_title(messages: &[ChatMessage]) -> String {
        let source = messages
            .iter()
            .find(|m| m.role == Role::User)
            .or_else(|| messages.first())
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        let mut title: String = source.chars().take(TITLE_CHARS).collect();
        title.push_str("...");
        title
    }
}

/// A cached coaching answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Normalized query (the cache key)
    pub query: String,
    /// Cached answer text
    pub response: String,
    /// When the answer was cached
    pub timestamp: DateTime<Utc>,
}

/// A query saved while offline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingQuery {
    /// Monotonically increasing identifier
    pub id: u64,
    /// Query text as typed
    pub query: String,
    /// When the query was queued
    pub timestamp: DateTime<Utc>,
}
