//! Offline policy engine
//!
//! Routes each query to the network, the response cache or the pending
//! queue depending on connectivity, keeps the active chat transcript, and
//! replays queued queries once a connection is available. Identical queries
//! submitted while one is in flight share its outcome.

use crate::error::{Result, SaathiError};
use crate::language::Language;
use crate::offline::client::CoachApi;
use crate::offline::connectivity::Connectivity;
use crate::prompts::{connection_failure_notice, offline_notice};
use crate::providers::ChatMessage;
use crate::storage::{normalize_query, LocalStore, PendingQuery};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{oneshot, Mutex};

/// Where a response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    /// Answered by the coaching API
    Network,
    /// Served from the local response cache while offline
    Cache,
    /// Queued for later; the text is the offline notice
    Queued,
    /// The API could not be reached; the text is the failure notice
    NetworkError,
}

impl ResponseSource {
    /// Lowercase label for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Cache => "cache",
            Self::Queued => "queued",
            Self::NetworkError => "network_error",
        }
    }
}

/// Result of handling one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Text shown to the teacher
    pub response: String,
    /// Where the text came from
    pub source: ResponseSource,
    /// Whether this call reused the outcome of an identical in-flight query
    pub coalesced: bool,
}

/// Result of a pending-queue sync pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncReport {
    /// Queries answered and removed from the queue, with their answers
    pub answered: Vec<(PendingQuery, String)>,
    /// Queries still queued after the pass
    pub remaining: usize,
    /// Whether the pass stopped at a failed request
    pub stopped_on_error: bool,
    /// Whether the pass was skipped because the client is offline
    pub skipped_offline: bool,
}

#[derive(Debug, Default)]
struct ActiveSession {
    id: Option<u64>,
    messages: Vec<ChatMessage>,
}

type Waiters = Vec<oneshot::Sender<QueryOutcome>>;

/// Removes the in-flight record when the leading request ends, including
/// when its future is dropped before completion.
struct InFlightGuard<'a> {
    in_flight: &'a StdMutex<HashMap<String, Waiters>>,
    key: String,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn complete(mut self, outcome: &QueryOutcome) {
        self.armed = false;
        let waiters = lock_in_flight(self.in_flight).remove(&self.key);
        for waiter in waiters.into_iter().flatten() {
            let _ = waiter.send(outcome.clone());
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock_in_flight(self.in_flight).remove(&self.key);
        }
    }
}

fn lock_in_flight(
    in_flight: &StdMutex<HashMap<String, Waiters>>,
) -> std::sync::MutexGuard<'_, HashMap<String, Waiters>> {
    match in_flight.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Offline-first query router
pub struct OfflineEngine {
    api: Arc<dyn CoachApi>,
    store: Arc<dyn LocalStore>,
    connectivity: Arc<Connectivity>,
    language: Language,
    session: Mutex<ActiveSession>,
    in_flight: StdMutex<HashMap<String, Waiters>>,
}

impl OfflineEngine {
    /// Create an engine without touching the store
    pub fn new(
        api: Arc<dyn CoachApi>,
        store: Arc<dyn LocalStore>,
        connectivity: Arc<Connectivity>,
        language: Language,
    ) -> Self {
        Self {
            api,
            store,
            connectivity,
            language,
            session: Mutex::new(ActiveSession::default()),
            in_flight: StdMutex::new(HashMap::new()),
        }
    }

    /// Create an engine and sweep cache entries older than `cache_ttl_days`
    ///
    /// A failed sweep is logged and does not prevent opening.
    pub fn open(
        api: Arc<dyn CoachApi>,
        store: Arc<dyn LocalStore>,
        connectivity: Arc<Connectivity>,
        language: Language,
        cache_ttl_days: u32,
    ) -> Self {
        let engine = Self::new(api, store, connectivity, language);
        match engine
            .store
            .sweep_cache_older_than_at(cache_ttl_days, Utc::now())
        {
            Ok(0) => {}
            Ok(removed) => tracing::debug!("Swept {} stale cache entries on open", removed),
            Err(e) => tracing::warn!("Cache sweep failed: {}", e),
        }
        engine
    }

    /// Connectivity source driving routing decisions
    pub fn connectivity(&self) -> &Arc<Connectivity> {
        &self.connectivity
    }

    /// Language used for notices
    pub fn language(&self) -> Language {
        self.language
    }

    /// Handle a teacher's query
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Validation` for empty or whitespace-only input;
    /// no other failure is surfaced.
    pub async fn handle_query(&self, query: &str) -> Result<QueryOutcome> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(SaathiError::Validation("Query is required".to_string()).into());
        }

        let key = normalize_query(trimmed);
        loop {
            let waiter = {
                let mut in_flight = lock_in_flight(&self.in_flight);
                match in_flight.get_mut(&key) {
                    Some(waiters) => {
                        let (tx, rx) = oneshot::channel();
                        waiters.push(tx);
                        Some(rx)
                    }
                    None => {
                        in_flight.insert(key.clone(), Vec::new());
                        None
                    }
                }
            };

            let Some(rx) = waiter else {
                break;
            };
            match rx.await {
                Ok(outcome) => {
                    tracing::debug!("Coalesced duplicate query");
                    return Ok(QueryOutcome {
                        coalesced: true,
                        ..outcome
                    });
                }
                Err(_) => tracing::debug!("Leading request abandoned, retrying"),
            }
        }

        let guard = InFlightGuard {
            in_flight: &self.in_flight,
            key,
            armed: true,
        };
        let outcome = self.run_query(trimmed).await;
        guard.complete(&outcome);
        Ok(outcome)
    }

    async fn run_query(&self, query: &str) -> QueryOutcome {
        let (response, source) = if self.connectivity.is_online() {
            let history = self.session.lock().await.messages.clone();
            match self.api.ask(query, &history, self.language).await {
                Ok(answer) => {
                    if let Err(e) = self.store.cache_response(query, &answer.response) {
                        tracing::warn!("Failed to cache response: {}", e);
                    }
                    (answer.response, ResponseSource::Network)
                }
                Err(e) => {
                    tracing::warn!("Coaching request failed: {}", e);
                    (
                        connection_failure_notice(self.language).to_string(),
                        ResponseSource::NetworkError,
                    )
                }
            }
        } else {
            let cached = self.store.cached_response(query).unwrap_or_else(|e| {
                tracing::warn!("Cache lookup failed: {}", e);
                None
            });
            match cached {
                Some(entry) => (entry.response, ResponseSource::Cache),
                None => {
                    if let Err(e) = self.store.enqueue_pending(query) {
                        tracing::warn!("Failed to queue query: {}", e);
                    }
                    (
                        offline_notice(self.language).to_string(),
                        ResponseSource::Queued,
                    )
                }
            }
        };

        self.record_exchange(query, &response).await;

        QueryOutcome {
            response,
            source,
            coalesced: false,
        }
    }

    async fn record_exchange(&self, query: &str, response: &str) {
        let mut session = self.session.lock().await;
        session.messages.push(ChatMessage::user(query));
        session.messages.push(ChatMessage::assistant(response));

        let existing = session.id;
        let persisted = match existing {
            Some(id) => self.store.update_chat(id, &session.messages),
            None => self.store.save_chat(&session.messages).map(|id| {
                session.id = Some(id);
            }),
        };
        if let Err(e) = persisted {
            tracing::warn!("Failed to persist chat session: {}", e);
        }
    }

    /// Start a fresh session; the next completed query creates a new record
    pub async fn new_chat(&self) {
        *self.session.lock().await = ActiveSession::default();
    }

    /// Make a stored session the active one
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::NotFound` if no session has that id, or the
    /// store error if it cannot be read
    pub async fn resume_chat(&self, id: u64) -> Result<()> {
        let stored = self
            .store
            .get_chat(id)?
            .ok_or_else(|| SaathiError::NotFound(format!("Chat session {}", id)))?;

        *self.session.lock().await = ActiveSession {
            id: Some(stored.id),
            messages: stored.messages,
        };
        Ok(())
    }

    /// Resume the most recently created session, if any
    pub async fn resume_latest(&self) -> Result<Option<u64>> {
        let Some(latest) = self.store.all_chats()?.pop() else {
            return Ok(None);
        };
        let id = latest.id;
        *self.session.lock().await = ActiveSession {
            id: Some(id),
            messages: latest.messages,
        };
        Ok(Some(id))
    }

    /// Snapshot of the active transcript
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.lock().await.messages.clone()
    }

    /// Id of the active stored session, once it has been persisted
    pub async fn active_chat_id(&self) -> Option<u64> {
        self.session.lock().await.id
    }

    /// Replay queued queries through the API in insertion order
    ///
    /// Each success is cached and removed from the queue. The first failure
    /// stops the pass, leaving it and every later query queued. Offline the
    /// pass is skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the queue cannot be read
    pub async fn sync_pending(&self) -> Result<SyncReport> {
        if !self.connectivity.is_online() {
            let remaining = self.store.pending_queries()?.len();
            return Ok(SyncReport {
                remaining,
                skipped_offline: true,
                ..SyncReport::default()
            });
        }

        let pending = self.store.pending_queries()?;
        let total = pending.len();
        let mut report = SyncReport::default();

        for item in pending {
            match self.api.ask(&item.query, &[], self.language).await {
                Ok(answer) => {
                    if let Err(e) = self.store.cache_response(&item.query, &answer.response) {
                        tracing::warn!("Failed to cache synced response: {}", e);
                    }
                    if let Err(e) = self.store.remove_pending(item.id) {
                        tracing::warn!("Failed to remove synced query {}: {}", item.id, e);
                    }
                    report.answered.push((item, answer.response));
                }
                Err(e) => {
                    tracing::warn!("Sync stopped at query {}: {}", item.id, e);
                    report.stopped_on_error = true;
                    break;
                }
            }
        }

        report.remaining = total - report.answered.len();
        tracing::info!(
            "Synced {} pending queries, {} remaining",
            report.answered.len(),
            report.remaining
        );
        Ok(report)
    }
}
