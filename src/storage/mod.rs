//! Local persistence store
//!
//! Four independent collections kept in an embedded `sled` database:
//! chat transcripts, the response cache (with a timestamp index backing
//! the TTL sweep), the pending-query queue and settings. A `meta` tree
//! records the schema version.

use crate::error::{Result, SaathiError};
use crate::providers::ChatMessage;
use chrono::{DateTime, Duration, Utc};
use sled::transaction::TransactionResult;
use sled::{Db, Transactional, Tree};
use std::path::Path;

pub mod types;
pub use types::{CacheEntry, ChatSession, PendingQuery, TITLE_CHARS};

/// Current on-disk schema version
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Normalize a query into its cache key (trimmed, lowercased)
///
/// # Examples
///
/// ```
/// use shikshak_saathi::storage::normalize_query;
///
/// assert_eq!(normalize_query("  Teaching ZERO "), "teaching zero");
/// assert_eq!(normalize_query(&normalize_query(" A b ")), normalize_query(" A b "));
/// ```
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Operations the offline engine and CLI need from local storage
///
/// Every operation returns `Result`; callers on the query path treat
/// failures as non-fatal.
#[cfg_attr(test, mockall::automock)]
pub trait LocalStore: Send + Sync {
    /// Create a chat session from a transcript, returning its id
    fn save_chat(&self, messages: &[ChatMessage]) -> Result<u64>;

    /// Replace the transcript of an existing session
    fn update_chat(&self, id: u64, messages: &[ChatMessage]) -> Result<()>;

    /// All sessions ordered by creation time
    fn all_chats(&self) -> Result<Vec<ChatSession>>;

    /// One session by id
    fn get_chat(&self, id: u64) -> Result<Option<ChatSession>>;

    /// Delete a session; returns whether it existed
    fn delete_chat(&self, id: u64) -> Result<bool>;

    /// Upsert a cached answer under the normalized query
    fn cache_response(&self, query: &str, response: &str) -> Result<()>;

    /// Look up a cached answer by normalized query
    fn cached_response(&self, query: &str) -> Result<Option<CacheEntry>>;

    /// Delete cache entries strictly older than `now - days`
    fn sweep_cache_older_than_at(&self, days: u32, now: DateTime<Utc>) -> Result<usize>;

    /// Queue a query for later, returning its id
    fn enqueue_pending(&self, query: &str) -> Result<u64>;

    /// Queued queries in insertion order
    fn pending_queries(&self) -> Result<Vec<PendingQuery>>;

    /// Remove a queued query
    fn remove_pending(&self, id: u64) -> Result<()>;

    /// Upsert a setting
    fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Read a setting
    fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>>;
}

/// `sled`-backed implementation of [`LocalStore`]
pub struct SledStore {
    db: Db,
    chats: Tree,
    cache: Tree,
    cache_by_time: Tree,
    pending: Tree,
    settings: Tree,
}

impl SledStore {
    /// Open or create a store
    ///
    /// Opening is idempotent; the schema version is written on first open.
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Storage` if the database cannot be opened or
    /// was written by a newer schema
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::storage::SledStore;
    ///
    /// # fn main() -> shikshak_saathi::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("saathi.db"))?;
    /// assert_eq!(store.schema_version()?, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SaathiError::Storage(format!("Failed to create database directory: {}", e))
            })?;
        }

        let db = sled::open(path)
            .map_err(|e| SaathiError::Storage(format!("Failed to open database: {}", e)))?;
        Self::from_db(db)
    }

    /// Open a throwaway in-memory store (removed on drop)
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(|e| SaathiError::Storage(format!("Failed to open database: {}", e)))?;
        Self::from_db(db)
    }

    fn from_db(db: Db) -> Result<Self> {
        let open_tree = |name: &str| {
            db.open_tree(name)
                .map_err(|e| SaathiError::Storage(format!("Failed to open tree {}: {}", name, e)))
        };

        let store = Self {
            chats: open_tree("chats")?,
            cache: open_tree("cache")?,
            cache_by_time: open_tree("cache_by_time")?,
            pending: open_tree("pending")?,
            settings: open_tree("settings")?,
            db,
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let meta = self
            .db
            .open_tree("meta")
            .map_err(|e| SaathiError::Storage(format!("Failed to open tree meta: {}", e)))?;

        let current = self.schema_version()?;
        if current > SCHEMA_VERSION {
            return Err(SaathiError::Storage(format!(
                "Database schema version {} is newer than supported version {}",
                current, SCHEMA_VERSION
            ))
            .into());
        }

        if current < SCHEMA_VERSION {
            tracing::info!(
                "Migrating local store schema {} -> {}",
                current,
                SCHEMA_VERSION
            );
            meta.insert(SCHEMA_VERSION_KEY, SCHEMA_VERSION.to_be_bytes().to_vec())
                .map_err(|e| SaathiError::Storage(format!("Insert failed: {}", e)))?;
            self.flush()?;
        }

        Ok(())
    }

    /// Schema version recorded in the database (0 if never written)
    pub fn schema_version(&self) -> Result<u32> {
        let meta = self
            .db
            .open_tree("meta")
            .map_err(|e| SaathiError::Storage(format!("Failed to open tree meta: {}", e)))?;

        let Some(bytes) = meta
            .get(SCHEMA_VERSION_KEY)
            .map_err(|e| SaathiError::Storage(format!("Get failed: {}", e)))?
        else {
            return Ok(0);
        };

        let raw: [u8; 4] = bytes[..].try_into().map_err(|_| {
            SaathiError::Storage("Corrupt schema version record".to_string())
        })?;
        Ok(u32::from_be_bytes(raw))
    }

    /// Underlying database handle (shared with the shell cache storage)
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Delete cache entries older than `days` relative to now
    pub fn sweep_cache_older_than(&self, days: u32) -> Result<usize> {
        self.sweep_cache_older_than_at(days, Utc::now())
    }

    /// Insert a cache entry with an explicit timestamp
    ///
    /// The query is normalized before it is used as the key.
    pub fn insert_cache_entry(&self, entry: CacheEntry) -> Result<()> {
        let entry = CacheEntry {
            query: normalize_query(&entry.query),
            ..entry
        };

        let value = serde_json::to_vec(&entry)
            .map_err(|e| SaathiError::Storage(format!("Serialization failed: {}", e)))?;
        let index_key = time_index_key(entry.timestamp, &entry.query);

        let result: TransactionResult<(), ()> =
            (&self.cache, &self.cache_by_time).transaction(|(cache, index)| {
                if let Some(old) = cache.insert(entry.query.as_bytes(), value.as_slice())? {
                    if let Ok(old_entry) = serde_json::from_slice::<CacheEntry>(&old) {
                        index.remove(time_index_key(old_entry.timestamp, &old_entry.query))?;
                    }
                }
                index.insert(index_key.as_slice(), Vec::<u8>::new())?;
                Ok(())
            });

        result.map_err(|e| SaathiError::Storage(format!("Cache write failed: {:?}", e)))?;
        self.flush()
    }

    /// Number of cached answers
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| SaathiError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn next_id(&self) -> Result<u64> {
        let id = self
            .db
            .generate_id()
            .map_err(|e| SaathiError::Storage(format!("Id generation failed: {}", e)))?;
        Ok(id + 1)
    }

    fn put_json<T: serde::Serialize>(&self, tree: &Tree, key: &[u8], value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| SaathiError::Storage(format!("Serialization failed: {}", e)))?;
        tree.insert(key, bytes)
            .map_err(|e| SaathiError::Storage(format!("Insert failed: {}", e)))?;
        self.flush()
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        tree: &Tree,
        key: &[u8],
    ) -> Result<Option<T>> {
        match tree
            .get(key)
            .map_err(|e| SaathiError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| SaathiError::Storage(format!("Deserialization failed: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn all_json<T: serde::de::DeserializeOwned>(&self, tree: &Tree) -> Result<Vec<T>> {
        tree.iter()
            .values()
            .map(|item| -> Result<T> {
                let bytes =
                    item.map_err(|e| SaathiError::Storage(format!("Iteration failed: {}", e)))?;
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    SaathiError::Storage(format!("Deserialization failed: {}", e))
                })?;
                Ok(value)
            })
            .collect()
    }
}

/// Order-preserving index key: sign-flipped big-endian micros, then query
fn time_index_key(timestamp: DateTime<Utc>, query: &str) -> Vec<u8> {
    let mut key = time_prefix(timestamp.timestamp_micros()).to_vec();
    key.extend_from_slice(query.as_bytes());
    key
}

fn time_prefix(micros: i64) -> [u8; 8] {
    ((micros as u64) ^ (1u64 << 63)).to_be_bytes()
}

impl LocalStore for SledStore {
    fn save_chat(&self, messages: &[ChatMessage]) -> Result<u64> {
        let id = self.next_id()?;
        let now = Utc::now();
        let session = ChatSession {
            id,
            title: ChatSession::derive_title(messages),
            messages: messages.to_vec(),
            timestamp: now,
            updated_at: now,
        };
        self.put_json(&self.chats, &id.to_be_bytes(), &session)?;
        tracing::debug!("Saved chat session {}", id);
        Ok(id)
    }

    fn update_chat(&self, id: u64, messages: &[ChatMessage]) -> Result<()> {
        let mut session: ChatSession = self
            .get_json(&self.chats, &id.to_be_bytes())?
            .ok_or_else(|| SaathiError::NotFound(format!("Chat session {}", id)))?;

        session.messages = messages.to_vec();
        session.title = ChatSession::derive_title(messages);
        session.updated_at = Utc::now();
        self.put_json(&self.chats, &id.to_be_bytes(), &session)
    }

    fn all_chats(&self) -> Result<Vec<ChatSession>> {
        let mut sessions: Vec<ChatSession> = self.all_json(&self.chats)?;
        sessions.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));
        Ok(sessions)
    }

    fn get_chat(&self, id: u64) -> Result<Option<ChatSession>> {
        self.get_json(&self.chats, &id.to_be_bytes())
    }

    fn delete_chat(&self, id: u64) -> Result<bool> {
        let removed = self
            .chats
            .remove(id.to_be_bytes())
            .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
        self.flush()?;
        Ok(removed.is_some())
    }

    fn cache_response(&self, query: &str, response: &str) -> Result<()> {
        self.insert_cache_entry(CacheEntry {
            query: query.to_string(),
            response: response.to_string(),
            timestamp: Utc::now(),
        })
    }

    fn cached_response(&self, query: &str) -> Result<Option<CacheEntry>> {
        self.get_json(&self.cache, normalize_query(query).as_bytes())
    }

    fn sweep_cache_older_than_at(&self, days: u32, now: DateTime<Utc>) -> Result<usize> {
        // nothing predates the earliest representable instant
        let cutoff = Duration::try_days(i64::from(days))
            .and_then(|age| now.checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        let upper = time_prefix(cutoff.timestamp_micros().saturating_add(1));

        let index_keys: Vec<sled::IVec> = self
            .cache_by_time
            .range(..upper.as_slice())
            .keys()
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| SaathiError::Storage(format!("Iteration failed: {}", e)))?;

        let mut removed = 0;
        for index_key in index_keys {
            let query = String::from_utf8_lossy(&index_key[8..]).into_owned();
            let entry: Option<CacheEntry> = self.get_json(&self.cache, query.as_bytes())?;

            match entry {
                Some(entry)
                    if time_index_key(entry.timestamp, &entry.query).as_slice() != &index_key[..] =>
                {
                    // stale index record left by an upsert
                    self.cache_by_time
                        .remove(&index_key)
                        .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
                }
                Some(entry) if entry.timestamp < cutoff => {
                    self.cache
                        .remove(query.as_bytes())
                        .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
                    self.cache_by_time
                        .remove(&index_key)
                        .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
                    removed += 1;
                }
                Some(_) => {}
                None => {
                    self.cache_by_time
                        .remove(&index_key)
                        .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
                }
            }
        }

        self.flush()?;
        if removed > 0 {
            tracing::info!("Swept {} cached responses older than {} days", removed, days);
        }
        Ok(removed)
    }

    fn enqueue_pending(&self, query: &str) -> Result<u64> {
        let id = self.next_id()?;
        let pending = PendingQuery {
            id,
            query: query.to_string(),
            timestamp: Utc::now(),
        };
        self.put_json(&self.pending, &id.to_be_bytes(), &pending)?;
        Ok(id)
    }

    fn pending_queries(&self) -> Result<Vec<PendingQuery>> {
        self.all_json(&self.pending)
    }

    fn remove_pending(&self, id: u64) -> Result<()> {
        self.pending
            .remove(id.to_be_bytes())
            .map_err(|e| SaathiError::Storage(format!("Delete failed: {}", e)))?;
        self.flush()
    }

    fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.put_json(&self.settings, key.as_bytes(), &value)
    }

    fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.get_json(&self.settings, key.as_bytes())
    }
}
