//! Named response caches for the shell worker

use crate::error::{Result, SaathiError};
use crate::shell::ShellResponse;
use std::collections::BTreeMap;
use std::sync::RwLock;

const TREE_PREFIX: &str = "shell_cache:";

/// A set of named caches, each mapping a request path to a response
pub trait CacheStorage: Send + Sync {
    /// Create the named cache if it does not exist
    fn open(&self, cache: &str) -> Result<()>;

    /// Names of all caches
    fn keys(&self) -> Result<Vec<String>>;

    /// Delete a cache; returns whether it existed
    fn delete(&self, cache: &str) -> Result<bool>;

    /// Look up a path in one cache
    fn lookup(&self, cache: &str, path: &str) -> Result<Option<ShellResponse>>;

    /// Store a response in one cache, creating the cache if needed
    fn put(&self, cache: &str, path: &str, response: &ShellResponse) -> Result<()>;

    /// Look up a path across every cache, in name order
    fn match_any(&self, path: &str) -> Result<Option<ShellResponse>> {
        for cache in self.keys()? {
            if let Some(response) = self.lookup(&cache, path)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

/// In-process cache storage
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    caches: RwLock<BTreeMap<String, BTreeMap<String, ShellResponse>>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SaathiError {
    SaathiError::Storage("Shell cache lock poisoned".to_string())
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&self, cache: &str) -> Result<()> {
        self.caches
            .write()
            .map_err(poisoned)?
            .entry(cache.to_string())
            .or_default();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.caches.read().map_err(poisoned)?.keys().cloned().collect())
    }

    fn delete(&self, cache: &str) -> Result<bool> {
        Ok(self
            .caches
            .write()
            .map_err(poisoned)?
            .remove(cache)
            .is_some())
    }

    fn lookup(&self, cache: &str, path: &str) -> Result<Option<ShellResponse>> {
        Ok(self
            .caches
            .read()
            .map_err(poisoned)?
            .get(cache)
            .and_then(|entries| entries.get(path))
            .cloned())
    }

    fn put(&self, cache: &str, path: &str, response: &ShellResponse) -> Result<()> {
        self.caches
            .write()
            .map_err(poisoned)?
            .entry(cache.to_string())
            .or_default()
            .insert(path.to_string(), response.clone());
        Ok(())
    }
}

/// `sled` cache storage, one tree per named cache
///
/// Shares the database handle of the local store since a `sled` database
/// can only be opened once per process.
#[derive(Debug, Clone)]
pub struct SledCacheStorage {
    db: sled::Db,
}

impl SledCacheStorage {
    pub fn new(db: sled::Db) -> Self {
        Self { db }
    }

    fn tree_name(cache: &str) -> String {
        format!("{}{}", TREE_PREFIX, cache)
    }

    fn tree(&self, cache: &str) -> Result<sled::Tree> {
        self.db
            .open_tree(Self::tree_name(cache))
            .map_err(|e| SaathiError::Storage(format!("Failed to open shell cache: {}", e)).into())
    }

    /// Opening a tree creates it, so reads check for it first
    fn existing_tree(&self, cache: &str) -> Result<Option<sled::Tree>> {
        let name = Self::tree_name(cache);
        let exists = self
            .db
            .tree_names()
            .iter()
            .any(|existing| &existing[..] == name.as_bytes());
        if exists {
            self.tree(cache).map(Some)
        } else {
            Ok(None)
        }
    }

    fn read(tree: &sled::Tree, path: &str) -> Result<Option<ShellResponse>> {
        let Some(bytes) = tree
            .get(path.as_bytes())
            .map_err(|e| SaathiError::Storage(format!("Shell cache read failed: {}", e)))?
        else {
            return Ok(None);
        };
        let response = serde_json::from_slice(&bytes)?;
        Ok(Some(response))
    }
}

impl CacheStorage for SledCacheStorage {
    fn open(&self, cache: &str) -> Result<()> {
        self.tree(cache)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .db
            .tree_names()
            .into_iter()
            .filter_map(|name| {
                String::from_utf8(name.to_vec())
                    .ok()
                    .and_then(|name| name.strip_prefix(TREE_PREFIX).map(str::to_string))
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn delete(&self, cache: &str) -> Result<bool> {
        self.db
            .drop_tree(Self::tree_name(cache))
            .map_err(|e| {
                SaathiError::Storage(format!("Failed to delete shell cache: {}", e)).into()
            })
    }

    fn lookup(&self, cache: &str, path: &str) -> Result<Option<ShellResponse>> {
        match self.existing_tree(cache)? {
            Some(tree) => Self::read(&tree, path),
            None => Ok(None),
        }
    }

    fn put(&self, cache: &str, path: &str, response: &ShellResponse) -> Result<()> {
        let tree = self.tree(cache)?;
        let bytes = serde_json::to_vec(response)?;
        tree.insert(path.as_bytes(), bytes)
            .map_err(|e| SaathiError::Storage(format!("Shell cache write failed: {}", e)))?;
        tree.flush()
            .map_err(|e| SaathiError::Storage(format!("Shell cache flush failed: {}", e)))?;
        Ok(())
    }

    fn match_any(&self, path: &str) -> Result<Option<ShellResponse>> {
        for cache in self.keys()? {
            if let Some(response) = Self::read(&self.tree(&cache)?, path)? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}
