//! Offline application shell
//!
//! A request cache strategy for the web app frame: cache-first for static
//! assets, network-only with a JSON offline reply for API calls, and
//! network-first with the cached `/index.html` for page navigations. The
//! worker also owns the install/activate lifecycle of its named cache.
//!
//! Cache storage and the network are traits so the strategy runs against
//! memory or `sled` storage and a real or stubbed network.

pub mod fetcher;
pub mod storage;
pub mod worker;

pub use fetcher::{Fetcher, HttpFetcher};
pub use storage::{CacheStorage, MemoryCacheStorage, SledCacheStorage};
pub use worker::{ActivationReport, ServiceWorker, WorkerMessage, WorkerState};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the current shell cache
pub const CACHE_NAME: &str = "shikshak-saathi-v1";

/// Documents and assets pre-cached on install
pub const SHELL_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/coach",
    "/scenarios",
    "/resources",
    "/history",
    "/favicon.svg",
];

/// Path of the document served to offline navigations
pub const SHELL_DOCUMENT: &str = "/index.html";

/// Body of the synthesized reply to a failed API call
pub const OFFLINE_API_ERROR: &str = "You are offline. Please check your connection.";

/// A request as seen by the worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRequest {
    /// HTTP method
    pub method: String,
    /// Path including any query string (the cache key)
    pub path: String,
    /// Whether this is a top-level page navigation
    pub navigate: bool,
}

impl ShellRequest {
    /// A GET for a sub-resource
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            path: path.into(),
            navigate: false,
        }
    }

    /// A GET page navigation
    pub fn navigate(path: impl Into<String>) -> Self {
        Self {
            navigate: true,
            ..Self::get(path)
        }
    }

    /// Whether the method is GET
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Whether the path targets the coaching API
    pub fn is_api(&self) -> bool {
        self.path.starts_with("/api/")
    }
}

/// A response as stored in and served from the shell cache
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellResponse {
    /// HTTP status code
    pub status: u16,
    /// Headers with lowercase names
    pub headers: BTreeMap<String, String>,
    /// Response body
    pub body: Bytes,
}

impl ShellResponse {
    /// Build a response
    pub fn new(status: u16, content_type: &str, body: impl Into<Bytes>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), content_type.to_string());
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// The 503 JSON reply for an API call made while offline
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::shell::ShellResponse;
    ///
    /// let response = ShellResponse::offline_api();
    /// assert_eq!(response.status, 503);
    /// assert_eq!(response.header("content-type"), Some("application/json"));
    /// ```
    pub fn offline_api() -> Self {
        let body = serde_json::json!({
            "success": false,
            "error": OFFLINE_API_ERROR,
            "offline": true,
        });
        Self::new(503, "application/json", body.to_string())
    }

    /// The 504 reply for a navigation made offline before the shell was cached
    pub fn offline_navigation() -> Self {
        Self::new(504, "text/plain; charset=utf-8", "Offline")
    }

    /// Header lookup by lowercase name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Whether the status is exactly 200 (the only cacheable status)
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }
}
