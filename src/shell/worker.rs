//! Shell worker lifecycle and fetch strategy

use crate::error::{Result, SaathiError};
use crate::shell::{
    CacheStorage, Fetcher, ShellRequest, ShellResponse, CACHE_NAME, SHELL_ASSETS, SHELL_DOCUMENT,
};
use std::sync::{Arc, Mutex};

/// Lifecycle state of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, not yet installed
    Parsed,
    /// Installed, waiting to take over
    Installed,
    /// Controlling clients
    Activated,
    /// Installation failed
    Redundant,
}

/// Messages a page may post to the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Activate a waiting worker immediately
    SkipWaiting,
}

impl WorkerMessage {
    /// Parse the message type posted by a page
    pub fn from_type(message_type: &str) -> Option<Self> {
        match message_type {
            "SKIP_WAITING" => Some(Self::SkipWaiting),
            _ => None,
        }
    }
}

/// Outcome of activation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationReport {
    /// Caches removed because their name differs from the current one
    pub deleted: Vec<String>,
    /// Whether open clients were claimed
    pub claimed: bool,
}

#[derive(Debug)]
struct Lifecycle {
    state: WorkerState,
    skip_waiting: bool,
    claimed: bool,
}

/// Service worker for the offline application shell
pub struct ServiceWorker {
    cache_name: String,
    assets: Vec<String>,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    lifecycle: Mutex<Lifecycle>,
}

impl ServiceWorker {
    /// Worker for the current cache name and shell asset list
    pub fn new(storage: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_cache(
            CACHE_NAME,
            SHELL_ASSETS.iter().map(|s| s.to_string()).collect(),
            storage,
            fetcher,
        )
    }

    /// Worker with an explicit cache name and asset list
    pub fn with_cache(
        cache_name: impl Into<String>,
        assets: Vec<String>,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            assets,
            storage,
            fetcher,
            lifecycle: Mutex::new(Lifecycle {
                state: WorkerState::Parsed,
                skip_waiting: false,
                claimed: false,
            }),
        }
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    /// Current lifecycle state
    pub fn state(&self) -> Result<WorkerState> {
        Ok(self.lock()?.state)
    }

    /// Whether a waiting worker has been told to activate without waiting
    pub fn skip_waiting_requested(&self) -> Result<bool> {
        Ok(self.lock()?.skip_waiting)
    }

    /// Whether this worker has claimed open clients
    pub fn controls_clients(&self) -> Result<bool> {
        Ok(self.lock()?.claimed)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Lifecycle>> {
        self.lifecycle
            .lock()
            .map_err(|_| SaathiError::Storage("Worker state lock poisoned".to_string()).into())
    }

    fn set_state(&self, state: WorkerState) -> Result<()> {
        self.lock()?.state = state;
        Ok(())
    }

    /// Pre-cache every shell asset and request immediate activation
    ///
    /// All assets are fetched before any is stored; one failed fetch or
    /// non-200 status fails the whole install and nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Network` naming the asset that failed
    pub async fn install(&self) -> Result<usize> {
        tracing::info!("Installing shell cache {}", self.cache_name);

        let mut fetched = Vec::with_capacity(self.assets.len());
        for asset in &self.assets {
            let request = ShellRequest::get(asset.clone());
            let response = match self.fetcher.fetch(&request).await {
                Ok(response) if response.is_cacheable() => response,
                Ok(response) => {
                    self.set_state(WorkerState::Redundant)?;
                    return Err(SaathiError::Network(format!(
                        "Shell asset {} returned status {}",
                        asset, response.status
                    ))
                    .into());
                }
                Err(e) => {
                    self.set_state(WorkerState::Redundant)?;
                    return Err(SaathiError::Network(format!(
                        "Failed to fetch shell asset {}: {}",
                        asset, e
                    ))
                    .into());
                }
            };
            fetched.push((asset, response));
        }

        self.storage.open(&self.cache_name)?;
        for (asset, response) in &fetched {
            self.storage.put(&self.cache_name, asset, response)?;
        }

        let mut lifecycle = self.lock()?;
        lifecycle.state = WorkerState::Installed;
        lifecycle.skip_waiting = true;
        tracing::info!("Cached {} shell assets", fetched.len());
        Ok(fetched.len())
    }

    /// Delete caches of other versions and claim open clients
    pub async fn activate(&self) -> Result<ActivationReport> {
        let mut deleted = Vec::new();
        for name in self.storage.keys()? {
            if name != self.cache_name {
                tracing::info!("Deleting old shell cache {}", name);
                if self.storage.delete(&name)? {
                    deleted.push(name);
                }
            }
        }

        let mut lifecycle = self.lock()?;
        lifecycle.state = WorkerState::Activated;
        lifecycle.claimed = true;
        Ok(ActivationReport {
            deleted,
            claimed: true,
        })
    }

    /// Handle a message posted by a page
    ///
    /// `SkipWaiting` activates an installed worker right away.
    pub async fn handle_message(
        &self,
        message: WorkerMessage,
    ) -> Result<Option<ActivationReport>> {
        match message {
            WorkerMessage::SkipWaiting => {
                let state = {
                    let mut lifecycle = self.lock()?;
                    lifecycle.skip_waiting = true;
                    lifecycle.state
                };
                if state == WorkerState::Installed {
                    return Ok(Some(self.activate().await?));
                }
                Ok(None)
            }
        }
    }

    /// Answer a request according to the shell strategy
    ///
    /// - non-GET requests go to the network untouched
    /// - `/api/` requests are network-only; failure yields the 503 offline JSON
    /// - navigations are network-first, falling back to the cached shell
    ///   document, then to a 504
    /// - everything else is cache-first; misses are fetched and cached when
    ///   the status is exactly 200
    ///
    /// # Errors
    ///
    /// Propagates network failures for non-GET requests and cache misses
    pub async fn handle_fetch(&self, request: &ShellRequest) -> Result<ShellResponse> {
        if !request.is_get() {
            return self.fetcher.fetch(request).await;
        }

        if request.is_api() {
            return match self.fetcher.fetch(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    tracing::warn!("API request {} failed offline: {}", request.path, e);
                    Ok(ShellResponse::offline_api())
                }
            };
        }

        if request.navigate {
            return match self.fetcher.fetch(request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    tracing::debug!("Navigation to {} failed: {}", request.path, e);
                    Ok(self
                        .storage
                        .match_any(SHELL_DOCUMENT)?
                        .unwrap_or_else(ShellResponse::offline_navigation))
                }
            };
        }

        if let Some(cached) = self.storage.match_any(&request.path)? {
            tracing::debug!("Shell cache hit for {}", request.path);
            return Ok(cached);
        }

        let response = self.fetcher.fetch(request).await?;
        if response.is_cacheable() {
            if let Err(e) = self.storage.put(&self.cache_name, &request.path, &response) {
                tracing::warn!("Failed to cache {}: {}", request.path, e);
            }
        }
        Ok(response)
    }
}
