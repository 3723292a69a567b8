//! Command handlers for the `saathi` binary
//!
//! Each submodule handles one top-level CLI command. Client commands share
//! the local store opened by [`open_store`].

pub mod ask;
pub mod cache;
pub mod history;
pub mod pending;
pub mod serve;
pub mod settings;
pub mod shell;

use crate::config::Config;
use crate::error::Result;
use crate::offline::HttpCoachApi;
use crate::storage::SledStore;
use std::time::Duration;

/// Open the local store at the configured path
pub fn open_store(config: &Config) -> Result<SledStore> {
    let path = config.client.resolved_db_path()?;
    tracing::debug!("Opening local store at {}", path.display());
    SledStore::open(path)
}

/// HTTP client for the configured coaching API
pub fn coach_api(config: &Config) -> Result<HttpCoachApi> {
    HttpCoachApi::new(
        config.client.api_base.clone(),
        Duration::from_secs(config.client.timeout_seconds),
    )
}
