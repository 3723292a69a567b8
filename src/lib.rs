//! Shikshak Saathi - bilingual teaching coach library
//!
//! This library provides the coaching API server and the offline-first
//! client used by the `saathi` binary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `server`: `axum` HTTP API (health, coaching, micro-lessons)
//! - `coaching`: AI coaching gateway with keyword fallback answers
//! - `providers`: AI provider abstraction and the Gemini implementation
//! - `catalog`: embedded scenarios, categories and micro-lessons
//! - `offline`: connectivity, query routing, coalescing and queue sync
//! - `storage`: `sled` store for chats, response cache, queue and settings
//! - `shell`: cache strategy for the offline application shell
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use shikshak_saathi::catalog::Catalog;
//! use shikshak_saathi::coaching::CoachingGateway;
//! use shikshak_saathi::config::GeminiConfig;
//! use shikshak_saathi::server::{router, AppState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let gateway = CoachingGateway::new(GeminiConfig::default());
//! let app = router(AppState::new(gateway, Catalog::embedded()?, false));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod coaching;
pub mod commands;
pub mod config;
pub mod error;
pub mod language;
pub mod offline;
pub mod prompts;
pub mod providers;
pub mod server;
pub mod shell;
pub mod storage;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, SaathiError};
pub use language::Language;
