//! Prompts and fixed texts
//!
//! This module holds the coaching system prompt sent to the AI provider and
//! the localized notices the offline client shows in place of an answer.

pub mod coaching_prompt;
pub mod notices;

pub use coaching_prompt::COACHING_SYSTEM_PROMPT;
pub use notices::{connection_failure_notice, offline_notice};
