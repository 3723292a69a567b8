//! Provider module for Shikshak Saathi
//!
//! This module contains the AI provider abstraction and the Google Gemini
//! implementation used by the coaching gateway.

pub mod base;
pub mod gemini;

pub use base::{ChatMessage, Provider, Role};
pub use gemini::GeminiProvider;

use crate::config::GeminiConfig;
use crate::error::Result;

/// Create the coaching provider from an API key and configuration
///
/// # Arguments
///
/// * `api_key` - Gemini API key
/// * `config` - Gemini generation settings
/// * `system_prompt` - Coaching instruction sent with every request
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the key is blank or the HTTP client cannot be built
pub fn create_provider(
    api_key: &str,
    config: &GeminiConfig,
    system_prompt: &str,
) -> Result<Box<dyn Provider>> {
    Ok(Box::new(GeminiProvider::new(
        api_key,
        config.clone(),
        system_prompt,
    )?))
}
