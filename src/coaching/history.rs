//! Conversation history preparation
//!
//! The provider requires the history to start with a user turn.

use crate::providers::{ChatMessage, Role};

/// Prepare prior turns for the provider
///
/// Drops blank messages, then drops leading assistant turns up to the first
/// user turn. Without any user turn the result is empty.
///
/// # Examples
///
/// ```
/// use shikshak_saathi::coaching::filter_history;
/// use shikshak_saathi::providers::ChatMessage;
///
/// let history = vec![
///     ChatMessage::assistant("Namaste! How can I help?"),
///     ChatMessage::user("Fractions"),
///     ChatMessage::assistant("Use rotis."),
/// ];
/// let filtered = filter_history(&history);
/// assert_eq!(filtered.len(), 2);
/// assert_eq!(filtered[0].content, "Fractions");
/// ```
pub fn filter_history(history: &[ChatMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .filter(|msg| !msg.is_blank())
        .skip_while(|msg| msg.role != Role::User)
        .cloned()
        .collect()
}
