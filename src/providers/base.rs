//! Base provider trait and common message types for Shikshak Saathi
//!
//! This module defines the Provider trait that the coaching gateway talks to,
//! along with the chat message types shared by the gateway, the HTTP API,
//! the local store and the offline engine.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The teacher asking questions
    User,
    /// The coach answering them
    Assistant,
}

impl Role {
    /// Parse a wire role leniently: `"user"` is the user, anything else
    /// is treated as an assistant turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::providers::Role;
    ///
    /// assert_eq!(Role::from_wire("user"), Role::User);
    /// assert_eq!(Role::from_wire("model"), Role::Assistant);
    /// ```
    pub fn from_wire(role: &str) -> Self {
        if role == "user" {
            Self::User
        } else {
            Self::Assistant
        }
    }

    /// Lowercase name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single turn in a coaching conversation
///
/// Messages are immutable once created and ordered within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::providers::{ChatMessage, Role};
    ///
    /// let msg = ChatMessage::user("How do I teach fractions?");
    /// assert_eq!(msg.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Whether the message has no visible text
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Text-completion service used for coaching answers
///
/// Implementations receive the teacher's question plus the prior
/// conversation (already filtered so it starts with a user turn) and
/// return the coach's reply.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use shikshak_saathi::providers::{ChatMessage, Provider};
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     async fn complete(
///         &self,
///         query: &str,
///         _history: &[ChatMessage],
///     ) -> shikshak_saathi::Result<String> {
///         Ok(query.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Produce a reply to `query` given the prior conversation
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails, times out or the response
    /// cannot be interpreted
    async fn complete(&self, query: &str, history: &[ChatMessage]) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_wire() {
        assert_eq!(Role::from_wire("user"), Role::User);
        assert_eq!(Role::from_wire("assistant"), Role::Assistant);
        assert_eq!(Role::from_wire("system"), Role::Assistant);
        assert_eq!(Role::from_wire("USER"), Role::Assistant);
    }

    #[test]
    fn test_message_serialization() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_message_is_blank() {
        assert!(ChatMessage::assistant("   \n").is_blank());
        assert!(!ChatMessage::assistant("ok").is_blank());
    }

    #[tokio::test]
    async fn test_provider_trait_object() {
        struct StaticProvider;

        #[async_trait]
        impl Provider for StaticProvider {
            fn name(&self) -> &str {
                "static"
            }

            async fn complete(&self, _query: &str, history: &[ChatMessage]) -> Result<String> {
                Ok(format!("{} turns", history.len()))
            }
        }

        let provider: Box<dyn Provider> = Box::new(StaticProvider);
        let reply = provider
            .complete("q", &[ChatMessage::user("a"), ChatMessage::assistant("b")])
            .await
            .unwrap();
        assert_eq!(reply, "2 turns");
        assert_eq!(provider.name(), "static");
    }
}
