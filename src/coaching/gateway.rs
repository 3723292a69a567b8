//! AI coaching gateway
//!
//! Wraps at most one provider handle. Every call produces text: provider
//! output when the provider is configured and succeeds, otherwise the
//! keyword-selected fallback answer.

use crate::coaching::fallback::fallback_response;
use crate::coaching::history::filter_history;
use crate::config::GeminiConfig;
use crate::prompts::COACHING_SYSTEM_PROMPT;
use crate::providers::{create_provider, ChatMessage, Provider};
use std::sync::Arc;

/// Text produced for a coaching question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachingReply {
    /// Answer text
    pub text: String,
    /// Whether the text came from the AI provider (false for fallbacks)
    pub from_provider: bool,
}

/// Gateway between the HTTP API and the AI provider
///
/// Constructed explicitly by the composition root and shared behind an
/// `Arc`; there is no process-wide instance.
pub struct CoachingGateway {
    config: GeminiConfig,
    provider: Option<Arc<dyn Provider>>,
}

impl CoachingGateway {
    /// Create an uninitialized gateway (fallback-only until `initialize`)
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            provider: None,
        }
    }

    /// Create a gateway around an existing provider
    pub fn with_provider(provider: Arc<dyn Provider>) -> Self {
        Self {
            config: GeminiConfig::default(),
            provider: Some(provider),
        }
    }

    /// Configure the provider client from an API key
    ///
    /// A missing or blank key leaves the gateway in fallback-only mode.
    /// Calling this again replaces any previous provider.
    ///
    /// # Returns
    ///
    /// Returns whether the gateway is ready to call the provider
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::coaching::CoachingGateway;
    /// use shikshak_saathi::config::GeminiConfig;
    ///
    /// let mut gateway = CoachingGateway::new(GeminiConfig::default());
    /// assert!(!gateway.initialize(None));
    /// assert!(!gateway.is_ready());
    /// ```
    pub fn initialize(&mut self, api_key: Option<&str>) -> bool {
        let key = match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                tracing::warn!("Gemini API key not provided. AI features will be disabled.");
                self.provider = None;
                return false;
            }
        };

        match create_provider(key, &self.config, COACHING_SYSTEM_PROMPT) {
            Ok(provider) => {
                self.provider = Some(Arc::from(provider));
                tracing::info!("Gemini AI initialized successfully");
                true
            }
            Err(e) => {
                tracing::error!("Failed to initialize Gemini: {}", e);
                self.provider = None;
                false
            }
        }
    }

    /// Whether a provider is configured
    pub fn is_ready(&self) -> bool {
        self.provider.is_some()
    }

    /// Answer a coaching question, reporting where the text came from
    ///
    /// Never fails: provider errors are logged and replaced by the fallback.
    pub async fn respond(&self, query: &str, history: &[ChatMessage]) -> CoachingReply {
        let Some(provider) = self.provider.clone() else {
            return CoachingReply {
                text: fallback_response(query).to_string(),
                from_provider: false,
            };
        };

        let filtered = filter_history(history);
        match provider.complete(query, &filtered).await {
            Ok(text) => CoachingReply {
                text,
                from_provider: true,
            },
            Err(e) => {
                tracing::error!("{} provider error, using fallback: {}", provider.name(), e);
                CoachingReply {
                    text: fallback_response(query).to_string(),
                    from_provider: false,
                }
            }
        }
    }

    /// Answer a coaching question
    ///
    /// Never fails: returns provider text or the fallback answer.
    pub async fn get_response(&self, query: &str, history: &[ChatMessage]) -> String {
        self.respond(query, history).await.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SaathiError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingProvider {
        reply: Option<String>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn complete(&self, _query: &str, history: &[ChatMessage]) -> Result<String> {
            self.seen.lock().unwrap().push(history.to_vec());
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(SaathiError::Provider("quota exceeded".to_string()).into()),
            }
        }
    }

    fn recording(reply: Option<&str>) -> Arc<RecordingProvider> {
        Arc::new(RecordingProvider {
            reply: reply.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_uninitialized_uses_fallback() {
        let gateway = CoachingGateway::new(GeminiConfig::default());
        let reply = gateway.respond("students lack attention", &[]).await;
        assert!(!reply.from_provider);
        assert!(reply.text.contains("Clap Pattern"));
    }

    #[test]
    fn test_initialize_blank_key() {
        let mut gateway = CoachingGateway::new(GeminiConfig::default());
        assert!(!gateway.initialize(Some("   ")));
        assert!(!gateway.is_ready());
    }

    #[test]
    fn test_initialize_with_key() {
        let mut gateway = CoachingGateway::new(GeminiConfig::default());
        assert!(gateway.initialize(Some("abc123")));
        assert!(gateway.is_ready());
    }

    #[tokio::test]
    async fn test_provider_success() {
        let provider = recording(Some("Use bundles of sticks."));
        let gateway = CoachingGateway::with_provider(provider.clone());
        let reply = gateway.respond("zero?", &[]).await;
        assert!(reply.from_provider);
        assert_eq!(reply.text, "Use bundles of sticks.");
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back() {
        let gateway = CoachingGateway::with_provider(recording(None));
        let text = gateway
            .get_response("teaching zero with borrowing", &[])
            .await;
        assert!(text.contains("Teaching Zero & Borrowing"));
    }

    #[tokio::test]
    async fn test_history_is_filtered_before_provider() {
        let provider = recording(Some("ok"));
        let gateway = CoachingGateway::with_provider(provider.clone());
        let history = vec![
            ChatMessage::assistant("Namaste!"),
            ChatMessage::user("first"),
            ChatMessage::assistant(" "),
        ];
        gateway.respond("second", &history).await;

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0], vec![ChatMessage::user("first")]);
    }
}
