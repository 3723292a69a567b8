//! Client for the coaching HTTP API
//!
//! The offline engine depends on the [`CoachApi`] trait; [`HttpCoachApi`]
//! is the `reqwest` implementation used by the CLI.

use crate::error::{Result, SaathiError};
use crate::language::Language;
use crate::providers::ChatMessage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of `POST /coaching/ask`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest<'a> {
    pub query: &'a str,
    pub conversation_history: &'a [ChatMessage],
    pub language: Language,
}

/// Successful answer from `POST /coaching/ask`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskResponse {
    pub success: bool,
    pub response: String,
    #[serde(default, rename = "isAIResponse")]
    pub is_ai_response: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Coaching API as seen by the offline engine
#[async_trait]
pub trait CoachApi: Send + Sync {
    /// Ask a coaching question
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Network` on transport errors or non-2xx
    /// responses
    async fn ask(
        &self,
        query: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> Result<AskResponse>;

    /// Probe the API health endpoint
    async fn health(&self) -> bool;
}

/// `reqwest` implementation of [`CoachApi`]
#[derive(Debug, Clone)]
pub struct HttpCoachApi {
    client: Client,
    api_base: String,
}

impl HttpCoachApi {
    /// Create a client for an API base such as `http://localhost:3001/api`
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Network` if the HTTP client cannot be built
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("shikshak-saathi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SaathiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl CoachApi for HttpCoachApi {
    async fn ask(
        &self,
        query: &str,
        history: &[ChatMessage],
        language: Language,
    ) -> Result<AskResponse> {
        let request = AskRequest {
            query,
            conversation_history: history,
            language,
        };

        let response = self
            .client
            .post(self.url("/coaching/ask"))
            .json(&request)
            .send()
            .await
            .map_err(|e| SaathiError::Network(format!("Coaching request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SaathiError::Network(format!(
                "Coaching API returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: AskResponse = response.json().await.map_err(|e| {
            SaathiError::Network(format!("Failed to parse coaching response: {}", e))
        })?;
        Ok(body)
    }

    async fn health(&self) -> bool {
        match self.client.get(self.url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health probe failed: {}", e);
                false
            }
        }
    }
}
