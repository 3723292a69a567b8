//! Google Gemini provider implementation
//!
//! Talks to the `generateContent` endpoint of the Generative Language API.
//! The coaching system prompt travels as `systemInstruction`; history turns
//! are mapped user→`user` and assistant→`model`.

use crate::config::GeminiConfig;
use crate::error::{Result, SaathiError};
use crate::providers::{ChatMessage, Provider, Role};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini provider
///
/// Holds a configured HTTP client and the generation settings. Construction
/// fails only when the key is blank or the HTTP client cannot be built.
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
    system_prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Generative Language API key
    /// * `config` - Model and generation settings
    /// * `system_prompt` - Instruction sent with every request
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Config` for a blank key and
    /// `SaathiError::Provider` if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::config::GeminiConfig;
    /// use shikshak_saathi::providers::GeminiProvider;
    ///
    /// let provider = GeminiProvider::new("key", GeminiConfig::default(), "Be kind.");
    /// assert!(provider.is_ok());
    /// assert!(GeminiProvider::new("  ", GeminiConfig::default(), "Be kind.").is_err());
    /// ```
    pub fn new(
        api_key: impl Into<String>,
        config: GeminiConfig,
        system_prompt: impl Into<String>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SaathiError::Config("Gemini API key is empty".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("shikshak-saathi/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SaathiError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key: api_key.trim().to_string(),
            system_prompt: system_prompt.into(),
        })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, query: &str, history: &[ChatMessage]) -> GenerateContentRequest {
        let mut contents: Vec<GeminiContent> = history
            .iter()
            .map(|msg| GeminiContent {
                role: Some(
                    match msg.role {
                        Role::User => "user",
                        Role::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(msg.content.clone()),
                }],
            })
            .collect();

        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: Some(query.to_string()),
            }],
        });

        GenerateContentRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(self.system_prompt.clone()),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                max_output_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
            },
        }
    }

    fn extract_text(response: GenerateContentResponse) -> Result<String> {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(SaathiError::Provider(format!("Prompt blocked ({})", reason)).into());
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| SaathiError::Provider("Gemini returned no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SaathiError::Provider(format!(
                "Gemini returned an empty candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            ))
            .into());
        }

        Ok(text)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, query: &str, history: &[ChatMessage]) -> Result<String> {
        let request = self.build_request(query, history);

        tracing::debug!(
            "Sending Gemini request: model={}, {} history turns",
            self.config.model,
            history.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                SaathiError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(SaathiError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            SaathiError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        Self::extract_text(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GeminiProvider {
        GeminiProvider::new("test-key", GeminiConfig::default(), "system").unwrap()
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(GeminiProvider::new("", GeminiConfig::default(), "system").is_err());
    }

    #[test]
    fn test_endpoint_uses_model() {
        let mut config = GeminiConfig::default();
        config.api_base = "http://localhost:9999/v1beta/".to_string();
        let provider = GeminiProvider::new("k", config, "s").unwrap();
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash-lite:generateContent"
        );
    }

    #[test]
    fn test_build_request_maps_roles() {
        let history = vec![
            ChatMessage::user("first question"),
            ChatMessage::assistant("first answer"),
        ];
        let request = provider().build_request("second question", &history);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "system");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["role"], "user");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "second question");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 500);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello "}, {"text": "teacher"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(
            GeminiProvider::extract_text(response).unwrap(),
            "Hello teacher"
        );
    }

    #[test]
    fn test_extract_text_no_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": []})).unwrap();
        assert!(GeminiProvider::extract_text(response).is_err());
    }

    #[test]
    fn test_extract_text_blocked_prompt() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = GeminiProvider::extract_text(response).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }
}
