//! `/api/coaching` routes

use crate::catalog::LocalizedScenario;
use crate::language::Language;
use crate::providers::{ChatMessage, Role};
use crate::server::{not_found, ApiError, AppState, LanguageQuery};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Minimum query length after trimming
pub const MIN_QUERY_CHARS: usize = 3;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ask", post(ask).fallback(not_found))
        .route("/scenarios", get(scenarios).fallback(not_found))
        .route("/status", get(status).fallback(not_found))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AskReply {
    pub success: bool,
    pub response: String,
    #[serde(rename = "isAIResponse")]
    pub is_ai_response: bool,
    pub timestamp: DateTime<Utc>,
}

/// Parsed and validated body of `POST /ask`
#[derive(Debug, Clone, PartialEq)]
struct AskInput {
    query: String,
    history: Vec<ChatMessage>,
    language: Language,
}

impl AskInput {
    fn from_body(body: &Value) -> Result<Self, ApiError> {
        let query = match body.get("query").and_then(Value::as_str) {
            Some(query) if !query.is_empty() => query,
            _ => return Err(ApiError::bad_request("Query is required", "प्रश्न आवश्यक है")),
        };
        if query.trim().chars().count() < MIN_QUERY_CHARS {
            return Err(ApiError::bad_request(
                "Query too short. Please provide more details.",
                "प्रश्न बहुत छोटा है। कृपया अधिक विवरण दें।",
            ));
        }

        let history = body
            .get("conversationHistory")
            .and_then(Value::as_array)
            .map(|turns| {
                turns
                    .iter()
                    .map(|turn| ChatMessage {
                        role: Role::from_wire(
                            turn.get("role").and_then(Value::as_str).unwrap_or_default(),
                        ),
                        content: turn
                            .get("content")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            query: query.to_string(),
            history,
            language: Language::from_optional(body.get("language").and_then(Value::as_str)),
        })
    }
}

async fn ask(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AskReply>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let input = AskInput::from_body(&body)?;

    let preview: String = input.query.chars().take(50).collect();
    tracing::info!(language = %input.language, "Coaching query received: \"{}...\"", preview);

    let reply = state.gateway.respond(&input.query, &input.history).await;
    Ok(Json(AskReply {
        success: true,
        response: reply.text,
        is_ai_response: reply.from_provider,
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ScenariosReply {
    pub success: bool,
    pub scenarios: Vec<LocalizedScenario>,
    pub language: Language,
}

async fn scenarios(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Json<ScenariosReply> {
    Json(ScenariosReply {
        success: true,
        scenarios: state.catalog.localized_scenarios(query.language),
        language: query.language,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    pub success: bool,
    pub ai_available: bool,
    pub message: &'static str,
    pub message_hi: &'static str,
}

async fn status(State(state): State<AppState>) -> Json<StatusReply> {
    let ready = state.gateway.is_ready();
    let (message, message_hi) = if ready {
        ("AI coaching is ready", "AI कोचिंग तैयार है")
    } else {
        (
            "AI unavailable - using offline responses",
            "AI अनुपलब्ध - ऑफ़लाइन प्रतिक्रियाएं उपयोग में",
        )
    };
    Json(StatusReply {
        success: true,
        ai_available: ready,
        message,
        message_hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_or_non_string_query_is_required() {
        for body in [json!({}), json!({"query": 42}), json!({"query": ""})] {
            let error = AskInput::from_body(&body).unwrap_err();
            assert_eq!(error.body.error, "Query is required");
        }
    }

    #[test]
    fn test_short_query_rejected_after_trim() {
        let error = AskInput::from_body(&json!({"query": "  ab  "})).unwrap_err();
        assert_eq!(error.body.error, "Query too short. Please provide more details.");
        assert!(AskInput::from_body(&json!({"query": "abc"})).is_ok());
    }

    #[test]
    fn test_history_and_language_parsed_leniently() {
        let input = AskInput::from_body(&json!({
            "query": "How do I teach zero?",
            "conversationHistory": [
                {"role": "user", "content": "hello"},
                {"role": "model", "content": "hi"},
                {"content": "orphan"}
            ],
            "language": "xx"
        }))
        .unwrap();
        assert_eq!(input.language, Language::En);
        assert_eq!(input.history.len(), 3);
        assert_eq!(input.history[0].role, Role::User);
        assert_eq!(input.history[1].role, Role::Assistant);
        assert_eq!(input.history[2].role, Role::Assistant);
    }
}
