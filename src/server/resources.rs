//! `/api/resources` routes

use crate::catalog::{LessonDetail, LessonSummary, LocalizedCategory};
use crate::language::Language;
use crate::server::{not_found, ApiError, AppState, LanguageQuery};
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/micro-lessons", get(micro_lessons).fallback(not_found))
        .route("/micro-lessons/:id", get(micro_lesson).fallback(not_found))
        .route("/categories", get(categories).fallback(not_found))
}

#[derive(Debug, Default, Deserialize)]
pub struct LessonsQuery {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LessonsReply {
    pub success: bool,
    pub lessons: Vec<LessonSummary>,
    pub total: usize,
    pub language: Language,
}

async fn micro_lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonsQuery>,
) -> Json<LessonsReply> {
    let lessons = state
        .catalog
        .lesson_summaries(query.language, query.category.as_deref());
    Json(LessonsReply {
        success: true,
        total: lessons.len(),
        lessons,
        language: query.language,
    })
}

#[derive(Debug, Serialize)]
pub struct LessonReply {
    pub success: bool,
    pub lesson: LessonDetail,
    pub language: Language,
}

async fn micro_lesson(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<LessonReply>, ApiError> {
    let lesson = state
        .catalog
        .lesson_detail(&id, query.language)
        .ok_or_else(|| ApiError::not_found("Lesson not found", "पाठ नहीं मिला"))?;
    Ok(Json(LessonReply {
        success: true,
        lesson,
        language: query.language,
    }))
}

#[derive(Debug, Serialize)]
pub struct CategoriesReply {
    pub success: bool,
    pub categories: Vec<LocalizedCategory>,
    pub language: Language,
}

async fn categories(
    State(state): State<AppState>,
    Query(query): Query<LanguageQuery>,
) -> Json<CategoriesReply> {
    Json(CategoriesReply {
        success: true,
        categories: state.catalog.localized_categories(query.language),
        language: query.language,
    })
}
