//! Static content catalog
//!
//! Scenario prompts, micro-lessons and resource categories, each with an
//! English and a Hindi variant. The catalog ships as `content/catalog.yaml`
//! and is embedded into the binary at compile time.

use crate::error::{Result, SaathiError};
use crate::language::Language;
use serde::{Deserialize, Serialize};

const EMBEDDED_CATALOG: &str = include_str!("../../content/catalog.yaml");

/// Number of characters of lesson content shown in a preview
pub const PREVIEW_CHARS: usize = 100;

/// Resource category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    pub id: String,
    /// English name
    pub name: String,
    /// Hindi name
    pub name_hi: String,
    /// Display icon
    pub icon: String,
}

/// One ready-made question inside a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioPrompt {
    /// Prompt identifier
    pub id: String,
    /// English text
    pub text: String,
    /// Hindi text
    pub text_hi: String,
}

/// Group of ready-made questions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario identifier (matches a category id)
    pub id: String,
    /// English title
    pub title: String,
    /// Hindi title
    pub title_hi: String,
    /// Prompts in display order
    pub prompts: Vec<ScenarioPrompt>,
}

/// Short self-study lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroLesson {
    /// Lesson identifier (e.g. `ml_001`)
    pub id: String,
    /// Category identifier
    pub category: String,
    /// English title
    pub title: String,
    /// Hindi title
    pub title_hi: String,
    /// Human-readable duration (e.g. "5 min")
    pub duration: String,
    /// English markdown content
    pub content: String,
    /// Hindi markdown content
    pub content_hi: String,
}

/// Localized scenario prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedPrompt {
    pub id: String,
    pub text: String,
}

/// Localized scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedScenario {
    pub id: String,
    pub title: String,
    pub prompts: Vec<LocalizedPrompt>,
}

/// Localized lesson summary for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonSummary {
    pub id: String,
    pub category: String,
    pub title: String,
    pub duration: String,
    pub preview: String,
}

/// Localized full lesson
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonDetail {
    pub id: String,
    pub category: String,
    pub title: String,
    pub duration: String,
    pub content: String,
}

/// Localized category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedCategory {
    pub id: String,
    pub name: String,
    pub icon: String,
}

/// The complete content catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Content format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Resource categories in display order
    pub categories: Vec<Category>,
    /// Scenario groups in display order
    pub scenarios: Vec<Scenario>,
    /// Micro-lessons in display order
    pub lessons: Vec<MicroLesson>,
}

fn default_version() -> u32 {
    1
}

impl Catalog {
    /// Load the catalog compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Config` if the embedded YAML is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::catalog::Catalog;
    ///
    /// let catalog = Catalog::embedded().unwrap();
    /// assert!(catalog.lesson("ml_001").is_some());
    /// ```
    pub fn embedded() -> Result<Self> {
        Self::from_yaml(EMBEDDED_CATALOG)
    }

    /// Parse a catalog from YAML text
    ///
    /// # Errors
    ///
    /// Returns `SaathiError::Config` if the YAML is invalid
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SaathiError::Config(format!("Failed to parse catalog: {}", e)).into())
    }

    /// Look up a lesson by id
    pub fn lesson(&self, id: &str) -> Option<&MicroLesson> {
        self.lessons.iter().find(|l| l.id == id)
    }

    /// Scenarios localized to `language`
    pub fn localized_scenarios(&self, language: Language) -> Vec<LocalizedScenario> {
        self.scenarios
            .iter()
            .map(|s| LocalizedScenario {
                id: s.id.clone(),
                title: language.pick(&s.title, &s.title_hi).to_string(),
                prompts: s
                    .prompts
                    .iter()
                    .map(|p| LocalizedPrompt {
                        id: p.id.clone(),
                        text: language.pick(&p.text, &p.text_hi).to_string(),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Lesson summaries, optionally restricted to one category
    pub fn lesson_summaries(
        &self,
        language: Language,
        category: Option<&str>,
    ) -> Vec<LessonSummary> {
        self.lessons
            .iter()
            .filter(|l| category.map_or(true, |c| l.category == c))
            .map(|l| LessonSummary {
                id: l.id.clone(),
                category: l.category.clone(),
                title: language.pick(&l.title, &l.title_hi).to_string(),
                duration: l.duration.clone(),
                preview: preview(language.pick(&l.content, &l.content_hi)),
            })
            .collect()
    }

    /// Full localized lesson
    pub fn lesson_detail(&self, id: &str, language: Language) -> Option<LessonDetail> {
        self.lesson(id).map(|l| LessonDetail {
            id: l.id.clone(),
            category: l.category.clone(),
            title: language.pick(&l.title, &l.title_hi).to_string(),
            duration: l.duration.clone(),
            content: language.pick(&l.content, &l.content_hi).to_string(),
        })
    }

    /// Categories localized to `language`
    pub fn localized_categories(&self, language: Language) -> Vec<LocalizedCategory> {
        self.categories
            .iter()
            .map(|c| LocalizedCategory {
                id: c.id.clone(),
                name: language.pick(&c.name, &c.name_hi).to_string(),
                icon: c.icon.clone(),
            })
            .collect()
    }
}

/// First [`PREVIEW_CHARS`] characters of `content` followed by `...`
pub fn preview(content: &str) -> String {
    let mut text: String = content.chars().take(PREVIEW_CHARS).collect();
    text.push_str("...");
    text
}
