//! Language selection
//!
//! Every user-facing string in Shikshak Saathi exists in English and Hindi.
//! This module defines the [`Language`] switch and the lenient parsing rule
//! shared by the HTTP API, the offline engine and the CLI: anything that is
//! not recognisably Hindi resolves to English.

use colored::Colorize;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display language for content and notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English (default)
    #[default]
    En,
    /// Hindi (Devanagari)
    Hi,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Language {
    /// Resolve a language code, falling back to English
    ///
    /// # Examples
    ///
    /// ```
    /// use shikshak_saathi::language::Language;
    ///
    /// assert_eq!(Language::from_code("hi"), Language::Hi);
    /// assert_eq!(Language::from_code("HI"), Language::Hi);
    /// assert_eq!(Language::from_code("fr"), Language::En);
    /// ```
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "hi" => Self::Hi,
            _ => Self::En,
        }
    }

    /// Resolve an optional language code (missing means English)
    pub fn from_optional(code: Option<&str>) -> Self {
        code.map(Self::from_code).unwrap_or_default()
    }

    /// Two-letter code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Whether this is Hindi
    pub fn is_hindi(&self) -> bool {
        matches!(self, Self::Hi)
    }

    /// Pick between an English and a Hindi variant
    pub fn pick<'a>(&self, en: &'a str, hi: &'a str) -> &'a str {
        match self {
            Self::En => en,
            Self::Hi => hi,
        }
    }

    /// Colored tag for terminal output
    pub fn colored_tag(&self) -> String {
        match self {
            Self::En => format!("[{}]", "EN".cyan()),
            Self::Hi => format!("[{}]", "हिंदी".yellow()),
        }
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::from_optional(raw.as_deref()))
    }
}
