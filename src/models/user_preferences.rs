use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// How the user is feeling right now
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Sad,
    Excited,
    Calm,
    Curious,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Excited,
        Mood::Calm,
        Mood::Curious,
    ];
}

/// Spoken language of a title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Hindi,
    Tamil,
    Telugu,
    Malayalam,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Hindi,
        Language::Tamil,
        Language::Telugu,
        Language::Malayalam,
    ];
}

/// Streaming platform the user has access to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    Netflix,
    #[serde(rename = "Amazon Prime")]
    AmazonPrime,
    Hotstar,
    #[serde(rename = "Sony LIV")]
    SonyLiv,
    Zee5,
    Others,
}

impl Platform {
    pub const ALL: [Platform; 6] = [
        Platform::Netflix,
        Platform::AmazonPrime,
        Platform::Hotstar,
        Platform::SonyLiv,
        Platform::Zee5,
        Platform::Others,
    ];
}

/// Kind of content the user wants to watch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ContentType {
    Movie,
    Series,
    Both,
}

impl ContentType {
    pub const ALL: [ContentType; 3] = [ContentType::Movie, ContentType::Series, ContentType::Both];
}

/// Viewing preferences collected for a single submission
///
/// Serialized as-is into the user message of the chat-completion request, so
/// field names follow the camelCase wire format the model is told about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub mood: Mood,
    pub languages: Vec<Language>,
    pub platforms: Vec<Platform>,
    pub content_types: Vec<ContentType>,
    /// Titles that must not appear in the new batch (matched case-insensitively
    /// against `movie_name`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_titles: Option<Vec<String>>,
}

impl UserPreferences {
    /// Creates preferences with no exclusions
    pub fn new(
        mood: Mood,
        languages: Vec<Language>,
        platforms: Vec<Platform>,
        content_types: Vec<ContentType>,
    ) -> Self {
        Self {
            mood,
            languages,
            platforms,
            content_types,
            exclude_titles: None,
        }
    }

    /// Adds titles to exclude from the next batch
    pub fn with_excluded_titles<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_titles = Some(titles.into_iter().map(Into::into).collect());
        self
    }

    /// Checks that every multi-select field has at least one value
    pub fn validate(&self) -> AppResult<()> {
        if self.languages.is_empty() {
            return Err(AppError::InvalidInput(
                "Select at least one language".to_string(),
            ));
        }
        if self.platforms.is_empty() {
            return Err(AppError::InvalidInput(
                "Select at least one platform".to_string(),
            ));
        }
        if self.content_types.is_empty() {
            return Err(AppError::InvalidInput(
                "Select at least one content type".to_string(),
            ));
        }
        Ok(())
    }

    /// Normalized exclusion keys (trimmed, lowercased, blanks dropped)
    pub fn exclusion_keys(&self) -> Vec<String> {
        self.exclude_titles
            .iter()
            .flatten()
            .map(|title| normalize_title(title))
            .filter(|title| !title.is_empty())
            .collect()
    }
}

/// Normalizes a title for exclusion matching
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
