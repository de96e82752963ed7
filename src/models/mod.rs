use serde::{Deserialize, Serialize};

pub mod recommendation;
pub mod user_preferences;

pub use recommendation::{Crew, MovieRecommendation, Ratings, TRAILER_URL_PREFIX};
pub use user_preferences::{
    normalize_title, ContentType, Language, Mood, Platform, UserPreferences,
};

// ============================================================================
// Chat Completion API Types
// ============================================================================

/// Request body sent to the chat-completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: ResponseFormat,
}

/// One conversational turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Requested shape of the model's reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Reply envelope from the chat-completion endpoint
///
/// Every field is optional so that a malformed envelope can be reported as
/// such instead of failing deserialization outright.
#[derive(Debug, Deserialize)]
pub struct ApiCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ApiChoice {
    #[serde(default)]
    pub message: Option<ApiChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ApiChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ApiCompletionResponse {
    /// Text content of the first choice, if any
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
    }
}

/// Structured error body returned by the provider
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

// ============================================================================
// HTTP Surface Types
// ============================================================================

/// Response body of the recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub movies: Vec<MovieRecommendation>,
}

/// Every value a preferences form can offer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceOptions {
    pub moods: Vec<Mood>,
    pub languages: Vec<Language>,
    pub platforms: Vec<Platform>,
    pub content_types: Vec<ContentType>,
}

impl Default for PreferenceOptions {
    fn default() -> Self {
        Self {
            moods: Mood::ALL.to_vec(),
            languages: Language::ALL.to_vec(),
            platforms: Platform::ALL.to_vec(),
            content_types: ContentType::ALL.to_vec(),
        }
    }
}
