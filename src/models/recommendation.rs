use serde::{Deserialize, Serialize};

/// Prefix every trailer link is expected to start with
pub const TRAILER_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// A single movie or series recommendation
///
/// Only ever built by the response validator from checked provider output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecommendation {
    pub movie_name: String,
    pub genre: String,
    pub mood: String,
    pub language: String,
    /// Human readable runtime, e.g. "120 mins" or "2 seasons, 16 episodes, ~40 mins each"
    pub duration: String,
    pub platform: String,
    pub cast: Vec<String>,
    pub crew: Crew,
    pub ratings: Ratings,
    pub synopsis: String,
    pub trailer_link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Crew {
    pub director: String,
    pub writers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ratings {
    pub imdb: String,
    #[serde(rename = "rottenTomatoes")]
    pub rotten_tomatoes: String,
}

impl MovieRecommendation {
    /// Whether the trailer link points at a YouTube watch page
    pub fn has_official_trailer_link(&self) -> bool {
        self.trailer_link
            .strip_prefix(TRAILER_URL_PREFIX)
            .is_some_and(|id| !id.is_empty())
    }
}
