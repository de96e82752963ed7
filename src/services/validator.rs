//! Turns the provider's untyped reply into a checked recommendation batch.
//!
//! Everything here is a pure function of its inputs: the same raw body and
//! preferences always yield the same result.

use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{
        normalize_title, ApiCompletionResponse, Crew, MovieRecommendation, Ratings,
        UserPreferences,
    },
};

/// A structural defect found in the provider's reply
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("invalid response format from provider: missing choices[0].message.content")]
    MissingContent,

    #[error("response content is not valid JSON: {0}")]
    Unparsable(String),

    #[error("response must be a JSON object containing a movies array")]
    MissingMovies,

    #[error("response contained an empty movies array")]
    NoMovies,

    #[error("movies[{index}]: recommendation must be a JSON object")]
    NotAnObject { index: usize },

    #[error("movies[{index}]: missing required field: {field}")]
    MissingField { index: usize, field: String },

    #[error("movies[{index}]: invalid format for field: {field} - must be {expected}")]
    WrongType {
        index: usize,
        field: String,
        expected: &'static str,
    },

    #[error("movies[{index}]: field {field} must not be empty")]
    EmptyField { index: usize, field: String },
}

impl From<SchemaError> for AppError {
    fn from(err: SchemaError) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Validates a raw provider reply and applies the preferences' exclusion list
///
/// Fails on the first defect: a single malformed element rejects the whole
/// batch. The returned batch keeps the model's ordering.
pub fn validate_response(
    raw_body: &str,
    preferences: &UserPreferences,
) -> AppResult<Vec<MovieRecommendation>> {
    let content = extract_content(raw_body)?;
    let movies = parse_movies(&content)?;
    let remaining = exclude_titles(movies, &preferences.exclusion_keys());

    if remaining.is_empty() {
        return Err(AppError::EmptyResult);
    }

    Ok(remaining)
}

/// Pulls `choices[0].message.content` out of the reply envelope
pub fn extract_content(raw_body: &str) -> Result<String, SchemaError> {
    serde_json::from_str::<ApiCompletionResponse>(raw_body)
        .ok()
        .and_then(ApiCompletionResponse::into_content)
        .ok_or(SchemaError::MissingContent)
}

/// Removes a leading and trailing Markdown code fence, if present
///
/// The opening fence may carry a language tag (```` ```json ````).
pub fn strip_code_fences(content: &str) -> &str {
    let mut text = content.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parses the model's text and checks every element of the `movies` array
pub fn parse_movies(content: &str) -> Result<Vec<MovieRecommendation>, SchemaError> {
    let value: Value = serde_json::from_str(strip_code_fences(content))
        .map_err(|e| SchemaError::Unparsable(e.to_string()))?;

    let movies = value
        .get("movies")
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingMovies)?;

    if movies.is_empty() {
        return Err(SchemaError::NoMovies);
    }

    movies
        .iter()
        .enumerate()
        .map(|(index, movie)| validate_movie(index, movie))
        .collect()
}

/// Drops recommendations whose name matches one of the normalized keys
pub fn exclude_titles(
    movies: Vec<MovieRecommendation>,
    exclusion_keys: &[String],
) -> Vec<MovieRecommendation> {
    if exclusion_keys.is_empty() {
        return movies;
    }

    movies
        .into_iter()
        .filter(|movie| !exclusion_keys.contains(&normalize_title(&movie.movie_name)))
        .collect()
}

fn validate_movie(index: usize, movie: &Value) -> Result<MovieRecommendation, SchemaError> {
    let fields = FieldChecker::new(index, movie)?;

    let movie_name = fields.non_empty_string("movie_name")?;
    let genre = fields.string("genre")?;
    let mood = fields.string("mood")?;
    let language = fields.string("language")?;
    let duration = fields.non_empty_string("duration")?;
    let platform = fields.string("platform")?;
    let cast = fields.string_array("cast")?;

    let crew = fields.nested("crew")?;
    let director = crew.non_empty_string("director")?;
    let writers = crew.string_array("writers")?;

    let ratings = fields.nested("ratings")?;
    let imdb = ratings.non_empty_string("imdb")?;
    let rotten_tomatoes = ratings.non_empty_string("rottenTomatoes")?;

    let synopsis = fields.string("synopsis")?;
    let trailer_link = fields.string("trailer_link")?;

    Ok(MovieRecommendation {
        movie_name,
        genre,
        mood,
        language,
        duration,
        platform,
        cast,
        crew: Crew { director, writers },
        ratings: Ratings {
            imdb,
            rotten_tomatoes,
        },
        synopsis,
        trailer_link,
    })
}

/// Field accessor for one JSON object, reporting defects with their full path
struct FieldChecker<'a> {
    index: usize,
    prefix: String,
    object: &'a Map<String, Value>,
}

impl<'a> FieldChecker<'a> {
    fn new(index: usize, value: &'a Value) -> Result<Self, SchemaError> {
        let object = value.as_object().ok_or(SchemaError::NotAnObject { index })?;
        Ok(Self {
            index,
            prefix: String::new(),
            object,
        })
    }

    fn path(&self, field: &str) -> String {
        format!("{}{}", self.prefix, field)
    }

    fn get(&self, field: &str) -> Result<&'a Value, SchemaError> {
        self.object.get(field).ok_or_else(|| SchemaError::MissingField {
            index: self.index,
            field: self.path(field),
        })
    }

    fn wrong_type(&self, field: &str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            index: self.index,
            field: self.path(field),
            expected,
        }
    }

    fn string(&self, field: &str) -> Result<String, SchemaError> {
        self.get(field)?
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.wrong_type(field, "a string"))
    }

    fn non_empty_string(&self, field: &str) -> Result<String, SchemaError> {
        let value = self.string(field)?;
        if value.trim().is_empty() {
            return Err(SchemaError::EmptyField {
                index: self.index,
                field: self.path(field),
            });
        }
        Ok(value)
    }

    fn string_array(&self, field: &str) -> Result<Vec<String>, SchemaError> {
        let items = self
            .get(field)?
            .as_array()
            .ok_or_else(|| self.wrong_type(field, "an array"))?;

        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.wrong_type(field, "an array of strings"))
            })
            .collect()
    }

    fn nested(&self, field: &str) -> Result<FieldChecker<'a>, SchemaError> {
        let object = self
            .get(field)?
            .as_object()
            .ok_or_else(|| self.wrong_type(field, "an object"))?;

        Ok(FieldChecker {
            index: self.index,
            prefix: format!("{}.", self.path(field)),
            object,
        })
    }
}
