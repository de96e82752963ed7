use crate::{
    error::{AppError, AppResult},
    models::{MovieRecommendation, UserPreferences},
    services::{prompt, providers::CompletionProvider, validator},
};

/// Generates mood-based watch recommendations
///
/// Composes the chat-completion request, performs exactly one provider round
/// trip and validates the reply. Every failure is terminal for the submission;
/// nothing is retried and no partial batch is ever returned.
pub async fn get_recommendations(
    provider: &dyn CompletionProvider,
    model: &str,
    preferences: &UserPreferences,
    credential: &str,
) -> AppResult<Vec<MovieRecommendation>> {
    let credential = credential.trim();
    if credential.is_empty() {
        return Err(AppError::MissingCredential);
    }

    let request = prompt::compose_request(preferences, model)?;
    let body = provider.complete(&request, credential).await?;
    let movies = validator::validate_response(&body, preferences)?;

    let unofficial_trailers = movies
        .iter()
        .filter(|movie| !movie.has_official_trailer_link())
        .count();
    if unofficial_trailers > 0 {
        tracing::warn!(
            count = unofficial_trailers,
            provider = provider.name(),
            "Recommendations with trailer links outside the YouTube watch format"
        );
    }

    tracing::info!(
        model = %model,
        movie_count = movies.len(),
        exclusion_count = preferences.exclusion_keys().len(),
        provider = provider.name(),
        "Recommendations generated"
    );

    Ok(movies)
}
