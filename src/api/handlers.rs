use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{PreferenceOptions, RecommendationsResponse, UserPreferences},
    services::recommendations,
};

use super::{extract::AppJson, AppState};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SetCredentialRequest {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct CredentialStatusResponse {
    pub configured: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Every value the preferences form can offer
pub async fn get_options() -> Json<PreferenceOptions> {
    Json(PreferenceOptions::default())
}

/// Whether a stored API key is available
pub async fn get_credential_status(
    State(state): State<AppState>,
) -> Json<CredentialStatusResponse> {
    Json(CredentialStatusResponse {
        configured: state.credentials.is_configured().await,
    })
}

/// Store the API key used by later submissions
pub async fn set_credential(
    State(state): State<AppState>,
    AppJson(request): AppJson<SetCredentialRequest>,
) -> AppResult<StatusCode> {
    if request.api_key.trim().is_empty() {
        return Err(AppError::InvalidInput("API key cannot be empty".to_string()));
    }

    state.credentials.set(request.api_key).await;
    tracing::info!("Stored API key updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Forget the stored API key
pub async fn clear_credential(State(state): State<AppState>) -> StatusCode {
    state.credentials.clear().await;
    tracing::info!("Stored API key cleared");
    StatusCode::NO_CONTENT
}

/// Generate recommendations for a set of preferences
///
/// A bearer token on the request takes precedence over the stored key. When
/// the provider rejects the stored key it is discarded so the caller can
/// prompt for a new one.
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
    AppJson(preferences): AppJson<UserPreferences>,
) -> AppResult<Json<RecommendationsResponse>> {
    preferences.validate()?;

    let credential = match bearer_token(&headers) {
        Some(token) => token,
        None => state
            .credentials
            .get()
            .await
            .ok_or(AppError::MissingCredential)?,
    };

    tracing::info!(
        request_id = %request_id,
        mood = ?preferences.mood,
        languages = preferences.languages.len(),
        platforms = preferences.platforms.len(),
        excluded = preferences.exclusion_keys().len(),
        "Processing recommendation request"
    );

    let result = recommendations::get_recommendations(
        state.provider.as_ref(),
        &state.model,
        &preferences,
        &credential,
    )
    .await;

    match result {
        Ok(movies) => {
            tracing::info!(
                request_id = %request_id,
                movie_count = movies.len(),
                "Recommendations completed"
            );
            Ok(Json(RecommendationsResponse { movies }))
        }
        Err(e) => {
            if e.invalidates_credential() && state.credentials.invalidate(&credential).await {
                tracing::warn!(request_id = %request_id, "Stored API key rejected and cleared");
            }
            tracing::warn!(
                request_id = %request_id,
                kind = e.kind(),
                error = %e,
                "Recommendation request failed"
            );
            Err(e)
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
