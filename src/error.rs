use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message shown when the provider is unreachable or fails without detail
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to get movie recommendations";

/// Application-level errors
///
/// Transport and validation failures share one classification so the caller
/// only ever has to handle a single descriptive message per submission.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("No API key available. Please provide an OpenAI API key to continue.")]
    MissingCredential,

    #[error("Invalid API key. Please check your OpenAI API key and try again.")]
    AuthenticationFailure,

    #[error("OpenAI API Error: {0}")]
    ProviderError(String),

    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    TransportFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No new recommendations left after excluding previously seen titles")]
    EmptyResult,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::MissingCredential => "missing_credential",
            AppError::AuthenticationFailure => "authentication_failure",
            AppError::ProviderError(_) => "provider_error",
            AppError::Transport(_) | AppError::TransportFailure(_) => "transport_failure",
            AppError::MalformedResponse(_) => "malformed_response",
            AppError::EmptyResult => "empty_result",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Internal(_) => "internal",
        }
    }

    /// Whether the caller should discard any stored credential
    pub fn invalidates_credential(&self) -> bool {
        matches!(self, AppError::AuthenticationFailure)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, message) = match self {
            AppError::MissingCredential | AppError::AuthenticationFailure => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AppError::ProviderError(_) | AppError::MalformedResponse(_) => {
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Transport(ref e) => {
                tracing::error!(error = %e, "Provider request failed");
                (StatusCode::BAD_GATEWAY, GENERIC_FAILURE_MESSAGE.to_string())
            }
            AppError::TransportFailure(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::EmptyResult => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

pub type AppResult<T> = Result<T, AppError>;
