/// OpenAI chat-completions provider
///
/// Sends one POST per call with bearer authentication. No timeout and no
/// retry: a hung request stays pending until the connection resolves.
use crate::{
    error::{AppError, AppResult, GENERIC_FAILURE_MESSAGE},
    models::{ApiErrorResponse, ChatCompletionRequest},
    services::providers::CompletionProvider,
};
use reqwest::{header, Client as HttpClient, StatusCode};

#[derive(Clone)]
pub struct OpenAiProvider {
    http_client: HttpClient,
    api_url: String,
}

impl OpenAiProvider {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// Message of a structured `{"error": {"message": ...}}` body, if present
fn provider_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .map(|response| response.error.message)
        .filter(|message| !message.trim().is_empty())
}

/// Classifies a completed HTTP exchange
fn classify_response(status: StatusCode, body: String) -> AppResult<String> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(AppError::AuthenticationFailure);
    }

    if let Some(message) = provider_error_message(&body) {
        return Err(AppError::ProviderError(message));
    }

    if !status.is_success() {
        return Err(AppError::TransportFailure(GENERIC_FAILURE_MESSAGE.to_string()));
    }

    Ok(body)
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
        credential: &str,
    ) -> AppResult<String> {
        tracing::debug!(
            model = %request.model,
            provider = self.name(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(credential)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let result = classify_response(status, body);

        match &result {
            Ok(body) => tracing::info!(
                status = %status,
                bytes = body.len(),
                provider = self.name(),
                "Chat completion received"
            ),
            Err(e) => tracing::warn!(
                status = %status,
                error = %e,
                provider = self.name(),
                "Chat completion failed"
            ),
        }

        result
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
