/// Chat-completion provider abstraction
///
/// A provider performs exactly one network round trip per call and classifies
/// the outcome; turning the body into recommendations is left to the
/// validator.
use crate::{error::AppResult, models::ChatCompletionRequest};

pub mod openai;

pub use openai::OpenAiProvider;

/// Trait for chat-completion transports
///
/// Implementations must map an unauthorized reply to
/// `AppError::AuthenticationFailure`, a structured provider error to
/// `AppError::ProviderError`, and anything else that went wrong to a transport
/// failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the request and return the raw response body
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
        credential: &str,
    ) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
