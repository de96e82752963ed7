use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON body extractor whose rejections use the `AppError` response shape
///
/// A body that fails to deserialize (unknown mood, missing field, bad syntax)
/// comes back as a 400 `invalid_input` error instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
