//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::multipart::MultipartError,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use lastseen_core::{photo::PhotoRejection, schema::ValidationErrors};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("rejected photo: {0}")]
  Photo(#[from] PhotoRejection),

  #[error("invalid report: {0}")]
  Validation(#[from] ValidationErrors),

  /// Store and filesystem failures. Never shown to the client.
  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    ApiError::Internal(Box::new(e))
  }

  pub(crate) fn report_not_found() -> Self {
    ApiError::NotFound("Missing person not found".into())
  }
}

impl From<MultipartError> for ApiError {
  fn from(e: MultipartError) -> Self {
    ApiError::BadRequest(format!("Upload error: {}", e.body_text()))
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Photo(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "request failed");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "An unexpected error occurred".to_owned(),
        )
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
