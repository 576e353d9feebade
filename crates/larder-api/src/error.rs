//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A field-level validation failure, rendered as
  /// `{"errors": {"<field>": "<message>"}}`.
  #[error("validation failed on {field}: {message}")]
  Validation { field: String, message: String },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Validation {
      field:   field.into(),
      message: message.into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::Unauthorized => (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "invalid or missing credentials" })),
      )
        .into_response(),
      ApiError::Forbidden(m) => {
        (StatusCode::FORBIDDEN, Json(json!({ "error": m }))).into_response()
      }
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Validation { field, message } => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "errors": { field: message } })),
      )
        .into_response(),
      ApiError::Store(e) => {
        // Never leak backend details to the client.
        tracing::error!(error = %e, "store error while handling request");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
