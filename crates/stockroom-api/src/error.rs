//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use stockroom_core::{Error as CoreError, ValidationError};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("invalid request: {0}")]
  Validation(#[from] ValidationError),

  #[error("not found: {0}")]
  NotFound(String),

  /// The request is well-formed but conflicts with current stock.
  #[error("{message}")]
  Conflict {
    message:   String,
    available: i64,
    requested: i64,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(err: CoreError) -> Self {
    match err {
      CoreError::Validation(e) => ApiError::Validation(e),
      CoreError::ItemNotFound(id) => ApiError::NotFound(format!("inventory item {id} not found")),
      CoreError::InsufficientStock { available, requested, .. }
      | CoreError::StockLimitExceeded { available, requested, .. } => ApiError::Conflict {
        message: err.to_string(),
        available,
        requested,
      },
      CoreError::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::Conflict { message, available, requested } => (
        StatusCode::CONFLICT,
        json!({ "error": message, "available": available, "requested": requested }),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed in the store");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
