//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kindred_graph::GraphError;
use kindred_policy::DenyReason;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("{0}")]
  Forbidden(DenyReason),

  #[error("validation failed")]
  Validation(Vec<String>),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<GraphError> for ApiError {
  fn from(err: GraphError) -> Self {
    match err {
      GraphError::PersonNotFound(id) => {
        ApiError::NotFound(format!("person {id} not found"))
      }
      GraphError::RelationshipNotFound(id) => {
        ApiError::NotFound(format!("relationship {id} not found"))
      }
      GraphError::Forbidden(reason) => ApiError::Forbidden(reason),
      GraphError::ValidationFailed { fields } => ApiError::Validation(fields),
      GraphError::Infrastructure(source) => ApiError::Store(source),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(message) => (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": message })),
      )
        .into_response(),
      ApiError::Forbidden(reason) => (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": reason.to_string(), "reason": reason })),
      )
        .into_response(),
      ApiError::Validation(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "fields": fields })),
      )
        .into_response(),
      ApiError::BadRequest(message) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message })),
      )
        .into_response(),
      // The retryable class: the record layer was unreachable or failed
      // mid-flight, not that the request was wrong.
      ApiError::Store(e) => (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({ "error": e.to_string() })),
      )
        .into_response(),
    }
  }
}
