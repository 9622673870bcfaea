//! Error type for `kindred-graph`.

use kindred_core::{
  ValidationError,
  id::{PersonId, RelationshipId},
};
use kindred_policy::DenyReason;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("relationship not found: {0}")]
  RelationshipNotFound(RelationshipId),

  #[error("forbidden: {0}")]
  Forbidden(DenyReason),

  #[error("validation failed: {}", fields.join(", "))]
  ValidationFailed { fields: Vec<String> },

  /// The storage layer failed. The request itself was well-formed and may
  /// succeed on retry.
  #[error("storage failure: {0}")]
  Infrastructure(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl GraphError {
  /// Wrap a storage error. Existence and permission are settled before the
  /// store is asked to write, so anything the store reports is treated as
  /// infrastructure.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Infrastructure(Box::new(err))
  }
}

impl From<ValidationError> for GraphError {
  fn from(err: ValidationError) -> Self {
    Self::ValidationFailed { fields: err.fields }
  }
}

pub type Result<T, E = GraphError> = std::result::Result<T, E>;
