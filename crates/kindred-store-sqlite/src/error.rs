//! Error type for `kindred-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A pair link named a keystone or existing person that is not in the
  /// store.
  #[error("person not found: {0}")]
  PersonNotFound(kindred_core::id::PersonId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
