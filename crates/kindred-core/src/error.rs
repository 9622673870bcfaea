//! Shared validation error type.

// ─── Validation ──────────────────────────────────────────────────────────────

/// Input rejected before any write was attempted. `fields` names the exact
/// offending fields so callers can surface them to the submitting user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", fields.join(", "))]
pub struct ValidationError {
  pub fields: Vec<String>,
}

impl ValidationError {
  pub fn new(fields: Vec<String>) -> Self { Self { fields } }

  pub fn missing(fields: &[&str]) -> Self {
    Self {
      fields: fields.iter().map(|f| f.to_string()).collect(),
    }
  }
}
