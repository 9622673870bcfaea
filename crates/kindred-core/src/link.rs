//! Link requests — the input shape of the ingestion path.

use serde::{Deserialize, Serialize};

use crate::person::PersonDraft;

// ─── Source record ───────────────────────────────────────────────────────────

/// Raw external record a linked person was built from, kept for provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRecord {
  /// Name of the search provider the record came from.
  pub provider: String,
  /// The record as the provider returned it.
  pub record:   serde_json::Value,
}

// ─── Link request ────────────────────────────────────────────────────────────

/// Request to attach a person to a keystone already in the graph. The
/// person may be brand new (no `id` on the draft), an existing record to
/// merge data into, or an external search result carrying its source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkRequest {
  pub person:  PersonDraft,
  /// Kinship label for the new edge.
  pub kinship: Option<String>,
  /// Present when the draft came from the external person search.
  pub source:  Option<SourceRecord>,
}
