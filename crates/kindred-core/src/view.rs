//! Read-side projections — the only shapes that leave the service.
//!
//! Every field is always present and never null: absent or unrenderable
//! data becomes an empty string or `false` at projection time, so no
//! consumer ever needs a null check.

use serde::{Deserialize, Serialize};

use crate::id::{AgencyId, PersonId, RelationshipId};

// ─── Relationship view ───────────────────────────────────────────────────────

/// One edge as seen from a keystone person. Flat and render-ready.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipView {
  pub relationship_id:        RelationshipId,
  pub counterpart_id:         PersonId,
  /// Counterpart's name, or `""` when the record is missing or nameless.
  pub display_name:           String,
  /// Counterpart's profile URL, or `""` when there is nothing to link to.
  pub profile_link:           String,
  /// `true` only when a source explicitly said so.
  pub is_deceased:            bool,
  /// Name of the person the listing is anchored on, projected by the same
  /// rules as `display_name`.
  pub keystone_display_name:  String,
  /// Kinship label, or `""` when none was recorded.
  pub kinship:                String,
}

// ─── Person view ─────────────────────────────────────────────────────────────

/// A person record projected for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
  pub id:           PersonId,
  pub agency_id:    AgencyId,
  pub display_name: String,
  pub profile_link: String,
  pub is_deceased:  bool,
  pub is_retired:   bool,
}

// ─── Relationship record ─────────────────────────────────────────────────────

/// An edge projected for its own detail endpoints, without a keystone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
  pub relationship_id: RelationshipId,
  pub agency_id:       AgencyId,
  pub from_person:     PersonId,
  pub to_person:       PersonId,
  pub kinship:         String,
  pub sealed:          bool,
}
