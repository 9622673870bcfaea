//! Relationship records — the edges of the graph.
//!
//! An edge connects exactly two distinct persons and lives in exactly one
//! agency. Edges are stored once per unordered pair; direction carries no
//! meaning and reads orient the edge around whichever endpoint the caller
//! is looking from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AgencyId, PersonId, RelationshipId};

// ─── Relationship ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
  pub id:          RelationshipId,
  pub agency_id:   AgencyId,
  pub from_person: PersonId,
  pub to_person:   PersonId,
  /// Free-text kinship label ("mother", "foster sibling"). Optional; an
  /// edge can be recorded before anyone knows what the connection is.
  pub kinship:     Option<String>,
  /// Sealed edges are invisible to non-administrators.
  pub sealed:      bool,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Relationship {
  /// The endpoint opposite `person`, or `None` when `person` is not an
  /// endpoint of this edge.
  pub fn counterpart_of(&self, person: PersonId) -> Option<PersonId> {
    if self.from_person == person {
      Some(self.to_person)
    } else if self.to_person == person {
      Some(self.from_person)
    } else {
      None
    }
  }

  pub fn pair_key(&self) -> (PersonId, PersonId) {
    pair_key(self.from_person, self.to_person)
  }
}

/// Canonical unordered-pair key: the two endpoint ids ordered low-to-high.
/// `(a, b)` and `(b, a)` map to the same key, which is what lets the store
/// enforce one edge per pair regardless of submission order.
pub fn pair_key(a: PersonId, b: PersonId) -> (PersonId, PersonId) {
  if a <= b { (a, b) } else { (b, a) }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Field-wise edit to an existing relationship. `None` leaves the stored
/// value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelationshipPatch {
  pub kinship: Option<String>,
  pub sealed:  Option<bool>,
}

impl RelationshipPatch {
  pub fn is_empty(&self) -> bool {
    self.kinship.is_none() && self.sealed.is_none()
  }

  /// Trim the kinship label; a blank label reads as "leave untouched".
  pub fn normalized(self) -> Self {
    Self {
      kinship: self
        .kinship
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty()),
      sealed:  self.sealed,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
