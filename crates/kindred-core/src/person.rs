//! Person records — the nodes of the relationship graph.
//!
//! A person is owned by exactly one agency for its whole lifetime. Records
//! are never hard-deleted; retirement tombstones them and they keep
//! resolving safely through the projection layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  error::ValidationError,
  id::{AgencyId, PersonId},
};

// ─── Provenance ──────────────────────────────────────────────────────────────

/// How a person record entered the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordOrigin {
  /// Entered directly by agency staff during case work.
  #[default]
  Manual,
  /// Created by the person-search integration from an external record.
  Imported {
    /// Human-readable name of the search provider.
    source_name: String,
    /// SHA-256 hex digest of the raw source record.
    fingerprint: String,
  },
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A person known to an agency: a child on a case, a relative, a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
  pub id:          PersonId,
  pub agency_id:   AgencyId,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  /// Tri-state: `None` means no source ever said either way. An explicit
  /// `Some(false)` must survive as-is; the two are collapsed to a plain
  /// `false` only at the projection boundary.
  pub deceased:    Option<bool>,
  /// Tombstone marker; set once, never cleared.
  pub retired_at:  Option<DateTime<Utc>>,
  pub origin:      RecordOrigin,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Person {
  pub fn is_retired(&self) -> bool { self.retired_at.is_some() }

  /// True when at least one of first/last name is present and non-empty.
  pub fn has_renderable_name(&self) -> bool {
    filled(&self.first_name) || filled(&self.last_name)
  }

  /// All present name parts joined by single spaces. Empty string when no
  /// part is present.
  pub fn display_name(&self) -> String {
    [&self.first_name, &self.middle_name, &self.last_name]
      .into_iter()
      .filter_map(|part| part.as_deref())
      .map(str::trim)
      .filter(|part| !part.is_empty())
      .collect::<Vec<_>>()
      .join(" ")
  }

  /// Relative URL of the person's profile page. Present only while the
  /// record is live and carries a renderable name; retired or nameless
  /// records must not be pointed at.
  pub fn profile_link(&self) -> Option<String> {
    (!self.is_retired() && self.has_renderable_name())
      .then(|| format!("/persons/{}", self.id))
  }
}

fn filled(s: &Option<String>) -> bool {
  s.as_deref().is_some_and(|v| !v.trim().is_empty())
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`GraphStore::create_person`](crate::store::GraphStore::create_person).
/// `id` and both timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPerson {
  pub agency_id:   AgencyId,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub deceased:    Option<bool>,
  pub origin:      RecordOrigin,
}

/// Field-wise merge applied to an existing person. `None` leaves the stored
/// value untouched; updates can add or replace data but never blank it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonUpdate {
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub deceased:    Option<bool>,
}

impl PersonUpdate {
  /// Trim whitespace and turn empty strings into `None`, so a blank field
  /// reads as "leave untouched" rather than "erase".
  pub fn normalized(self) -> Self {
    Self {
      first_name:  clean(self.first_name),
      middle_name: clean(self.middle_name),
      last_name:   clean(self.last_name),
      deceased:    self.deceased,
    }
  }

  /// True when applying the update would change nothing.
  pub fn is_empty(&self) -> bool {
    self.first_name.is_none()
      && self.middle_name.is_none()
      && self.last_name.is_none()
      && self.deceased.is_none()
  }
}

/// Partially-populated person data as supplied by callers — the direct
/// case-entry form or the external person search. Shape is checked here at
/// the boundary; internal components only ever see normalized values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonDraft {
  /// Present when the draft refers to an already-persisted person.
  pub id:          Option<PersonId>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub deceased:    Option<bool>,
}

impl PersonDraft {
  /// Trim whitespace and drop empty strings, so `Some("")` and `None`
  /// cannot mean different things downstream.
  pub fn normalized(self) -> Self {
    Self {
      id:          self.id,
      first_name:  clean(self.first_name),
      middle_name: clean(self.middle_name),
      last_name:   clean(self.last_name),
      deceased:    self.deceased,
    }
  }

  /// A draft that would create a new person must carry at least one of
  /// first/last name — a nameless node is unrenderable everywhere
  /// downstream. Call on a [`normalized`](Self::normalized) draft.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.id.is_none() && self.first_name.is_none() && self.last_name.is_none()
    {
      return Err(ValidationError::missing(&["first_name", "last_name"]));
    }
    Ok(())
  }

  /// The update half of the draft, for the existing-person path.
  pub fn as_update(&self) -> PersonUpdate {
    PersonUpdate {
      first_name:  self.first_name.clone(),
      middle_name: self.middle_name.clone(),
      last_name:   self.last_name.clone(),
      deceased:    self.deceased,
    }
  }
}

fn clean(s: Option<String>) -> Option<String> {
  s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn person(first: Option<&str>, last: Option<&str>) -> Person {
    Person {
      id:          PersonId::new(),
      agency_id:   AgencyId::new(),
      first_name:  first.map(str::to_string),
      middle_name: None,
      last_name:   last.map(str::to_string),
      deceased:    None,
      retired_at:  None,
      origin:      RecordOrigin::Manual,
      created_at:  Utc::now(),
      updated_at:  Utc::now(),
    }
  }

  #[test]
  fn display_name_joins_present_parts() {
    let mut p = person(Some("Ada"), Some("Quinn"));
    p.middle_name = Some("R".into());
    assert_eq!(p.display_name(), "Ada R Quinn");
  }

  #[test]
  fn display_name_skips_blank_parts() {
    let p = person(Some("  "), Some("Quinn"));
    assert_eq!(p.display_name(), "Quinn");
    assert!(p.has_renderable_name());
  }

  #[test]
  fn nameless_person_is_not_renderable() {
    let p = person(None, None);
    assert!(!p.has_renderable_name());
    assert_eq!(p.display_name(), "");
    assert!(p.profile_link().is_none());
  }

  #[test]
  fn retired_person_has_no_profile_link() {
    let mut p = person(Some("Ada"), Some("Quinn"));
    p.retired_at = Some(Utc::now());
    assert!(p.profile_link().is_none());
  }

  #[test]
  fn profile_link_embeds_the_id() {
    let p = person(Some("Ada"), None);
    assert_eq!(p.profile_link().unwrap(), format!("/persons/{}", p.id));
  }

  #[test]
  fn blank_update_fields_normalize_to_empty() {
    let update = PersonUpdate {
      first_name: Some("  ".into()),
      ..Default::default()
    }
    .normalized();
    assert!(update.is_empty());

    let explicit = PersonUpdate {
      deceased: Some(false),
      ..Default::default()
    };
    assert!(!explicit.is_empty());
  }

  #[test]
  fn draft_normalization_drops_empty_strings() {
    let draft = PersonDraft {
      first_name: Some("  ".into()),
      last_name:  Some(" Quinn ".into()),
      ..Default::default()
    }
    .normalized();
    assert_eq!(draft.first_name, None);
    assert_eq!(draft.last_name.as_deref(), Some("Quinn"));
  }

  #[test]
  fn draft_without_any_name_fails_validation() {
    let draft = PersonDraft::default().normalized();
    let err = draft.validate().unwrap_err();
    assert_eq!(err.fields, vec!["first_name", "last_name"]);
  }

  #[test]
  fn draft_with_existing_id_passes_validation_without_names() {
    let draft = PersonDraft {
      id: Some(PersonId::new()),
      ..Default::default()
    }
    .normalized();
    assert!(draft.validate().is_ok());
  }
}
