//! Opaque identifier newtypes.
//!
//! Every id is a UUID behind a dedicated newtype: ids of different record
//! kinds cannot be mixed up, and every equality check runs on one canonical
//! representation. There is no string/number dual form anywhere.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── PersonId ────────────────────────────────────────────────────────────────

/// Identifier of a [`Person`](crate::person::Person) record.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(Uuid);

impl PersonId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for PersonId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── RelationshipId ──────────────────────────────────────────────────────────

/// Identifier of a [`Relationship`](crate::relationship::Relationship) edge.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct RelationshipId(Uuid);

impl RelationshipId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for RelationshipId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for RelationshipId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

// ─── AgencyId ────────────────────────────────────────────────────────────────

/// Identifier of an agency — the tenant and unit of data isolation.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct AgencyId(Uuid);

impl AgencyId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }

  pub fn as_uuid(&self) -> Uuid { self.0 }
}

impl From<Uuid> for AgencyId {
  fn from(id: Uuid) -> Self { Self(id) }
}

impl fmt::Display for AgencyId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}
