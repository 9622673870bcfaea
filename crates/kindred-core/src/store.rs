//! The `GraphStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `kindred-store-sqlite`).
//! Higher layers (`kindred-graph`, `kindred-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  id::{AgencyId, PersonId, RelationshipId},
  person::{NewPerson, Person, PersonUpdate},
  relationship::{Relationship, RelationshipPatch},
};

// ─── Read models ─────────────────────────────────────────────────────────────

/// One edge with both endpoint records attached, as loaded in a single
/// batched read. An endpoint is `None` only when the underlying person row
/// is gone; callers must keep working in that case.
#[derive(Debug, Clone)]
pub struct LoadedEdge {
  pub relationship: Relationship,
  pub from:         Option<Person>,
  pub to:           Option<Person>,
}

impl LoadedEdge {
  /// The endpoint record opposite `keystone`, when loaded.
  pub fn counterpart(&self, keystone: PersonId) -> Option<&Person> {
    if self.relationship.from_person == keystone {
      self.to.as_ref()
    } else if self.relationship.to_person == keystone {
      self.from.as_ref()
    } else {
      None
    }
  }

  /// The endpoint record matching `keystone`, when loaded.
  pub fn keystone(&self, keystone: PersonId) -> Option<&Person> {
    if self.relationship.from_person == keystone {
      self.from.as_ref()
    } else if self.relationship.to_person == keystone {
      self.to.as_ref()
    } else {
      None
    }
  }
}

// ─── Pair-link inputs ────────────────────────────────────────────────────────

/// The person half of a pair link: either a record to create or an existing
/// record to merge new data into.
#[derive(Debug, Clone)]
pub enum PairPerson {
  New(NewPerson),
  Existing {
    id:     PersonId,
    update: PersonUpdate,
  },
}

/// Input to [`GraphStore::link_pair`]. The whole operation commits or rolls
/// back as one unit: the person write and the edge write are never visible
/// separately.
#[derive(Debug, Clone)]
pub struct PairLink {
  /// The person already in the graph that the new edge hangs off.
  pub keystone:  PersonId,
  /// Tenant the edge is created in.
  pub agency_id: AgencyId,
  pub person:    PairPerson,
  pub kinship:   Option<String>,
}

/// Result of [`GraphStore::link_pair`], reloaded from committed state.
#[derive(Debug, Clone)]
pub struct LinkOutcome {
  pub relationship: Relationship,
  pub person:       Person,
  pub keystone:     Person,
  /// `false` when an edge for the pair already existed and was returned
  /// instead of created.
  pub created:      bool,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a kindred graph store backend.
///
/// Tenant checks happen above this trait; the `*_tenant` methods exist so
/// the policy layer can decide on a single scalar without loading the full
/// record. All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait GraphStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Persons ───────────────────────────────────────────────────────────

  /// Owning agency of a person, or `None` if the person does not exist.
  /// Retired persons still resolve.
  fn person_tenant(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<AgencyId>, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List persons, optionally restricted to one agency, ordered by creation
  /// time.
  fn list_persons(
    &self,
    agency: Option<AgencyId>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Create and persist a new person. The id and both timestamps are
  /// assigned by the store.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Merge `update` into an existing person and return the stored record.
  /// Returns `None` if the person does not exist.
  fn update_person(
    &self,
    id: PersonId,
    update: PersonUpdate,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// Mark a person retired. Idempotent: retiring an already-retired person
  /// keeps the original timestamp. Returns `None` if the person does not
  /// exist.
  fn retire_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  // ── Relationships ─────────────────────────────────────────────────────

  /// Owning agency of a relationship, or `None` if it does not exist.
  fn relationship_tenant(
    &self,
    id: RelationshipId,
  ) -> impl Future<Output = Result<Option<AgencyId>, Self::Error>> + Send + '_;

  /// Retrieve a relationship by id. Returns `None` if not found.
  fn get_relationship(
    &self,
    id: RelationshipId,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// Apply `patch` to an existing relationship and return the stored
  /// record. Returns `None` if the relationship does not exist.
  fn update_relationship(
    &self,
    id: RelationshipId,
    patch: RelationshipPatch,
  ) -> impl Future<Output = Result<Option<Relationship>, Self::Error>> + Send + '_;

  /// All edges touching `keystone`, each with both endpoint records
  /// attached, in one batched read. Ordered by edge creation time.
  fn edges_for(
    &self,
    keystone: PersonId,
  ) -> impl Future<Output = Result<Vec<LoadedEdge>, Self::Error>> + Send + '_;

  /// Atomically resolve the person half of `input` (create or merge) and
  /// find-or-create the edge between person and keystone. Under concurrent
  /// submission of the same pair exactly one edge wins; losers observe it
  /// as already existing.
  fn link_pair(
    &self,
    input: PairLink,
  ) -> impl Future<Output = Result<LinkOutcome, Self::Error>> + Send + '_;
}
