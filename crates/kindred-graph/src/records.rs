//! Single-record operations: person reads and writes, retirement, and
//! relationship edits.

use kindred_core::{
  actor::Actor,
  id::{AgencyId, PersonId, RelationshipId},
  person::{NewPerson, PersonDraft, PersonUpdate, RecordOrigin},
  relationship::RelationshipPatch,
  store::GraphStore,
  view::{PersonView, RelationshipRecord},
};
use kindred_policy::{Action, DenyReason, Gate, Resource};

use crate::{GraphError, error::Result, projection};

// ─── Persons ─────────────────────────────────────────────────────────────────

/// Fetch one person. Retired persons still resolve. The tenant check runs
/// on a scalar lookup, so an out-of-tenant caller never causes the full
/// row to be read.
pub async fn get_person<S: GraphStore>(
  store: &S,
  actor: &Actor,
  id: PersonId,
) -> Result<PersonView> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .person_tenant(id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let person = store
    .get_person(id)
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::PersonNotFound(id))?;

  Ok(projection::person_view(&person))
}

/// List persons the actor can see: administrators every agency, workers
/// their own.
pub async fn list_persons<S: GraphStore>(
  store: &S,
  actor: &Actor,
) -> Result<Vec<PersonView>> {
  let scope = match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => None,
    Gate::NeedsTenant => Some(worker_agency(actor)?),
  };

  let persons = store.list_persons(scope).await.map_err(GraphError::store)?;
  Ok(persons.iter().map(projection::person_view).collect())
}

/// Create a person directly, with no edge. Workers create into their own
/// agency; administrators must name the target agency.
pub async fn create_person<S: GraphStore>(
  store: &S,
  actor: &Actor,
  agency_id: Option<AgencyId>,
  draft: PersonDraft,
) -> Result<PersonView> {
  let target = match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => agency_id.ok_or(GraphError::ValidationFailed {
      fields: vec!["agency_id".into()],
    })?,
    Gate::NeedsTenant => {
      let own = worker_agency(actor)?;
      if let Some(requested) = agency_id {
        kindred_policy::tenant_gate(actor, requested)
          .require(GraphError::Forbidden)?;
      }
      own
    }
  };

  let draft = draft.normalized();
  draft.validate()?;
  if draft.id.is_some() {
    return Err(GraphError::ValidationFailed {
      fields: vec!["id".into()],
    });
  }

  let person = store
    .create_person(NewPerson {
      agency_id:   target,
      first_name:  draft.first_name,
      middle_name: draft.middle_name,
      last_name:   draft.last_name,
      deceased:    draft.deceased,
      origin:      RecordOrigin::Manual,
    })
    .await
    .map_err(GraphError::store)?;

  tracing::info!(person = %person.id, agency = %person.agency_id, "person created");
  Ok(projection::person_view(&person))
}

/// Merge new data into a person. Updates add or replace fields, never
/// blank them.
pub async fn update_person<S: GraphStore>(
  store: &S,
  actor: &Actor,
  id: PersonId,
  update: PersonUpdate,
) -> Result<PersonView> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .person_tenant(id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let person = store
    .update_person(id, update.normalized())
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::PersonNotFound(id))?;

  Ok(projection::person_view(&person))
}

/// Retire a person. The record keeps resolving and existing edges keep
/// listing; only new links are refused from now on. Repeats are no-ops.
pub async fn retire_person<S: GraphStore>(
  store: &S,
  actor: &Actor,
  id: PersonId,
) -> Result<PersonView> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .person_tenant(id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let person = store
    .retire_person(id)
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::PersonNotFound(id))?;

  tracing::info!(person = %person.id, "person retired");
  Ok(projection::person_view(&person))
}

// ─── Relationships ───────────────────────────────────────────────────────────

/// Fetch one relationship. Tenant is checked on a scalar lookup before the
/// record itself is read; sealing is checked on the loaded record.
pub async fn get_relationship<S: GraphStore>(
  store: &S,
  actor: &Actor,
  id: RelationshipId,
) -> Result<RelationshipRecord> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .relationship_tenant(id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::RelationshipNotFound(id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let relationship = store
    .get_relationship(id)
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::RelationshipNotFound(id))?;

  kindred_policy::resource_rule(
    actor,
    Action::ViewRelationship,
    Resource::Relationship(&relationship),
  )
  .require(GraphError::Forbidden)?;

  Ok(projection::relationship_record(&relationship))
}

/// Edit a relationship's label or sealing. Sealing is inspected on the
/// stored record before the patch applies, so a worker cannot edit their
/// way into a sealed edge.
pub async fn update_relationship<S: GraphStore>(
  store: &S,
  actor: &Actor,
  id: RelationshipId,
  patch: RelationshipPatch,
) -> Result<RelationshipRecord> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .relationship_tenant(id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::RelationshipNotFound(id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let current = store
    .get_relationship(id)
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::RelationshipNotFound(id))?;

  kindred_policy::resource_rule(
    actor,
    Action::EditRelationship,
    Resource::Relationship(&current),
  )
  .require(GraphError::Forbidden)?;

  let updated = store
    .update_relationship(id, patch.normalized())
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::RelationshipNotFound(id))?;

  Ok(projection::relationship_record(&updated))
}

/// A case worker acting without a home agency has nothing to be scoped
/// to; treat it as a tenant refusal rather than a panic or a wide-open
/// listing.
fn worker_agency(actor: &Actor) -> Result<AgencyId> {
  actor
    .agency
    .ok_or(GraphError::Forbidden(DenyReason::TenantMismatch))
}
