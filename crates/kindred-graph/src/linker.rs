//! Ingestion — attaching a person to the graph in one step.
//!
//! A link submission carries a keystone (the person already on screen) and
//! a draft of the person to connect: brand new, an existing record to merge
//! data into, or an external search result with its raw source attached.
//! The person write and the edge write commit together or not at all.

use kindred_core::{
  actor::Actor,
  id::PersonId,
  link::{LinkRequest, SourceRecord},
  person::{NewPerson, RecordOrigin},
  store::{GraphStore, PairLink, PairPerson},
  view::RelationshipView,
};
use kindred_policy::{Action, Gate, Resource};
use sha2::{Digest, Sha256};

use crate::{GraphError, error::Result, projection::project_pair};

/// Result of a link submission.
#[derive(Debug, Clone)]
pub struct LinkResult {
  pub view:    RelationshipView,
  /// `false` when the pair was already connected and the existing edge was
  /// returned instead.
  pub created: bool,
}

/// Attach the person described by `request` to `keystone`.
///
/// Nothing is validated or written for a caller who may not touch this
/// part of the graph; the keystone decision comes first, on a tenant
/// scalar lookup, before the keystone row itself is read. Draft data
/// merges into an existing person only where a direct update would be
/// allowed; the association itself may cross tenants.
pub async fn link_person<S: GraphStore>(
  store: &S,
  actor: &Actor,
  keystone_id: PersonId,
  request: LinkRequest,
) -> Result<LinkResult> {
  let gate = kindred_policy::screen(actor);
  match gate {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {}
    Gate::NeedsTenant => {
      let tenant = store
        .person_tenant(keystone_id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(keystone_id))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let keystone = store
    .get_person(keystone_id)
    .await
    .map_err(GraphError::store)?
    .ok_or(GraphError::PersonNotFound(keystone_id))?;

  // Retirement refuses new links at the keystone end.
  kindred_policy::resource_rule(
    actor,
    Action::CreateRelationship,
    Resource::Person(&keystone),
  )
  .require(GraphError::Forbidden)?;

  let draft = request.person.normalized();
  draft.validate()?;

  if draft.id == Some(keystone.id) {
    return Err(GraphError::ValidationFailed {
      fields: vec!["person_id".into()],
    });
  }

  let person = match draft.id {
    Some(existing_id) => {
      let existing = store
        .get_person(existing_id)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(existing_id))?;

      // The association may cross tenants; merging draft data into the
      // record may not. A data-carrying draft is an edit of the existing
      // person and follows the same tenant rule as a direct update.
      let update = draft.as_update();
      if !update.is_empty() && gate == Gate::NeedsTenant {
        kindred_policy::tenant_gate(actor, existing.agency_id)
          .require(GraphError::Forbidden)?;
      }

      // The retirement rule applies at this end of the pair too.
      kindred_policy::resource_rule(
        actor,
        Action::CreateRelationship,
        Resource::Person(&existing),
      )
      .require(GraphError::Forbidden)?;

      PairPerson::Existing {
        id: existing.id,
        update,
      }
    }
    None => PairPerson::New(NewPerson {
      agency_id:   keystone.agency_id,
      first_name:  draft.first_name.clone(),
      middle_name: draft.middle_name.clone(),
      last_name:   draft.last_name.clone(),
      deceased:    draft.deceased,
      origin:      origin_of(request.source.as_ref()),
    }),
  };

  let outcome = store
    .link_pair(PairLink {
      keystone:  keystone.id,
      agency_id: keystone.agency_id,
      person,
      kinship:   request.kinship,
    })
    .await
    .map_err(GraphError::store)?;

  tracing::info!(
    relationship = %outcome.relationship.id,
    keystone = %outcome.keystone.id,
    person = %outcome.person.id,
    created = outcome.created,
    "pair linked"
  );

  let view =
    project_pair(&outcome.relationship, &outcome.keystone, &outcome.person);
  Ok(LinkResult {
    view,
    created: outcome.created,
  })
}

/// Provenance for a newly created person: imported when the draft came
/// from an external search, manual otherwise.
fn origin_of(source: Option<&SourceRecord>) -> RecordOrigin {
  match source {
    Some(source) => RecordOrigin::Imported {
      source_name: source.provider.clone(),
      fingerprint: fingerprint(&source.record),
    },
    None => RecordOrigin::Manual,
  }
}

/// SHA-256 over the compact JSON encoding of the raw source record.
fn fingerprint(record: &serde_json::Value) -> String {
  let mut hasher = Sha256::new();
  hasher.update(record.to_string().as_bytes());
  hex::encode(hasher.finalize())
}
