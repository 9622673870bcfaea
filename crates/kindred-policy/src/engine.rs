//! The evaluation steps, in the order callers run them.
//!
//! 1. [`screen`] — role shortcuts, needs only the actor.
//! 2. [`tenant_gate`] — agency comparison, needs only the record's owning
//!    agency id.
//! 3. [`resource_rule`] — record rules, needs the loaded record.
//!
//! A refusal at any step ends evaluation; later steps never run. Callers
//! that already hold the record can use [`authorize_loaded`] to run the
//! whole sequence at once.

use kindred_core::{
  actor::{Actor, Role},
  id::AgencyId,
  person::Person,
  relationship::Relationship,
};
use serde::Serialize;

use crate::decision::{Decision, DenyReason, Gate};

// ─── Actions ─────────────────────────────────────────────────────────────────

/// What the actor is trying to do. Only actions a record rule can refuse
/// are distinguished; creation and retirement of persons are governed by
/// the screen and tenant steps alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
  ViewPerson,
  ViewRelationship,
  CreateRelationship,
  EditRelationship,
}

// ─── Resources ───────────────────────────────────────────────────────────────

/// The loaded record an action targets.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
  Person(&'a Person),
  Relationship(&'a Relationship),
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// Role screen. A `Refused` here means the caller must not touch the store
/// at all on this actor's behalf.
pub fn screen(actor: &Actor) -> Gate {
  match actor.role {
    Role::Administrator => Gate::Granted,
    Role::Restricted => Gate::Refused(DenyReason::RoleForbidden),
    Role::CaseWorker => Gate::NeedsTenant,
  }
}

/// Agency comparison. `tenant` is the owning agency of the target record,
/// as loaded by a scalar lookup; the full record is not needed here.
pub fn tenant_gate(actor: &Actor, tenant: AgencyId) -> Decision {
  if actor.agency == Some(tenant) {
    Decision::Allow
  } else {
    Decision::Deny(DenyReason::TenantMismatch)
  }
}

/// Record rules, run last on the loaded record. Administrators are exempt:
/// sealed edges and retired persons refuse only non-administrators.
pub fn resource_rule(
  actor: &Actor,
  action: Action,
  resource: Resource<'_>,
) -> Decision {
  if actor.role == Role::Administrator {
    return Decision::Allow;
  }
  match resource {
    Resource::Person(person) => {
      if action == Action::CreateRelationship && person.is_retired() {
        return Decision::Deny(DenyReason::RetiredRecord);
      }
    }
    Resource::Relationship(relationship) => {
      let sees_record = matches!(
        action,
        Action::ViewRelationship | Action::EditRelationship
      );
      if sees_record && relationship.sealed {
        return Decision::Deny(DenyReason::SealedRecord);
      }
    }
  }
  Decision::Allow
}

/// All three steps for a record the caller has already loaded.
pub fn authorize_loaded(
  actor: &Actor,
  action: Action,
  tenant: AgencyId,
  resource: Resource<'_>,
) -> Decision {
  match screen(actor) {
    Gate::Granted => Decision::Allow,
    Gate::Refused(reason) => Decision::Deny(reason),
    Gate::NeedsTenant => match tenant_gate(actor, tenant) {
      Decision::Deny(reason) => Decision::Deny(reason),
      Decision::Allow => resource_rule(actor, action, resource),
    },
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
