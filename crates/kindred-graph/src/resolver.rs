//! Edge resolution — "who is connected to this person".
//!
//! Resolution is a read of everything touching one keystone person, with
//! the access decision applied per edge. Edges the actor may not see are
//! withheld from the listing rather than failing the whole request.

use kindred_core::{
  actor::Actor, id::PersonId, store::GraphStore, view::RelationshipView,
};
use kindred_policy::{Action, Decision, Gate, Resource};

use crate::{GraphError, error::Result, projection::project_edge};

/// How a resolved listing is ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeOrder {
  /// Edge creation order, oldest first.
  #[default]
  Created,
  /// Counterpart display name, case-insensitive. Counterparts with no
  /// renderable name sort after every named one.
  CounterpartName,
}

/// All edges of `keystone` the actor may see, projected and ordered.
///
/// The keystone itself only has to exist; a retired keystone still
/// resolves. Each edge is then screened on its own tenant and sealing, so
/// a listing never leaks an edge the actor could not fetch directly.
pub async fn resolve_edges<S: GraphStore>(
  store: &S,
  actor: &Actor,
  keystone: PersonId,
  order: EdgeOrder,
) -> Result<Vec<RelationshipView>> {
  match kindred_policy::screen(actor) {
    Gate::Refused(reason) => return Err(GraphError::Forbidden(reason)),
    Gate::Granted => {
      if store
        .person_tenant(keystone)
        .await
        .map_err(GraphError::store)?
        .is_none()
      {
        return Err(GraphError::PersonNotFound(keystone));
      }
    }
    Gate::NeedsTenant => {
      let tenant = store
        .person_tenant(keystone)
        .await
        .map_err(GraphError::store)?
        .ok_or(GraphError::PersonNotFound(keystone))?;
      kindred_policy::tenant_gate(actor, tenant).require(GraphError::Forbidden)?;
    }
  }

  let edges = store.edges_for(keystone).await.map_err(GraphError::store)?;

  let mut views: Vec<RelationshipView> = edges
    .iter()
    .filter(|edge| {
      let decision = kindred_policy::authorize_loaded(
        actor,
        Action::ViewRelationship,
        edge.relationship.agency_id,
        Resource::Relationship(&edge.relationship),
      );
      match decision {
        Decision::Allow => true,
        Decision::Deny(reason) => {
          tracing::debug!(
            relationship = %edge.relationship.id,
            %reason,
            "edge withheld from listing"
          );
          false
        }
      }
    })
    .filter_map(|edge| project_edge(edge, keystone))
    .collect();

  if order == EdgeOrder::CounterpartName {
    views.sort_by(|a, b| name_rank(a).cmp(&name_rank(b)));
  }

  Ok(views)
}

/// Sort key for name ordering: named counterparts first, case-folded,
/// ties left in creation order by the stable sort.
fn name_rank(view: &RelationshipView) -> (bool, String) {
  (view.display_name.is_empty(), view.display_name.to_lowercase())
}
