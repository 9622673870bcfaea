//! Handlers for relationship endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`   | `/persons/:id/relationships` | Optional `?order=counterpart-name` |
//! | `POST`  | `/persons/:id/relationships` | Body: [`LinkRequest`]; 201 new edge, 200 existing |
//! | `GET`   | `/relationships/:id` | Raw edge record |
//! | `PATCH` | `/relationships/:id` | Kinship label and sealing |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::{
  id::{PersonId, RelationshipId},
  link::LinkRequest,
  relationship::RelationshipPatch,
  store::GraphStore,
  view::{RelationshipRecord, RelationshipView},
};
use kindred_graph::{
  linker, records,
  resolver::{self, EdgeOrder},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::ActorContext, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// Wire form of [`EdgeOrder`].
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderParam {
  Created,
  CounterpartName,
}

impl From<OrderParam> for EdgeOrder {
  fn from(p: OrderParam) -> Self {
    match p {
      OrderParam::Created => EdgeOrder::Created,
      OrderParam::CounterpartName => EdgeOrder::CounterpartName,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub order: Option<OrderParam>,
}

/// `GET /persons/:id/relationships[?order=<order>]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RelationshipView>>, ApiError>
where
  S: GraphStore + 'static,
{
  let order = params.order.map(EdgeOrder::from).unwrap_or_default();
  let views = resolver::resolve_edges(
    store.as_ref(),
    &actor,
    PersonId::from(id),
    order,
  )
  .await?;
  Ok(Json(views))
}

// ─── Link ─────────────────────────────────────────────────────────────────────

/// `POST /persons/:id/relationships` — body: [`LinkRequest`].
///
/// Returns 201 with the new edge's view, or 200 with the existing one when
/// the pair was already connected.
pub async fn link<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
  Json(request): Json<LinkRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GraphStore + 'static,
{
  let result =
    linker::link_person(store.as_ref(), &actor, PersonId::from(id), request)
      .await?;
  let status = if result.created {
    StatusCode::CREATED
  } else {
    StatusCode::OK
  };
  Ok((status, Json(result.view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /relationships/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
) -> Result<Json<RelationshipRecord>, ApiError>
where
  S: GraphStore + 'static,
{
  let record =
    records::get_relationship(store.as_ref(), &actor, RelationshipId::from(id))
      .await?;
  Ok(Json(record))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /relationships/:id` — body: [`RelationshipPatch`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
  Json(patch): Json<RelationshipPatch>,
) -> Result<Json<RelationshipRecord>, ApiError>
where
  S: GraphStore + 'static,
{
  let record = records::update_relationship(
    store.as_ref(),
    &actor,
    RelationshipId::from(id),
    patch,
  )
  .await?;
  Ok(Json(record))
}
