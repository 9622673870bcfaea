//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`   | `/persons` | Scoped to the actor's agency; admins see all |
//! | `POST`  | `/persons` | Body: [`CreatePersonBody`]; returns 201 + view |
//! | `GET`   | `/persons/:id` | 404 if not found, 403 if out of tenant |
//! | `PATCH` | `/persons/:id` | Merge body fields; never blanks data |
//! | `POST`  | `/persons/:id/retire` | Tombstone; repeats are no-ops |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::{
  id::{AgencyId, PersonId},
  person::{PersonDraft, PersonUpdate},
  store::GraphStore,
  view::PersonView,
};
use kindred_graph::records;
use serde::Deserialize;
use uuid::Uuid;

use crate::{actor::ActorContext, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /persons`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
) -> Result<Json<Vec<PersonView>>, ApiError>
where
  S: GraphStore + 'static,
{
  let persons = records::list_persons(store.as_ref(), &actor).await?;
  Ok(Json(persons))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /persons`.
#[derive(Debug, Deserialize)]
pub struct CreatePersonBody {
  /// Target agency. Workers may omit it (their own agency is used);
  /// administrators must name one.
  pub agency_id:   Option<AgencyId>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub deceased:    Option<bool>,
}

impl From<CreatePersonBody> for PersonDraft {
  fn from(b: CreatePersonBody) -> Self {
    PersonDraft {
      id:          None,
      first_name:  b.first_name,
      middle_name: b.middle_name,
      last_name:   b.last_name,
      deceased:    b.deceased,
    }
  }
}

/// `POST /persons` — returns 201 + the stored person's view.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Json(body): Json<CreatePersonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: GraphStore + 'static,
{
  let agency_id = body.agency_id;
  let view =
    records::create_person(store.as_ref(), &actor, agency_id, body.into())
      .await?;
  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonView>, ApiError>
where
  S: GraphStore + 'static,
{
  let view =
    records::get_person(store.as_ref(), &actor, PersonId::from(id)).await?;
  Ok(Json(view))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /persons/:id` — body: [`PersonUpdate`]; omitted fields keep
/// their stored value.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
  Json(update): Json<PersonUpdate>,
) -> Result<Json<PersonView>, ApiError>
where
  S: GraphStore + 'static,
{
  let view =
    records::update_person(store.as_ref(), &actor, PersonId::from(id), update)
      .await?;
  Ok(Json(view))
}

// ─── Retire ───────────────────────────────────────────────────────────────────

/// `POST /persons/:id/retire`
pub async fn retire<S>(
  State(store): State<Arc<S>>,
  ActorContext(actor): ActorContext,
  Path(id): Path<Uuid>,
) -> Result<Json<PersonView>, ApiError>
where
  S: GraphStore + 'static,
{
  let view =
    records::retire_person(store.as_ref(), &actor, PersonId::from(id)).await?;
  Ok(Json(view))
}
