//! JSON REST API for the kindred relationship graph.
//!
//! Exposes an axum [`Router`] backed by any
//! [`kindred_core::store::GraphStore`]. Callers are identified by trusted
//! gateway headers (see [`actor`]); authentication, TLS, and transport
//! concerns live upstream.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kindred_api::api_router(store.clone()))
//! ```

pub mod actor;
pub mod error;
pub mod persons;
pub mod relationships;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use kindred_core::store::GraphStore;
use serde::Deserialize;

pub use actor::ActorContext;
pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GraphStore + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route(
      "/persons/{id}",
      get(persons::get_one::<S>).patch(persons::update::<S>),
    )
    .route("/persons/{id}/retire", post(persons::retire::<S>))
    // Relationships
    .route(
      "/persons/{id}/relationships",
      get(relationships::list::<S>).post(relationships::link::<S>),
    )
    .route(
      "/relationships/{id}",
      get(relationships::get_one::<S>).patch(relationships::update::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use kindred_core::id::AgencyId;
  use kindred_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  struct Caller {
    role:   &'static str,
    agency: Option<AgencyId>,
  }

  fn admin() -> Caller {
    Caller {
      role:   "administrator",
      agency: None,
    }
  }

  fn worker(agency: AgencyId) -> Caller {
    Caller {
      role:   "case-worker",
      agency: Some(agency),
    }
  }

  fn restricted(agency: AgencyId) -> Caller {
    Caller {
      role:   "restricted",
      agency: Some(agency),
    }
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    caller: Option<&Caller>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
      builder = builder.header(actor::ROLE_HEADER, caller.role);
      if let Some(agency) = caller.agency {
        builder = builder.header(actor::AGENCY_HEADER, agency.to_string());
      }
    }
    let request = match body {
      Some(value) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(value.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    // Rejections synthesised by axum itself carry plain-text bodies.
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
  }

  async fn create_person(
    app: &Router,
    caller: &Caller,
    first: &str,
    last: &str,
  ) -> String {
    let (status, body) = send(
      app,
      "POST",
      "/persons",
      Some(caller),
      Some(json!({ "first_name": first, "last_name": last })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body["id"].as_str().unwrap().to_string()
  }

  // ── Persons ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_and_fetch_person() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let id = create_person(&app, &caller, "Ada", "Quinn").await;

    let (status, body) =
      send(&app, "GET", &format!("/persons/{id}"), Some(&caller), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Ada Quinn");
    assert_eq!(body["profileLink"], format!("/persons/{id}"));
    assert_eq!(body["isRetired"], false);
    assert_eq!(body["isDeceased"], false);
  }

  #[tokio::test]
  async fn missing_role_header_is_a_bad_request() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/persons", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn restricted_callers_are_refused() {
    let app = app().await;
    let caller = restricted(AgencyId::new());
    let (status, body) = send(&app, "GET", "/persons", Some(&caller), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "role-forbidden");
  }

  #[tokio::test]
  async fn unknown_person_is_404_but_foreign_person_is_403() {
    let app = app().await;
    let agency_a = AgencyId::new();
    let id = create_person(&app, &worker(agency_a), "Ada", "Quinn").await;

    let ghost = Uuid::new_v4();
    let (status, _) = send(
      &app,
      "GET",
      &format!("/persons/{ghost}"),
      Some(&worker(agency_a)),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let outsider = worker(AgencyId::new());
    let (status, body) =
      send(&app, "GET", &format!("/persons/{id}"), Some(&outsider), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "tenant-mismatch");
  }

  #[tokio::test]
  async fn admin_creation_requires_an_agency() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/persons",
      Some(&admin()),
      Some(json!({ "first_name": "Ada", "last_name": "Quinn" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"], json!(["agency_id"]));

    let agency = AgencyId::new();
    let (status, body) = send(
      &app,
      "POST",
      "/persons",
      Some(&admin()),
      Some(json!({
        "agency_id": agency,
        "first_name": "Ada",
        "last_name": "Quinn",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["agencyId"], agency.to_string());
  }

  #[tokio::test]
  async fn update_merges_instead_of_replacing() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let id = create_person(&app, &caller, "Ada", "Quinn").await;

    let (status, body) = send(
      &app,
      "PATCH",
      &format!("/persons/{id}"),
      Some(&caller),
      Some(json!({ "middle_name": "Rose" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["displayName"], "Ada Rose Quinn");
  }

  // ── Linking ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn link_reports_created_versus_existing() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let child = create_person(&app, &caller, "Ada", "Quinn").await;

    let (status, first) = send(
      &app,
      "POST",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      Some(json!({
        "person": { "first_name": "Mara", "last_name": "Quinn" },
        "kinship": "mother",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["displayName"], "Mara Quinn");
    assert_eq!(first["keystoneDisplayName"], "Ada Quinn");
    assert_eq!(first["kinship"], "mother");

    // Submitting the same pair again returns the edge that already exists.
    let mother = first["counterpartId"].as_str().unwrap();
    let (status, second) = send(
      &app,
      "POST",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      Some(json!({
        "person": { "id": mother },
        "kinship": "parent",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["relationshipId"], first["relationshipId"]);
    assert_eq!(second["kinship"], "mother");
  }

  #[tokio::test]
  async fn nameless_link_is_unprocessable() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let child = create_person(&app, &caller, "Ada", "Quinn").await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      Some(json!({ "person": {}, "kinship": "mother" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"], json!(["first_name", "last_name"]));
  }

  #[tokio::test]
  async fn retired_keystone_refuses_new_links() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let child = create_person(&app, &caller, "Ada", "Quinn").await;

    let (status, body) = send(
      &app,
      "POST",
      &format!("/persons/{child}/retire"),
      Some(&caller),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isRetired"], true);
    assert_eq!(body["displayName"], "");

    let (status, body) = send(
      &app,
      "POST",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      Some(json!({
        "person": { "first_name": "Mara", "last_name": "Quinn" },
        "kinship": "mother",
      })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "retired-record");
  }

  // ── Listings ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn listing_hides_sealed_edges_from_workers() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let child = create_person(&app, &caller, "Ada", "Quinn").await;

    let (_, linked) = send(
      &app,
      "POST",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      Some(json!({
        "person": { "first_name": "Mara", "last_name": "Quinn" },
        "kinship": "mother",
      })),
    )
    .await;
    let rid = linked["relationshipId"].as_str().unwrap().to_string();

    let (status, sealed) = send(
      &app,
      "PATCH",
      &format!("/relationships/{rid}"),
      Some(&caller),
      Some(json!({ "sealed": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sealed["sealed"], true);

    let (status, listing) = send(
      &app,
      "GET",
      &format!("/persons/{child}/relationships"),
      Some(&caller),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing, json!([]));

    let (status, listing) = send(
      &app,
      "GET",
      &format!("/persons/{child}/relationships"),
      Some(&admin()),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    // Sealing also locks the record against further worker edits.
    let (status, body) = send(
      &app,
      "PATCH",
      &format!("/relationships/{rid}"),
      Some(&caller),
      Some(json!({ "kinship": "foster mother" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["reason"], "sealed-record");
  }

  #[tokio::test]
  async fn listing_accepts_the_name_order() {
    let app = app().await;
    let caller = worker(AgencyId::new());
    let child = create_person(&app, &caller, "Ada", "Quinn").await;

    for (first, kinship) in [("Theo", "father"), ("Mara", "mother")] {
      send(
        &app,
        "POST",
        &format!("/persons/{child}/relationships"),
        Some(&caller),
        Some(json!({
          "person": { "first_name": first, "last_name": "Quinn" },
          "kinship": kinship,
        })),
      )
      .await;
    }

    let (status, listing) = send(
      &app,
      "GET",
      &format!("/persons/{child}/relationships?order=counterpart-name"),
      Some(&caller),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing[0]["displayName"], "Mara Quinn");
    assert_eq!(listing[1]["displayName"], "Theo Quinn");

    let (status, _) = send(
      &app,
      "GET",
      &format!("/persons/{child}/relationships?order=bogus"),
      Some(&caller),
      None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }
}
