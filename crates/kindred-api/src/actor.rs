//! Actor extraction from trusted gateway headers.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the gateway has already verified the caller and asserts their
//! identity in two headers. This layer only reads the assertion.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use kindred_core::{
  actor::{Actor, Role},
  id::AgencyId,
};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the caller's role, e.g. `case-worker`.
pub const ROLE_HEADER: &str = "x-kindred-role";
/// Header carrying the caller's home agency as a UUID. Absent for
/// administrators.
pub const AGENCY_HEADER: &str = "x-kindred-agency";

/// The caller's identity as asserted by the gateway.
#[derive(Debug, Clone)]
pub struct ActorContext(pub Actor);

/// Read the actor headers. A missing or malformed assertion is a gateway
/// misconfiguration, reported as a bad request rather than a refusal.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ApiError> {
  let role = headers
    .get(ROLE_HEADER)
    .and_then(|v| v.to_str().ok())
    .ok_or_else(|| ApiError::BadRequest(format!("missing {ROLE_HEADER} header")))?;
  let role = Role::parse(role)
    .ok_or_else(|| ApiError::BadRequest(format!("unknown role {role:?}")))?;

  let agency = match headers.get(AGENCY_HEADER) {
    None => None,
    Some(value) => {
      let value = value.to_str().map_err(|_| {
        ApiError::BadRequest(format!("{AGENCY_HEADER} is not valid UTF-8"))
      })?;
      let uuid = Uuid::parse_str(value).map_err(|_| {
        ApiError::BadRequest(format!("{AGENCY_HEADER} is not a UUID"))
      })?;
      Some(AgencyId::from(uuid))
    }
  };

  Ok(Actor { role, agency })
}

impl<S: Send + Sync> FromRequestParts<S> for ActorContext {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    actor_from_headers(&parts.headers).map(ActorContext)
  }
}
