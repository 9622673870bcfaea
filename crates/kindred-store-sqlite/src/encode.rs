//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Record origins are stored
//! as compact JSON. UUIDs are stored as hyphenated lowercase strings, and
//! `deceased` as a nullable integer where NULL means no source ever said.

use chrono::{DateTime, Utc};
use kindred_core::{
  id::{AgencyId, PersonId, RelationshipId},
  person::{Person, RecordOrigin},
  relationship::Relationship,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── RecordOrigin ────────────────────────────────────────────────────────────

pub fn encode_origin(origin: &RecordOrigin) -> Result<String> {
  Ok(serde_json::to_string(origin)?)
}

pub fn decode_origin(s: &str) -> Result<RecordOrigin> {
  Ok(serde_json::from_str(s)?)
}

// ─── Deceased ────────────────────────────────────────────────────────────────

pub fn encode_deceased(d: Option<bool>) -> Option<i64> {
  d.map(|v| if v { 1 } else { 0 })
}

pub fn decode_deceased(v: Option<i64>) -> Option<bool> { v.map(|v| v != 0) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `persons` row.
pub struct RawPerson {
  pub person_id:   String,
  pub agency_id:   String,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
  pub last_name:   Option<String>,
  pub deceased:    Option<i64>,
  pub retired_at:  Option<String>,
  pub origin:      String,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawPerson {
  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          PersonId::from(decode_uuid(&self.person_id)?),
      agency_id:   AgencyId::from(decode_uuid(&self.agency_id)?),
      first_name:  self.first_name,
      middle_name: self.middle_name,
      last_name:   self.last_name,
      deceased:    decode_deceased(self.deceased),
      retired_at:  self.retired_at.as_deref().map(decode_dt).transpose()?,
      origin:      decode_origin(&self.origin)?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `relationships` row.
pub struct RawRelationship {
  pub relationship_id: String,
  pub agency_id:       String,
  pub from_person:     String,
  pub to_person:       String,
  pub kinship:         Option<String>,
  pub sealed:          i64,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawRelationship {
  pub fn into_relationship(self) -> Result<Relationship> {
    Ok(Relationship {
      id:          RelationshipId::from(decode_uuid(&self.relationship_id)?),
      agency_id:   AgencyId::from(decode_uuid(&self.agency_id)?),
      from_person: PersonId::from(decode_uuid(&self.from_person)?),
      to_person:   PersonId::from(decode_uuid(&self.to_person)?),
      kinship:     self.kinship,
      sealed:      self.sealed != 0,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Row readers ─────────────────────────────────────────────────────────────

/// Read a `RawPerson` from the ten `persons` columns starting at column 0.
pub fn read_person(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPerson> {
  Ok(RawPerson {
    person_id:   row.get(0)?,
    agency_id:   row.get(1)?,
    first_name:  row.get(2)?,
    middle_name: row.get(3)?,
    last_name:   row.get(4)?,
    deceased:    row.get(5)?,
    retired_at:  row.get(6)?,
    origin:      row.get(7)?,
    created_at:  row.get(8)?,
    updated_at:  row.get(9)?,
  })
}

/// Read an optional `RawPerson` from the ten columns starting at `base`.
/// Returns `None` when the LEFT JOIN produced no row (person_id is NULL).
pub fn read_person_at(
  row: &rusqlite::Row<'_>,
  base: usize,
) -> rusqlite::Result<Option<RawPerson>> {
  let person_id: Option<String> = row.get(base)?;
  let Some(person_id) = person_id else {
    return Ok(None);
  };
  Ok(Some(RawPerson {
    person_id,
    agency_id:   row.get(base + 1)?,
    first_name:  row.get(base + 2)?,
    middle_name: row.get(base + 3)?,
    last_name:   row.get(base + 4)?,
    deceased:    row.get(base + 5)?,
    retired_at:  row.get(base + 6)?,
    origin:      row.get(base + 7)?,
    created_at:  row.get(base + 8)?,
    updated_at:  row.get(base + 9)?,
  }))
}

/// Read a `RawRelationship` from the eight `relationships` columns starting
/// at column 0.
pub fn read_relationship(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawRelationship> {
  Ok(RawRelationship {
    relationship_id: row.get(0)?,
    agency_id:       row.get(1)?,
    from_person:     row.get(2)?,
    to_person:       row.get(3)?,
    kinship:         row.get(4)?,
    sealed:          row.get(5)?,
    created_at:      row.get(6)?,
    updated_at:      row.get(7)?,
  })
}
