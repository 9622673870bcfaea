//! [`SqliteStore`] — the SQLite implementation of [`GraphStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use kindred_core::{
  id::{AgencyId, PersonId, RelationshipId},
  person::{NewPerson, Person, PersonUpdate},
  relationship::{Relationship, RelationshipPatch, pair_key},
  store::{GraphStore, LinkOutcome, LoadedEdge, PairLink, PairPerson},
};

use crate::{
  Error, Result,
  encode::{
    RawPerson, RawRelationship, decode_uuid, encode_deceased, encode_dt,
    encode_origin, encode_uuid, read_person, read_person_at, read_relationship,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A kindred graph store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Person`] into the `persons` table.
  async fn insert_person(&self, person: &Person) -> Result<()> {
    let person_id_str  = encode_uuid(person.id.as_uuid());
    let agency_id_str  = encode_uuid(person.agency_id.as_uuid());
    let first_name     = person.first_name.clone();
    let middle_name    = person.middle_name.clone();
    let last_name      = person.last_name.clone();
    let deceased_val   = encode_deceased(person.deceased);
    let retired_at_str = person.retired_at.map(encode_dt);
    let origin_str     = encode_origin(&person.origin)?;
    let created_at_str = encode_dt(person.created_at);
    let updated_at_str = encode_dt(person.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons (
             person_id, agency_id, first_name, middle_name, last_name,
             deceased, retired_at, origin, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            person_id_str,
            agency_id_str,
            first_name,
            middle_name,
            last_name,
            deceased_val,
            retired_at_str,
            origin_str,
            created_at_str,
            updated_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Pair-link plumbing ──────────────────────────────────────────────────────

/// Pre-encoded person half of a pair link, ready to cross into the
/// connection thread.
enum PersonWrite {
  Insert {
    person_id:   String,
    agency_id:   String,
    first_name:  Option<String>,
    middle_name: Option<String>,
    last_name:   Option<String>,
    deceased:    Option<i64>,
    origin:      String,
  },
  Merge {
    person_id:   String,
    first_name:  Option<String>,
    middle_name: Option<String>,
    last_name:   Option<String>,
    deceased:    Option<i64>,
  },
}

/// What the pair-link transaction observed. A missing person is reported
/// in-band so the transaction can roll back cleanly and the caller can map
/// it to a typed error.
enum TxOutcome {
  Linked {
    created:      bool,
    relationship: RawRelationship,
    person:       RawPerson,
    keystone:     RawPerson,
  },
  MissingPerson(String),
}

// ─── GraphStore impl ─────────────────────────────────────────────────────────

impl GraphStore for SqliteStore {
  type Error = Error;

  // ── Persons ───────────────────────────────────────────────────────────────

  async fn person_tenant(&self, id: PersonId) -> Result<Option<AgencyId>> {
    let id_str = encode_uuid(id.as_uuid());

    let agency: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT agency_id FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    agency
      .as_deref()
      .map(|s| decode_uuid(s).map(AgencyId::from))
      .transpose()
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let id_str = encode_uuid(id.as_uuid());

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT person_id, agency_id, first_name, middle_name, last_name,
                      deceased, retired_at, origin, created_at, updated_at
               FROM persons WHERE person_id = ?1",
              rusqlite::params![id_str],
              read_person,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_persons(&self, agency: Option<AgencyId>) -> Result<Vec<Person>> {
    let agency_str = agency.map(|a| encode_uuid(a.as_uuid()));

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(a) = agency_str {
          let mut stmt = conn.prepare(
            "SELECT person_id, agency_id, first_name, middle_name, last_name,
                    deceased, retired_at, origin, created_at, updated_at
             FROM persons WHERE agency_id = ?1
             ORDER BY created_at, person_id",
          )?;
          stmt
            .query_map(rusqlite::params![a], read_person)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT person_id, agency_id, first_name, middle_name, last_name,
                    deceased, retired_at, origin, created_at, updated_at
             FROM persons
             ORDER BY created_at, person_id",
          )?;
          stmt
            .query_map([], read_person)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let now = Utc::now();
    let person = Person {
      id:          PersonId::new(),
      agency_id:   input.agency_id,
      first_name:  input.first_name,
      middle_name: input.middle_name,
      last_name:   input.last_name,
      deceased:    input.deceased,
      retired_at:  None,
      origin:      input.origin,
      created_at:  now,
      updated_at:  now,
    };

    self.insert_person(&person).await?;
    Ok(person)
  }

  async fn update_person(
    &self,
    id: PersonId,
    update: PersonUpdate,
  ) -> Result<Option<Person>> {
    let id_str       = encode_uuid(id.as_uuid());
    let first_name   = update.first_name;
    let middle_name  = update.middle_name;
    let last_name    = update.last_name;
    let deceased_val = encode_deceased(update.deceased);
    let now_str      = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE persons SET
             first_name  = COALESCE(?2, first_name),
             middle_name = COALESCE(?3, middle_name),
             last_name   = COALESCE(?4, last_name),
             deceased    = COALESCE(?5, deceased),
             updated_at  = ?6
           WHERE person_id = ?1",
          rusqlite::params![
            id_str,
            first_name,
            middle_name,
            last_name,
            deceased_val,
            now_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_person(id).await
  }

  async fn retire_person(&self, id: PersonId) -> Result<Option<Person>> {
    let id_str  = encode_uuid(id.as_uuid());
    let now_str = encode_dt(Utc::now());

    // Only the first retirement writes; repeats keep the original stamp.
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE persons SET retired_at = ?2, updated_at = ?2
           WHERE person_id = ?1 AND retired_at IS NULL",
          rusqlite::params![id_str, now_str],
        )?;
        Ok(())
      })
      .await?;

    self.get_person(id).await
  }

  // ── Relationships ─────────────────────────────────────────────────────────

  async fn relationship_tenant(
    &self,
    id: RelationshipId,
  ) -> Result<Option<AgencyId>> {
    let id_str = encode_uuid(id.as_uuid());

    let agency: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT agency_id FROM relationships WHERE relationship_id = ?1",
              rusqlite::params![id_str],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    agency
      .as_deref()
      .map(|s| decode_uuid(s).map(AgencyId::from))
      .transpose()
  }

  async fn get_relationship(
    &self,
    id: RelationshipId,
  ) -> Result<Option<Relationship>> {
    let id_str = encode_uuid(id.as_uuid());

    let raw: Option<RawRelationship> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT relationship_id, agency_id, from_person, to_person,
                      kinship, sealed, created_at, updated_at
               FROM relationships WHERE relationship_id = ?1",
              rusqlite::params![id_str],
              read_relationship,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRelationship::into_relationship).transpose()
  }

  async fn update_relationship(
    &self,
    id: RelationshipId,
    patch: RelationshipPatch,
  ) -> Result<Option<Relationship>> {
    let id_str     = encode_uuid(id.as_uuid());
    let kinship    = patch.kinship;
    let sealed_val = patch.sealed.map(|v| if v { 1_i64 } else { 0 });
    let now_str    = encode_dt(Utc::now());

    let changed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE relationships SET
             kinship    = COALESCE(?2, kinship),
             sealed     = COALESCE(?3, sealed),
             updated_at = ?4
           WHERE relationship_id = ?1",
          rusqlite::params![id_str, kinship, sealed_val, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_relationship(id).await
  }

  async fn edges_for(&self, keystone: PersonId) -> Result<Vec<LoadedEdge>> {
    let keystone_str = encode_uuid(keystone.as_uuid());

    type RawEdge = (RawRelationship, Option<RawPerson>, Option<RawPerson>);

    let raws: Vec<RawEdge> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             r.relationship_id, r.agency_id, r.from_person, r.to_person,
             r.kinship, r.sealed, r.created_at, r.updated_at,
             pf.person_id, pf.agency_id, pf.first_name, pf.middle_name,
             pf.last_name, pf.deceased, pf.retired_at, pf.origin,
             pf.created_at, pf.updated_at,
             pt.person_id, pt.agency_id, pt.first_name, pt.middle_name,
             pt.last_name, pt.deceased, pt.retired_at, pt.origin,
             pt.created_at, pt.updated_at
           FROM relationships r
           LEFT JOIN persons pf ON pf.person_id = r.from_person
           LEFT JOIN persons pt ON pt.person_id = r.to_person
           WHERE r.from_person = ?1 OR r.to_person = ?1
           ORDER BY r.created_at, r.relationship_id",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![keystone_str], |row| {
            let relationship = read_relationship(row)?;
            let from = read_person_at(row, 8)?;
            let to = read_person_at(row, 18)?;
            Ok((relationship, from, to))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(relationship, from, to)| {
        Ok(LoadedEdge {
          relationship: relationship.into_relationship()?,
          from:         from.map(RawPerson::into_person).transpose()?,
          to:           to.map(RawPerson::into_person).transpose()?,
        })
      })
      .collect()
  }

  async fn link_pair(&self, input: PairLink) -> Result<LinkOutcome> {
    let now = Utc::now();
    let now_str = encode_dt(now);

    // Resolve the person id up front so the pair key can be computed
    // before entering the connection thread.
    let (person_id, write) = match input.person {
      PairPerson::New(new) => {
        let id = PersonId::new();
        let write = PersonWrite::Insert {
          person_id:   encode_uuid(id.as_uuid()),
          agency_id:   encode_uuid(new.agency_id.as_uuid()),
          first_name:  new.first_name,
          middle_name: new.middle_name,
          last_name:   new.last_name,
          deceased:    encode_deceased(new.deceased),
          origin:      encode_origin(&new.origin)?,
        };
        (id, write)
      }
      PairPerson::Existing { id, update } => {
        let write = PersonWrite::Merge {
          person_id:   encode_uuid(id.as_uuid()),
          first_name:  update.first_name,
          middle_name: update.middle_name,
          last_name:   update.last_name,
          deceased:    encode_deceased(update.deceased),
        };
        (id, write)
      }
    };

    let (lo, hi) = pair_key(person_id, input.keystone);
    let lo_str = encode_uuid(lo.as_uuid());
    let hi_str = encode_uuid(hi.as_uuid());

    let edge_id_str     = encode_uuid(RelationshipId::new().as_uuid());
    let agency_str      = encode_uuid(input.agency_id.as_uuid());
    let keystone_str    = encode_uuid(input.keystone.as_uuid());
    let kinship         = input.kinship;

    let outcome: TxOutcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let keystone_exists: bool = tx
          .query_row(
            "SELECT 1 FROM persons WHERE person_id = ?1",
            rusqlite::params![keystone_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !keystone_exists {
          return Ok(TxOutcome::MissingPerson(keystone_str));
        }

        let person_id_str = match write {
          PersonWrite::Insert {
            person_id,
            agency_id,
            first_name,
            middle_name,
            last_name,
            deceased,
            origin,
          } => {
            tx.execute(
              "INSERT INTO persons (
                 person_id, agency_id, first_name, middle_name, last_name,
                 deceased, retired_at, origin, created_at, updated_at
               ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL, ?7, ?8, ?8)",
              rusqlite::params![
                person_id,
                agency_id,
                first_name,
                middle_name,
                last_name,
                deceased,
                origin,
                now_str,
              ],
            )?;
            person_id
          }
          PersonWrite::Merge {
            person_id,
            first_name,
            middle_name,
            last_name,
            deceased,
          } => {
            let changed = tx.execute(
              "UPDATE persons SET
                 first_name  = COALESCE(?2, first_name),
                 middle_name = COALESCE(?3, middle_name),
                 last_name   = COALESCE(?4, last_name),
                 deceased    = COALESCE(?5, deceased),
                 updated_at  = ?6
               WHERE person_id = ?1",
              rusqlite::params![
                person_id,
                first_name,
                middle_name,
                last_name,
                deceased,
                now_str,
              ],
            )?;
            if changed == 0 {
              return Ok(TxOutcome::MissingPerson(person_id));
            }
            person_id
          }
        };

        // Find-or-create: the unordered-pair unique index decides who wins
        // and the re-select below reads back whichever row that was.
        let inserted = tx.execute(
          "INSERT INTO relationships (
             relationship_id, agency_id, from_person, to_person,
             pair_lo, pair_hi, kinship, sealed, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)
           ON CONFLICT (agency_id, pair_lo, pair_hi) DO NOTHING",
          rusqlite::params![
            edge_id_str,
            agency_str,
            person_id_str,
            keystone_str,
            lo_str,
            hi_str,
            kinship,
            now_str,
          ],
        )?;

        let relationship = tx.query_row(
          "SELECT relationship_id, agency_id, from_person, to_person,
                  kinship, sealed, created_at, updated_at
           FROM relationships
           WHERE agency_id = ?1 AND pair_lo = ?2 AND pair_hi = ?3",
          rusqlite::params![agency_str, lo_str, hi_str],
          read_relationship,
        )?;

        let person = tx.query_row(
          "SELECT person_id, agency_id, first_name, middle_name, last_name,
                  deceased, retired_at, origin, created_at, updated_at
           FROM persons WHERE person_id = ?1",
          rusqlite::params![person_id_str],
          read_person,
        )?;

        let keystone = tx.query_row(
          "SELECT person_id, agency_id, first_name, middle_name, last_name,
                  deceased, retired_at, origin, created_at, updated_at
           FROM persons WHERE person_id = ?1",
          rusqlite::params![keystone_str],
          read_person,
        )?;

        tx.commit()?;

        Ok(TxOutcome::Linked {
          created: inserted == 1,
          relationship,
          person,
          keystone,
        })
      })
      .await?;

    match outcome {
      TxOutcome::MissingPerson(id_str) => {
        Err(Error::PersonNotFound(PersonId::from(decode_uuid(&id_str)?)))
      }
      TxOutcome::Linked {
        created,
        relationship,
        person,
        keystone,
      } => Ok(LinkOutcome {
        relationship: relationship.into_relationship()?,
        person:       person.into_person()?,
        keystone:     keystone.into_person()?,
        created,
      }),
    }
  }
}
