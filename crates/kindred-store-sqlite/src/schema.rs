//! SQL schema for the kindred SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Person rows are never deleted. Retirement sets retired_at and the row
-- stays resolvable forever.
CREATE TABLE IF NOT EXISTS persons (
    person_id   TEXT PRIMARY KEY,
    agency_id   TEXT NOT NULL,
    first_name  TEXT,
    middle_name TEXT,
    last_name   TEXT,
    deceased    INTEGER,         -- 0 | 1 | NULL when no source ever said
    retired_at  TEXT,            -- ISO 8601 UTC; NULL while the record is live
    origin      TEXT NOT NULL DEFAULT '{\"kind\":\"manual\"}',
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

-- One row per unordered pair of persons within an agency. pair_lo and
-- pair_hi are the endpoint ids sorted low-to-high so (a, b) and (b, a)
-- land on the same row.
CREATE TABLE IF NOT EXISTS relationships (
    relationship_id TEXT PRIMARY KEY,
    agency_id       TEXT NOT NULL,
    from_person     TEXT NOT NULL REFERENCES persons(person_id),
    to_person       TEXT NOT NULL REFERENCES persons(person_id),
    pair_lo         TEXT NOT NULL,
    pair_hi         TEXT NOT NULL,
    kinship         TEXT,
    sealed          INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    UNIQUE (agency_id, pair_lo, pair_hi),
    CHECK  (from_person != to_person)
);

CREATE INDEX IF NOT EXISTS relationships_from_idx ON relationships(from_person);
CREATE INDEX IF NOT EXISTS relationships_to_idx   ON relationships(to_person);
CREATE INDEX IF NOT EXISTS persons_agency_idx     ON persons(agency_id);

PRAGMA user_version = 1;
";
