//! SQL schema for the manor SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS houses (
    id          INTEGER PRIMARY KEY,
    uuid        TEXT NOT NULL UNIQUE,
    country     TEXT NOT NULL,
    city        TEXT NOT NULL,
    street      TEXT NOT NULL,
    number      TEXT NOT NULL,
    area        TEXT NOT NULL,
    create_date TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS people (
    id              INTEGER PRIMARY KEY,
    uuid            TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    surname         TEXT NOT NULL,
    sex             TEXT NOT NULL,   -- 'male' | 'female'
    passport_series TEXT NOT NULL,
    passport_number TEXT NOT NULL,
    create_date     TEXT NOT NULL,
    update_date     TEXT NOT NULL,
    house_uuid      TEXT REFERENCES houses(uuid) ON DELETE SET NULL,
    UNIQUE (passport_series, passport_number)
);

-- Relation facts are history. Deliberately no foreign keys: deleting a
-- house or person never rewrites what was once true.
CREATE TABLE IF NOT EXISTS relation_facts (
    id          INTEGER PRIMARY KEY,
    house_uuid  TEXT NOT NULL,
    person_uuid TEXT NOT NULL,
    role        TEXT NOT NULL,       -- 'owner' | 'tenant'
    since       TEXT NOT NULL,
    until       TEXT                 -- NULL while the relation is active
);

-- At most one active fact per (house, person, role).
CREATE UNIQUE INDEX IF NOT EXISTS relation_facts_active_idx
    ON relation_facts(house_uuid, person_uuid, role) WHERE until IS NULL;

CREATE INDEX IF NOT EXISTS relation_facts_person_idx
    ON relation_facts(person_uuid, role);
CREATE INDEX IF NOT EXISTS relation_facts_house_idx
    ON relation_facts(house_uuid, role);
CREATE INDEX IF NOT EXISTS people_house_idx ON people(house_uuid);

PRAGMA user_version = 1;
";
