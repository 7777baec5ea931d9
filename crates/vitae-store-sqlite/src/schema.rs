//! SQL schema for the Vitae SQLite store.
//!
//! Column lists of the six record tables must match the kind descriptors in
//! `vitae_core::kind`; `tests.rs` checks that they do.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profiles (
    user_id    TEXT PRIMARY KEY,
    name       TEXT,
    headline   TEXT,
    location   TEXT,
    about      TEXT,
    photo_url  TEXT,
    banner_url TEXT,
    updated_at INTEGER NOT NULL
);

-- Record tables. Timestamps are epoch milliseconds.

CREATE TABLE IF NOT EXISTS experiences (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    title         TEXT,
    company       TEXT,
    location      TEXT,
    start_date    TEXT,
    end_date      TEXT,
    description   TEXT,
    logo_url      TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS education (
    id             TEXT PRIMARY KEY,
    user_id        TEXT NOT NULL,
    school         TEXT,
    degree         TEXT,
    field_of_study TEXT,
    start_date     TEXT,
    end_date       TEXT,
    description    TEXT,
    logo_url       TEXT,
    display_order  INTEGER NOT NULL DEFAULT 0,
    created_at     INTEGER NOT NULL,
    updated_at     INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS certifications (
    id              TEXT PRIMARY KEY,
    user_id         TEXT NOT NULL,
    name            TEXT,
    organization    TEXT,
    issue_date      TEXT,
    expiration_date TEXT,
    credential_id   TEXT,
    credential_url  TEXT,
    logo_url        TEXT,
    display_order   INTEGER NOT NULL DEFAULT 0,
    created_at      INTEGER NOT NULL,
    updated_at      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS projects (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    name          TEXT,
    description   TEXT,
    start_date    TEXT,
    end_date      TEXT,
    url           TEXT,
    logo_url      TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS publications (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL,
    title         TEXT,
    publisher     TEXT,
    date          TEXT,
    url           TEXT,
    description   TEXT,
    logo_url      TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at    INTEGER NOT NULL,
    updated_at    INTEGER NOT NULL
);

-- No display_order: skills are listed by name and cannot be reordered.
CREATE TABLE IF NOT EXISTS skills (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    name        TEXT,
    endorsement TEXT,
    created_at  INTEGER NOT NULL,
    updated_at  INTEGER NOT NULL
);

-- Posts and views use epoch seconds.
CREATE TABLE IF NOT EXISTS posts (
    id         TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    content    TEXT NOT NULL,
    image_url  TEXT,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS profile_views (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   TEXT NOT NULL,
    viewed_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS blobs (
    key          TEXT PRIMARY KEY,
    content_type TEXT,
    etag         TEXT NOT NULL,
    size         INTEGER NOT NULL,
    data         BLOB NOT NULL,
    created_at   INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS experiences_user_idx    ON experiences(user_id);
CREATE INDEX IF NOT EXISTS education_user_idx      ON education(user_id);
CREATE INDEX IF NOT EXISTS certifications_user_idx ON certifications(user_id);
CREATE INDEX IF NOT EXISTS projects_user_idx       ON projects(user_id);
CREATE INDEX IF NOT EXISTS publications_user_idx   ON publications(user_id);
CREATE INDEX IF NOT EXISTS skills_user_idx         ON skills(user_id);
CREATE INDEX IF NOT EXISTS posts_created_idx       ON posts(created_at);
CREATE INDEX IF NOT EXISTS profile_views_user_idx  ON profile_views(user_id, viewed_at);

PRAGMA user_version = 1;
";
