//! SQL schema for the Juegos SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT UNIQUE NOT NULL,
    slug  TEXT UNIQUE NOT NULL
);

-- Cache of external catalog metadata, keyed by the catalog's own id.
CREATE TABLE IF NOT EXISTS games (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    rawg_id     INTEGER UNIQUE NOT NULL,
    name        TEXT NOT NULL,
    released    TEXT,
    image_url   TEXT,
    genres      TEXT,              -- JSON array of names or {id, name} objects
    platforms   TEXT,              -- JSON array
    metacritic  INTEGER,
    raw_json    TEXT
);

-- The three game lists. A (user, game) pair is in at most one of them;
-- the store moves rows between lists inside one transaction.
CREATE TABLE IF NOT EXISTS user_played (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER NOT NULL REFERENCES users(id),
    game_id    INTEGER NOT NULL REFERENCES games(id),
    rating     REAL NOT NULL,
    opinion    TEXT,
    completed  INTEGER NOT NULL DEFAULT 1,   -- 0 = abandoned
    played_at  TEXT NOT NULL,                -- RFC 3339 UTC
    UNIQUE (user_id, game_id)
);

CREATE TABLE IF NOT EXISTS user_pending (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   INTEGER NOT NULL REFERENCES users(id),
    game_id   INTEGER NOT NULL REFERENCES games(id),
    added_at  TEXT NOT NULL,
    UNIQUE (user_id, game_id)
);

CREATE TABLE IF NOT EXISTS user_in_progress (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id   INTEGER NOT NULL REFERENCES users(id),
    game_id   INTEGER NOT NULL REFERENCES games(id),
    added_at  TEXT NOT NULL,
    UNIQUE (user_id, game_id)
);

CREATE TABLE IF NOT EXISTS user_achievements (
    user_id         INTEGER NOT NULL REFERENCES users(id),
    achievement_id  TEXT NOT NULL,
    unlocked_at     TEXT NOT NULL,
    PRIMARY KEY (user_id, achievement_id)
);

CREATE INDEX IF NOT EXISTS user_played_user_idx      ON user_played(user_id);
CREATE INDEX IF NOT EXISTS user_played_at_idx        ON user_played(played_at);
CREATE INDEX IF NOT EXISTS user_pending_user_idx     ON user_pending(user_id);
CREATE INDEX IF NOT EXISTS user_in_progress_user_idx ON user_in_progress(user_id);

PRAGMA user_version = 1;
";
