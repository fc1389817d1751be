//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Quote-Harvest database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Tags are identified by their label
CREATE TABLE IF NOT EXISTS tags (
    tag TEXT PRIMARY KEY
);

-- Authors are identified by their display name; about is NULL until enriched
CREATE TABLE IF NOT EXISTS authors (
    author TEXT PRIMARY KEY,
    about TEXT
);

-- Quotes are immutable and keyed by a hyphenated UUID
CREATE TABLE IF NOT EXISTS quotes (
    id TEXT PRIMARY KEY CHECK (length(id) = 36),
    text TEXT NOT NULL,
    author TEXT NOT NULL REFERENCES authors(author)
);

CREATE INDEX IF NOT EXISTS idx_quotes_author ON quotes(author);

-- Quote <-> tag associations
CREATE TABLE IF NOT EXISTS quotes_tags_link (
    quote_id TEXT NOT NULL REFERENCES quotes(id),
    tag TEXT NOT NULL REFERENCES tags(tag),
    PRIMARY KEY (quote_id, tag)
);

CREATE INDEX IF NOT EXISTS idx_quotes_tags_link_tag ON quotes_tags_link(tag);

-- API users
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY CHECK (length(id) = 36),
    stripe_id TEXT UNIQUE,
    email TEXT NOT NULL UNIQUE,
    fullname TEXT,
    password TEXT NOT NULL,
    access INTEGER NOT NULL CHECK (access IN (0, 1)),
    time_created TEXT NOT NULL,
    time_updated TEXT
);

-- Actor-attributed API log entries
CREATE TABLE IF NOT EXISTS api_logs (
    id TEXT PRIMARY KEY,
    email TEXT REFERENCES users(email),
    level TEXT NOT NULL,
    message TEXT NOT NULL,
    timestamp TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_api_logs_email ON api_logs(email);
"#;

/// Content tables in foreign-key-safe deletion order
pub const CONTENT_TABLES: &[&str] = &["quotes_tags_link", "quotes", "authors", "tags"];

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
