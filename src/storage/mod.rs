//! Storage module for persisting scraped data
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Race-safe insert-if-absent for tags, authors, quotes and their links
//! - Update-by-key with an explicit not-found outcome
//! - Read queries used by exports, statistics and the read API
//! - Collaborator tables (users, API logs)
//! - A do-nothing store for runs with the database turned off

mod disabled;
mod schema;
mod sqlite;
mod traits;

pub use disabled::DisabledStore;
pub use sqlite::SqliteStore;
pub use traits::{Store, StorageError, StorageResult};

use serde::Serialize;

/// An author row; `about` stays unset until enrichment fills it in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRecord {
    pub author: String,
    pub about: Option<String>,
}

/// A quote row; immutable once inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteRecord {
    #[serde(rename = "quote_uuid")]
    pub id: String,
    #[serde(rename = "quote_text")]
    pub text: String,
    pub author: String,
}

/// Association between a quote and one of its tags
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QuoteTagLink {
    #[serde(rename = "quote_uuid")]
    pub quote_id: String,
    pub tag: String,
}

/// An API user; owned by the auth layer, never touched by the scraper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub stripe_id: Option<String>,
    pub email: String,
    pub fullname: Option<String>,
    /// Password hash, never the plain password
    pub password: String,
    pub access: bool,
}

/// Result of an insert-if-absent operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was created by this call
    Inserted,
    /// A row with the same key already existed; nothing changed
    AlreadyPresent,
}

impl InsertOutcome {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted)
    }
}

/// Result of an update-by-key operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome<T = ()> {
    /// The target row existed and was updated
    Updated(T),
    /// No row matched the key
    NotFound,
}

impl<T> UpdateOutcome<T> {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Severity attached to an API log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Row counts of every table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableCounts {
    pub tags: u64,
    pub authors: u64,
    pub quotes: u64,
    pub quote_tags: u64,
    pub users: u64,
    pub api_logs: u64,
}
