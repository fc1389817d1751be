//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::storage::{
    AuthorRecord, InsertOutcome, LogLevel, QuoteRecord, QuoteTagLink, TableCounts, UpdateOutcome,
    UserRecord,
};
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// A foreign-key, check or not-null constraint rejected the write.
    /// Duplicate keys never surface here: inserts report them as
    /// [`InsertOutcome::AlreadyPresent`].
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(ffi_err, message)
                if ffi_err.code == ErrorCode::ConstraintViolation =>
            {
                StorageError::ConstraintViolation(
                    message.clone().unwrap_or_else(|| ffi_err.to_string()),
                )
            }
            _ => StorageError::Sqlite(err),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Every method takes `&self` and must be safe to call from many threads at
/// once. Each write runs in its own transaction; no in-process locking is
/// expected from callers.
pub trait Store: Send + Sync {
    // ===== Content Inserts =====

    /// Inserts a tag if it does not exist yet
    ///
    /// Race-safe: when several callers insert the same tag concurrently,
    /// exactly one gets [`InsertOutcome::Inserted`] and the others get
    /// [`InsertOutcome::AlreadyPresent`]. Neither is an error.
    fn insert_tag(&self, tag: &str) -> StorageResult<InsertOutcome>;

    /// Inserts an author with an unset biography if it does not exist yet
    ///
    /// Same race-safety contract as [`Store::insert_tag`]. An existing
    /// author's biography is left untouched.
    fn insert_author(&self, author: &str) -> StorageResult<InsertOutcome>;

    /// Inserts a quote; its author row must already exist
    fn insert_quote(&self, quote: &QuoteRecord) -> StorageResult<InsertOutcome>;

    /// Links a quote to a tag; both rows must already exist
    fn insert_quote_tag(&self, link: &QuoteTagLink) -> StorageResult<InsertOutcome>;

    // ===== Content Updates =====

    /// Sets the biography of an existing author
    fn update_author_bio(&self, author: &str, about: &str) -> StorageResult<UpdateOutcome>;

    /// Deletes every quote, link, author and tag (users and logs are kept)
    fn truncate_content(&self) -> StorageResult<()>;

    // ===== Content Queries =====

    /// Gets an author by name
    fn get_author(&self, author: &str) -> StorageResult<Option<AuthorRecord>>;

    /// Lists all tags, sorted
    fn list_tags(&self) -> StorageResult<Vec<String>>;

    /// Lists all authors, sorted by name
    fn list_authors(&self) -> StorageResult<Vec<AuthorRecord>>;

    /// Lists all quotes
    fn list_quotes(&self) -> StorageResult<Vec<QuoteRecord>>;

    /// Lists all quote-tag links
    fn list_quote_tags(&self) -> StorageResult<Vec<QuoteTagLink>>;

    /// Lists the quotes attributed to an author
    fn quotes_by_author(&self, author: &str) -> StorageResult<Vec<QuoteRecord>>;

    /// Lists the tags of a quote, sorted
    fn tags_for_quote(&self, quote_id: &str) -> StorageResult<Vec<String>>;

    // ===== Users =====

    /// Inserts a user if neither its id, email nor billing id is taken
    fn insert_user(&self, user: &UserRecord) -> StorageResult<InsertOutcome>;

    /// Gets a user by id
    fn get_user(&self, user_id: &str) -> StorageResult<Option<UserRecord>>;

    /// Flips a user's access flag and returns the new value
    fn toggle_user_access(&self, user_id: &str) -> StorageResult<UpdateOutcome<bool>>;

    /// Replaces a user's password hash
    fn change_user_password(&self, user_id: &str, password_hash: &str)
        -> StorageResult<UpdateOutcome>;

    /// Records a log entry attributed to a user
    fn record_api_log(&self, email: &str, level: LogLevel, message: &str) -> StorageResult<()>;

    // ===== Statistics =====

    /// Counts the rows of every table
    fn table_counts(&self) -> StorageResult<TableCounts>;

    /// Counts authors whose biography is still unset
    fn count_authors_without_bio(&self) -> StorageResult<u64>;
}
