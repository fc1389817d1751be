//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Store trait.
//! Every operation opens its own connection, so one `SqliteStore` can be
//! shared by any number of worker tasks; SQLite's own locking serializes the
//! writes and insert-if-absent is decided by the primary keys.

use crate::storage::schema::{initialize_schema, CONTENT_TABLES};
use crate::storage::traits::{Store, StorageResult};
use crate::storage::{
    AuthorRecord, InsertOutcome, LogLevel, QuoteRecord, QuoteTagLink, TableCounts, UpdateOutcome,
    UserRecord,
};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Params, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How long a writer waits for a competing transaction before giving up
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// SQLite storage backend
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (or creates) the database and initializes its schema
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL is persistent, so it only needs to be set once per database file
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        tracing::debug!("Opened database at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StorageResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Runs `f` inside an immediate transaction on a fresh connection
    fn with_transaction<T, F>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Runs a read-modify-write update, logging storage failures
    fn update_existing<T, F>(
        &self,
        table: &str,
        key: &str,
        f: F,
    ) -> StorageResult<UpdateOutcome<T>>
    where
        F: FnOnce(&Transaction<'_>) -> rusqlite::Result<UpdateOutcome<T>>,
    {
        self.with_transaction(f).map_err(|e| {
            tracing::error!("Failed to update {} '{}': {}", table, key, e);
            e
        })
    }

    fn insert_if_absent<P: Params>(
        &self,
        table: &str,
        key: &str,
        sql: &str,
        params: P,
    ) -> StorageResult<InsertOutcome> {
        match self.with_transaction(|tx| tx.execute(sql, params)) {
            Ok(0) => {
                tracing::debug!("{} '{}' already present", table, key);
                Ok(InsertOutcome::AlreadyPresent)
            }
            Ok(_) => {
                tracing::trace!("Inserted {} '{}'", table, key);
                Ok(InsertOutcome::Inserted)
            }
            Err(e) => {
                tracing::error!("Failed to insert {} '{}': {}", table, key, e);
                Err(e)
            }
        }
    }

    fn count_rows(&self, conn: &Connection, table: &str) -> StorageResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

fn quote_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuoteRecord> {
    Ok(QuoteRecord {
        id: row.get(0)?,
        text: row.get(1)?,
        author: row.get(2)?,
    })
}

impl Store for SqliteStore {
    // ===== Content Inserts =====

    fn insert_tag(&self, tag: &str) -> StorageResult<InsertOutcome> {
        self.insert_if_absent(
            "tag",
            tag,
            "INSERT INTO tags (tag) VALUES (?1) ON CONFLICT DO NOTHING",
            params![tag],
        )
    }

    fn insert_author(&self, author: &str) -> StorageResult<InsertOutcome> {
        self.insert_if_absent(
            "author",
            author,
            "INSERT INTO authors (author, about) VALUES (?1, NULL) ON CONFLICT DO NOTHING",
            params![author],
        )
    }

    fn insert_quote(&self, quote: &QuoteRecord) -> StorageResult<InsertOutcome> {
        self.insert_if_absent(
            "quote",
            &quote.id,
            "INSERT INTO quotes (id, text, author) VALUES (?1, ?2, ?3) ON CONFLICT DO NOTHING",
            params![quote.id, quote.text, quote.author],
        )
    }

    fn insert_quote_tag(&self, link: &QuoteTagLink) -> StorageResult<InsertOutcome> {
        let key = format!("{}/{}", link.quote_id, link.tag);
        self.insert_if_absent(
            "quote tag",
            &key,
            "INSERT INTO quotes_tags_link (quote_id, tag) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
            params![link.quote_id, link.tag],
        )
    }

    // ===== Content Updates =====

    fn update_author_bio(&self, author: &str, about: &str) -> StorageResult<UpdateOutcome> {
        let outcome = self.update_existing("author", author, |tx| {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM authors WHERE author = ?1",
                    params![author],
                    |_| Ok(()),
                )
                .optional()?;
            if exists.is_none() {
                return Ok(UpdateOutcome::NotFound);
            }
            tx.execute(
                "UPDATE authors SET about = ?1 WHERE author = ?2",
                params![about, author],
            )?;
            Ok(UpdateOutcome::Updated(()))
        })?;

        if outcome == UpdateOutcome::NotFound {
            tracing::warn!("Author '{}' not found, biography not stored", author);
        }
        Ok(outcome)
    }

    fn truncate_content(&self) -> StorageResult<()> {
        self.with_transaction(|tx| {
            for table in CONTENT_TABLES {
                tx.execute(&format!("DELETE FROM {}", table), [])?;
            }
            Ok(())
        })?;
        tracing::info!("Cleared content tables");
        Ok(())
    }

    // ===== Content Queries =====

    fn get_author(&self, author: &str) -> StorageResult<Option<AuthorRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                "SELECT author, about FROM authors WHERE author = ?1",
                params![author],
                |row| {
                    Ok(AuthorRecord {
                        author: row.get(0)?,
                        about: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn list_tags(&self) -> StorageResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT tag FROM tags ORDER BY tag")?;
        let tags = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    fn list_authors(&self) -> StorageResult<Vec<AuthorRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT author, about FROM authors ORDER BY author")?;
        let authors = stmt
            .query_map([], |row| {
                Ok(AuthorRecord {
                    author: row.get(0)?,
                    about: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(authors)
    }

    fn list_quotes(&self) -> StorageResult<Vec<QuoteRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, text, author FROM quotes ORDER BY rowid")?;
        let quotes = stmt
            .query_map([], quote_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quotes)
    }

    fn list_quote_tags(&self) -> StorageResult<Vec<QuoteTagLink>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT quote_id, tag FROM quotes_tags_link ORDER BY rowid")?;
        let links = stmt
            .query_map([], |row| {
                Ok(QuoteTagLink {
                    quote_id: row.get(0)?,
                    tag: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn quotes_by_author(&self, author: &str) -> StorageResult<Vec<QuoteRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare("SELECT id, text, author FROM quotes WHERE author = ?1 ORDER BY rowid")?;
        let quotes = stmt
            .query_map(params![author], quote_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(quotes)
    }

    fn tags_for_quote(&self, quote_id: &str) -> StorageResult<Vec<String>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT tag FROM quotes_tags_link WHERE quote_id = ?1 ORDER BY tag")?;
        let tags = stmt
            .query_map(params![quote_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(tags)
    }

    // ===== Users =====

    fn insert_user(&self, user: &UserRecord) -> StorageResult<InsertOutcome> {
        let now = Utc::now().to_rfc3339();
        self.insert_if_absent(
            "user",
            &user.email,
            "INSERT INTO users (id, stripe_id, email, fullname, password, access, time_created)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT DO NOTHING",
            params![
                user.id,
                user.stripe_id,
                user.email,
                user.fullname,
                user.password,
                user.access,
                now
            ],
        )
    }

    fn get_user(&self, user_id: &str) -> StorageResult<Option<UserRecord>> {
        let conn = self.connect()?;
        let user = conn
            .query_row(
                "SELECT id, stripe_id, email, fullname, password, access FROM users WHERE id = ?1",
                params![user_id],
                |row| {
                    Ok(UserRecord {
                        id: row.get(0)?,
                        stripe_id: row.get(1)?,
                        email: row.get(2)?,
                        fullname: row.get(3)?,
                        password: row.get(4)?,
                        access: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn toggle_user_access(&self, user_id: &str) -> StorageResult<UpdateOutcome<bool>> {
        let outcome = self.update_existing("user", user_id, |tx| {
            let current: Option<bool> = tx
                .query_row(
                    "SELECT access FROM users WHERE id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(access) = current else {
                return Ok(UpdateOutcome::NotFound);
            };
            tx.execute(
                "UPDATE users SET access = ?1, time_updated = ?2 WHERE id = ?3",
                params![!access, Utc::now().to_rfc3339(), user_id],
            )?;
            Ok(UpdateOutcome::Updated(!access))
        })?;

        match outcome {
            UpdateOutcome::Updated(access) => {
                tracing::info!("User {} access set to {}", user_id, access)
            }
            UpdateOutcome::NotFound => tracing::warn!("User {} not found", user_id),
        }
        Ok(outcome)
    }

    fn change_user_password(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> StorageResult<UpdateOutcome> {
        let outcome = self.update_existing("user", user_id, |tx| {
            let exists = tx
                .query_row(
                    "SELECT 1 FROM users WHERE id = ?1",
                    params![user_id],
                    |_| Ok(()),
                )
                .optional()?;
            if exists.is_none() {
                return Ok(UpdateOutcome::NotFound);
            }
            tx.execute(
                "UPDATE users SET password = ?1, time_updated = ?2 WHERE id = ?3",
                params![password_hash, Utc::now().to_rfc3339(), user_id],
            )?;
            Ok(UpdateOutcome::Updated(()))
        })?;

        match outcome {
            UpdateOutcome::Updated(()) => tracing::info!("Password changed for user {}", user_id),
            UpdateOutcome::NotFound => {
                tracing::warn!("User {} not found, password unchanged", user_id)
            }
        }
        Ok(outcome)
    }

    fn record_api_log(&self, email: &str, level: LogLevel, message: &str) -> StorageResult<()> {
        let id = uuid::Uuid::new_v4().to_string();
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO api_logs (id, email, level, message, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, email, level.to_db_string(), message, Utc::now().to_rfc3339()],
            )
        })?;
        Ok(())
    }

    // ===== Statistics =====

    fn table_counts(&self) -> StorageResult<TableCounts> {
        let conn = self.connect()?;
        Ok(TableCounts {
            tags: self.count_rows(&conn, "tags")?,
            authors: self.count_rows(&conn, "authors")?,
            quotes: self.count_rows(&conn, "quotes")?,
            quote_tags: self.count_rows(&conn, "quotes_tags_link")?,
            users: self.count_rows(&conn, "users")?,
            api_logs: self.count_rows(&conn, "api_logs")?,
        })
    }

    fn count_authors_without_bio(&self) -> StorageResult<u64> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM authors WHERE about IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
