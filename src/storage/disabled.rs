//! Store used when the database is turned off
//!
//! Every write is accepted and dropped, every read comes back empty. Runs
//! still scrape, enrich and export; nothing touches the disk here.

use crate::storage::traits::{Store, StorageResult};
use crate::storage::{
    AuthorRecord, InsertOutcome, LogLevel, QuoteRecord, QuoteTagLink, TableCounts, UpdateOutcome,
    UserRecord,
};

/// A [`Store`] that keeps nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledStore;

impl DisabledStore {
    fn skipped(operation: &str, key: &str) {
        tracing::debug!("Database disabled, {} '{}' ignored", operation, key);
    }
}

impl Store for DisabledStore {
    fn insert_tag(&self, tag: &str) -> StorageResult<InsertOutcome> {
        Self::skipped("insert_tag", tag);
        Ok(InsertOutcome::Inserted)
    }

    fn insert_author(&self, author: &str) -> StorageResult<InsertOutcome> {
        Self::skipped("insert_author", author);
        Ok(InsertOutcome::Inserted)
    }

    fn insert_quote(&self, quote: &QuoteRecord) -> StorageResult<InsertOutcome> {
        Self::skipped("insert_quote", &quote.id);
        Ok(InsertOutcome::Inserted)
    }

    fn insert_quote_tag(&self, link: &QuoteTagLink) -> StorageResult<InsertOutcome> {
        Self::skipped("insert_quote_tag", &link.quote_id);
        Ok(InsertOutcome::Inserted)
    }

    fn update_author_bio(&self, author: &str, _about: &str) -> StorageResult<UpdateOutcome> {
        Self::skipped("update_author_bio", author);
        Ok(UpdateOutcome::Updated(()))
    }

    fn truncate_content(&self) -> StorageResult<()> {
        tracing::info!("Database disabled, content tables left alone");
        Ok(())
    }

    fn get_author(&self, _author: &str) -> StorageResult<Option<AuthorRecord>> {
        Ok(None)
    }

    fn list_tags(&self) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn list_authors(&self) -> StorageResult<Vec<AuthorRecord>> {
        Ok(Vec::new())
    }

    fn list_quotes(&self) -> StorageResult<Vec<QuoteRecord>> {
        Ok(Vec::new())
    }

    fn list_quote_tags(&self) -> StorageResult<Vec<QuoteTagLink>> {
        Ok(Vec::new())
    }

    fn quotes_by_author(&self, _author: &str) -> StorageResult<Vec<QuoteRecord>> {
        Ok(Vec::new())
    }

    fn tags_for_quote(&self, _quote_id: &str) -> StorageResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn insert_user(&self, user: &UserRecord) -> StorageResult<InsertOutcome> {
        Self::skipped("insert_user", &user.email);
        Ok(InsertOutcome::Inserted)
    }

    fn get_user(&self, _user_id: &str) -> StorageResult<Option<UserRecord>> {
        Ok(None)
    }

    // No users are kept, so there is nothing to flip
    fn toggle_user_access(&self, user_id: &str) -> StorageResult<UpdateOutcome<bool>> {
        Self::skipped("toggle_user_access", user_id);
        Ok(UpdateOutcome::NotFound)
    }

    fn change_user_password(
        &self,
        user_id: &str,
        _password_hash: &str,
    ) -> StorageResult<UpdateOutcome> {
        Self::skipped("change_user_password", user_id);
        Ok(UpdateOutcome::NotFound)
    }

    fn record_api_log(&self, email: &str, level: LogLevel, _message: &str) -> StorageResult<()> {
        Self::skipped(level.to_db_string(), email);
        Ok(())
    }

    fn table_counts(&self) -> StorageResult<TableCounts> {
        Ok(TableCounts::default())
    }

    fn count_authors_without_bio(&self) -> StorageResult<u64> {
        Ok(0)
    }
}
