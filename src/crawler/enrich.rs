//! Author enrichment worker
//!
//! Fetches an author's biography page and stores the biography on the
//! author row that the page workers created.

use crate::crawler::fetcher::{fetch_page, FetchError};
use crate::crawler::parser::{parse_author_bio, StructureError};
use crate::crawler::ScrapeContext;
use crate::storage::{StorageError, UpdateOutcome};
use crate::url::resolve_link;
use crate::UrlError;
use thiserror::Error;
use tokio::task::JoinError;

/// An author whose biography was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedAuthor {
    pub name: String,
    pub bio: String,
    /// False when no author row matched the name
    pub updated: bool,
}

/// An author whose biography could not be stored
#[derive(Debug, Error)]
pub enum AuthorError {
    #[error("{name}: bad biography link: {source}")]
    Url {
        name: String,
        #[source]
        source: UrlError,
    },

    #[error("{name}: {source}")]
    Fetch {
        name: String,
        #[source]
        source: FetchError,
    },

    #[error("{name}: {source}")]
    Structure {
        name: String,
        #[source]
        source: StructureError,
    },

    #[error("{name}: {source}")]
    Storage {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("{name}: update task failed: {source}")]
    Join {
        name: String,
        #[source]
        source: JoinError,
    },
}

impl AuthorError {
    /// The author this error belongs to
    pub fn name(&self) -> &str {
        match self {
            Self::Url { name, .. }
            | Self::Fetch { name, .. }
            | Self::Structure { name, .. }
            | Self::Storage { name, .. }
            | Self::Join { name, .. } => name,
        }
    }
}

/// Fetches and stores one author's biography
///
/// A missing author row is not an error: it is logged and reported with
/// `updated = false`.
///
/// # Arguments
///
/// * `ctx` - Shared client, store and base URL
/// * `name` - The author's display name (the row key)
/// * `bio_link` - The biography link found on a listing page
pub async fn enrich_author(
    ctx: &ScrapeContext,
    name: String,
    bio_link: String,
) -> Result<EnrichedAuthor, AuthorError> {
    let url = match resolve_link(&ctx.base_url, &bio_link) {
        Ok(url) => url,
        Err(source) => return Err(AuthorError::Url { name, source }),
    };

    let body = match fetch_page(&ctx.client, &url).await {
        Ok(body) => body,
        Err(source) => return Err(AuthorError::Fetch { name, source }),
    };

    let bio = match parse_author_bio(&body) {
        Ok(bio) => bio,
        Err(source) => return Err(AuthorError::Structure { name, source }),
    };

    let store = ctx.store.clone();
    let (key, about) = (name.clone(), bio.clone());
    let joined =
        tokio::task::spawn_blocking(move || store.update_author_bio(&key, &about)).await;

    let updated = match joined {
        Ok(Ok(UpdateOutcome::Updated(()))) => true,
        Ok(Ok(UpdateOutcome::NotFound)) => false,
        Ok(Err(source)) => return Err(AuthorError::Storage { name, source }),
        Err(source) => return Err(AuthorError::Join { name, source }),
    };

    tracing::debug!("Enriched author '{}' from {}", name, url);
    Ok(EnrichedAuthor { name, bio, updated })
}
