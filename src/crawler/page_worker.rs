//! Listing page worker
//!
//! Fetches one listing page, parses it and persists every quote on it. Rows
//! for a quote are written in dependency order (tags, author, quote, links)
//! so that every foreign key already exists when its row is committed.

use crate::crawler::fetcher::{fetch_page, FetchError};
use crate::crawler::parser::{parse_listing_page, QuoteEntry, StructureError};
use crate::crawler::ScrapeContext;
use crate::storage::{QuoteRecord, QuoteTagLink, StorageError, StorageResult, Store};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tokio::task::JoinError;
use url::Url;
use uuid::Uuid;

/// Everything one listing page contributed
#[derive(Debug, Clone, Default)]
pub struct PageOutcome {
    pub page_url: String,
    /// Author name to biography link
    pub authors: HashMap<String, String>,
    pub tags: BTreeSet<String>,
    pub quotes: Vec<QuoteRecord>,
    pub quote_tags: Vec<QuoteTagLink>,
}

/// A listing page that could not be scraped
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("{url}: {source}")]
    Structure {
        url: String,
        #[source]
        source: StructureError,
    },

    #[error("{url}: {source}")]
    Storage {
        url: String,
        #[source]
        source: StorageError,
    },

    #[error("{url}: persistence task failed: {source}")]
    Join {
        url: String,
        #[source]
        source: JoinError,
    },
}

impl PageError {
    /// The page this error belongs to
    pub fn url(&self) -> &str {
        match self {
            Self::Fetch { url, .. }
            | Self::Structure { url, .. }
            | Self::Storage { url, .. }
            | Self::Join { url, .. } => url,
        }
    }
}

/// Scrapes one listing page
///
/// # Arguments
///
/// * `ctx` - Shared client, store and base URL
/// * `page_url` - The listing page to scrape
///
/// # Returns
///
/// * `Ok(PageOutcome)` - The page's authors, tags, quotes and links
/// * `Err(PageError)` - The page failed; rows persisted before the failure stay
pub async fn scrape_page(ctx: &ScrapeContext, page_url: Url) -> Result<PageOutcome, PageError> {
    let url = page_url.to_string();

    let body = fetch_page(&ctx.client, &page_url)
        .await
        .map_err(|source| PageError::Fetch {
            url: url.clone(),
            source,
        })?;

    let entries = parse_listing_page(&body).map_err(|source| PageError::Structure {
        url: url.clone(),
        source,
    })?;
    tracing::debug!("Parsed {} quotes from {}", entries.len(), url);

    let store = ctx.store.clone();
    let page = url.clone();
    let outcome = tokio::task::spawn_blocking(move || persist_entries(store.as_ref(), page, entries))
        .await
        .map_err(|source| PageError::Join {
            url: url.clone(),
            source,
        })?
        .map_err(|source| PageError::Storage {
            url: url.clone(),
            source,
        })?;

    tracing::info!("Scraped {} ({} quotes)", url, outcome.quotes.len());
    Ok(outcome)
}

/// Persists the quotes of one page in page order
fn persist_entries(
    store: &dyn Store,
    page_url: String,
    entries: Vec<QuoteEntry>,
) -> StorageResult<PageOutcome> {
    let mut outcome = PageOutcome {
        page_url,
        ..Default::default()
    };

    for entry in entries {
        for tag in &entry.tags {
            store.insert_tag(tag)?;
        }
        store.insert_author(&entry.author)?;

        let quote = QuoteRecord {
            id: Uuid::new_v4().to_string(),
            text: entry.text,
            author: entry.author.clone(),
        };
        store.insert_quote(&quote)?;

        for tag in entry.tags {
            let link = QuoteTagLink {
                quote_id: quote.id.clone(),
                tag: tag.clone(),
            };
            store.insert_quote_tag(&link)?;
            outcome.tags.insert(tag);
            outcome.quote_tags.push(link);
        }

        outcome.authors.insert(entry.author, entry.bio_link);
        outcome.quotes.push(quote);
    }

    Ok(outcome)
}
