//! Crawler module for scraping the quotes site
//!
//! This module contains the core scraping logic, including:
//! - HTTP fetching
//! - Listing and author page parsing
//! - Page count discovery
//! - Bounded worker pools for listing pages and author biographies
//! - Merging of per-page results
//! - Overall run coordination

mod aggregate;
mod coordinator;
mod enrich;
mod fetcher;
mod page_worker;
mod pagination;
mod parser;
pub mod pool;

pub use aggregate::{aggregate, Aggregate};
pub use coordinator::{run_harvest, Coordinator, RunOptions, RunReport};
pub use enrich::{enrich_author, AuthorError, EnrichedAuthor};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use page_worker::{scrape_page, PageError, PageOutcome};
pub use pagination::{discover_page_count, refresh_page_count};
pub use parser::{
    has_next_page, next_page_link, parse_author_bio, parse_listing_page, QuoteEntry, StructureError,
};

use crate::storage::Store;
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Shared state handed to every worker
#[derive(Clone)]
pub struct ScrapeContext {
    pub client: Client,
    pub store: Arc<dyn Store>,
    /// Site root used to resolve relative links
    pub base_url: Url,
}
