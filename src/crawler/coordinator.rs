//! Harvest coordinator - main run orchestration logic
//!
//! This module wires the phases of a run together:
//! - Fetching the seed page (the only fetch whose failure aborts the run)
//! - Preparing the store (fresh snapshot or append)
//! - Refreshing the page count
//! - The listing page pool, followed by aggregation
//! - The author enrichment pool
//! - Exporting the results

use crate::config::Config;
use crate::crawler::aggregate::{aggregate, Aggregate};
use crate::crawler::enrich::{enrich_author, AuthorError, EnrichedAuthor};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::page_worker::{scrape_page, PageError};
use crate::crawler::pagination::refresh_page_count;
use crate::crawler::pool::run_pool;
use crate::crawler::ScrapeContext;
use crate::output::{export_csv, export_json, ExportSet};
use crate::storage::{DisabledStore, SqliteStore, Store};
use crate::url::{page_urls, parse_base_url};
use crate::HarvestError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Run-level switches
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Keep existing content rows instead of starting from empty tables
    pub append: bool,
    /// Write the CSV and JSON exports at the end of the run
    pub export: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            append: false,
            export: true,
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Number of listing pages scraped (the discovered page count)
    pub page_count: u32,
    pub pages_ok: usize,
    pub page_failures: Vec<PageError>,
    pub authors_enriched: usize,
    /// Enriched authors that had no row to update
    pub authors_missing: usize,
    pub author_failures: Vec<AuthorError>,
    pub quotes: usize,
    pub authors: usize,
    pub tags: usize,
    pub quote_tags: usize,
    /// Files written by the exporters
    pub exported: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl RunReport {
    /// True when every page and every author succeeded
    pub fn is_complete(&self) -> bool {
        self.page_failures.is_empty() && self.author_failures.is_empty()
    }

    /// Logs the summary, listing every failed unit at warn level
    pub fn log_summary(&self) {
        tracing::info!(
            "Harvest finished in {:.1?}: {}/{} pages, {} quotes, {} authors, {} tags, {} links",
            self.elapsed,
            self.pages_ok,
            self.page_count,
            self.quotes,
            self.authors,
            self.tags,
            self.quote_tags
        );
        tracing::info!(
            "Authors enriched: {} ({} failed, {} without row)",
            self.authors_enriched,
            self.author_failures.len(),
            self.authors_missing
        );

        for failure in &self.page_failures {
            tracing::warn!("Page failed: {}", failure);
        }
        for failure in &self.author_failures {
            tracing::warn!("Author failed: {}", failure);
        }
    }
}

/// Main harvest coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    store: Arc<dyn Store>,
    client: Client,
    base_url: Url,
    options: RunOptions,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `options` - Run-level switches
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Failed to open the database or build the client
    pub fn new(config: Config, options: RunOptions) -> crate::Result<Self> {
        let base_url = parse_base_url(&config.scraper.base_url)?;
        let store: Arc<dyn Store> = if config.output.database_enabled {
            Arc::new(SqliteStore::open(Path::new(&config.output.database_path))?)
        } else {
            tracing::info!("Database disabled, results go to the exports only");
            Arc::new(DisabledStore)
        };
        let client = build_http_client(&config.scraper)?;

        Ok(Self {
            config: Arc::new(config),
            store,
            client,
            base_url,
            options,
        })
    }

    /// The store this coordinator writes to
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    fn context(&self) -> ScrapeContext {
        ScrapeContext {
            client: self.client.clone(),
            store: self.store.clone(),
            base_url: self.base_url.clone(),
        }
    }

    /// Runs one complete harvest
    ///
    /// Page and author failures are collected in the report; only the seed
    /// fetch, store preparation, page-count state and export failures abort
    /// the run.
    pub async fn run(&self) -> crate::Result<RunReport> {
        let start_time = Instant::now();
        tracing::info!("Starting harvest of {}", self.base_url);

        fetch_page(&self.client, &self.base_url)
            .await
            .map_err(HarvestError::SeedFetch)?;

        if self.options.append {
            tracing::info!("Appending to existing content");
        } else {
            let store = self.store.clone();
            tokio::task::spawn_blocking(move || store.truncate_content()).await??;
        }

        let page_count = refresh_page_count(&self.client, &self.config).await?;
        let urls = page_urls(&self.base_url, page_count)?;
        let workers = self.config.scraper.worker_count();

        // Phase 1: listing pages
        let ctx = self.context();
        let page_results = run_pool(urls, workers, move |url| {
            let ctx = ctx.clone();
            async move { scrape_page(&ctx, url).await }
        })
        .await;

        let (outcomes, page_failures) = partition_results(page_results);
        let merged = aggregate(outcomes);
        tracing::info!(
            "Scraped {}/{} pages: {} quotes by {} authors",
            merged.pages,
            page_count,
            merged.quotes.len(),
            merged.authors.len()
        );

        // Phase 2: author biographies, one task per distinct author
        let ctx = self.context();
        let authors: Vec<(String, String)> = merged
            .authors
            .iter()
            .map(|(name, link)| (name.clone(), link.clone()))
            .collect();
        let author_results = run_pool(authors, workers, move |(name, link)| {
            let ctx = ctx.clone();
            async move { enrich_author(&ctx, name, link).await }
        })
        .await;

        let (enriched, author_failures) = partition_results(author_results);

        let exported = if self.options.export {
            self.export(&merged, &enriched)?
        } else {
            Vec::new()
        };

        Ok(RunReport {
            page_count,
            pages_ok: merged.pages,
            page_failures,
            authors_enriched: enriched.iter().filter(|a| a.updated).count(),
            authors_missing: enriched.iter().filter(|a| !a.updated).count(),
            author_failures,
            quotes: merged.quotes.len(),
            authors: merged.authors.len(),
            tags: merged.tags.len(),
            quote_tags: merged.quote_tags.len(),
            exported,
            elapsed: start_time.elapsed(),
        })
    }

    fn export(
        &self,
        merged: &Aggregate,
        enriched: &[EnrichedAuthor],
    ) -> crate::Result<Vec<PathBuf>> {
        let set = ExportSet::from_run(merged, enriched);
        let dir = Path::new(&self.config.output.export_dir);

        let mut written = export_csv(dir, &set)?;
        let json_path = dir.join(format!("{}.json", self.config.output.json_filename));
        export_json(&json_path, &set)?;
        written.push(json_path);

        Ok(written)
    }
}

fn partition_results<T, E>(results: Vec<Result<T, E>>) -> (Vec<T>, Vec<E>) {
    let mut ok = Vec::with_capacity(results.len());
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(value) => ok.push(value),
            Err(e) => failed.push(e),
        }
    }
    (ok, failed)
}

/// Runs a complete harvest with the given configuration
///
/// This is the main entry point for a run. It will:
/// 1. Open the database (unless disabled) and build the HTTP client
/// 2. Fetch the seed page
/// 3. Clear the content tables (unless appending)
/// 4. Refresh the page count
/// 5. Scrape every listing page, then enrich every author
/// 6. Export the results
///
/// # Arguments
///
/// * `config` - The validated configuration
/// * `options` - Run-level switches
///
/// # Returns
///
/// * `Ok(RunReport)` - The run finished (possibly with failed units)
/// * `Err(HarvestError)` - The run was aborted
pub async fn run_harvest(config: Config, options: RunOptions) -> crate::Result<RunReport> {
    let coordinator = Coordinator::new(config, options)?;
    coordinator.run().await
}
