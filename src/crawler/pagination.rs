//! Page count discovery
//!
//! The site grows by appending listing pages. Starting from the last known
//! page count, discovery follows the next-page controls forward until it
//! reaches a page without one. Gaps (page P+1 missing while P+2 exists) are
//! not detected.

use crate::config::{load_page_count, persist_page_count, Config};
use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::next_page_link;
use crate::url::{page_url, parse_base_url};
use reqwest::Client;
use std::path::Path;
use url::Url;

/// Computes the current number of listing pages
///
/// Fetches page `known`; while the fetched page's next-page control points
/// at the following page, moves on to it. Returns the number of the first
/// page without the control, or `known` when page `known` has none.
///
/// Discovery is best-effort: a failed fetch stops the walk and the last page
/// whose content was actually fetched is returned (never less than `known`).
/// The walk also stops, with a warning, when a control points anywhere but
/// the following page or when `max_new` pages have been added.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `base` - The site root
/// * `known` - The last known page count (at least 1)
/// * `max_new` - Most pages the walk may add beyond `known`
pub async fn discover_page_count(
    client: &Client,
    base: &Url,
    known: u32,
    max_new: u32,
) -> u32 {
    let limit = known.saturating_add(max_new);
    let mut confirmed = known;
    let mut page = known;

    loop {
        let url = match page_url(base, page) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot build URL for page {}: {}", page, e);
                return confirmed;
            }
        };

        let body = match fetch_page(client, &url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(
                    "Pagination probe failed, keeping {} pages: {}",
                    confirmed,
                    e
                );
                return confirmed;
            }
        };
        confirmed = page;

        let Some(href) = next_page_link(&body) else {
            tracing::debug!("Page {} has no next-page control", page);
            return confirmed;
        };

        if !links_to_page(&url, &href, page + 1) {
            tracing::warn!(
                "Page {} links to '{}' instead of page {}, keeping {} pages",
                page,
                href,
                page + 1,
                confirmed
            );
            return confirmed;
        }

        if page >= limit {
            tracing::warn!(
                "Discovery stopped after {} new pages, keeping {} pages",
                max_new,
                confirmed
            );
            return confirmed;
        }

        tracing::debug!("Page {} links to page {}", page, page + 1);
        page += 1;
    }
}

/// True when `href`, found on the page at `current`, targets listing page `page`
fn links_to_page(current: &Url, href: &str, page: u32) -> bool {
    let suffix = format!("/page/{}", page);
    match current.join(href) {
        Ok(target) => target.path().trim_end_matches('/').ends_with(&suffix),
        Err(_) => false,
    }
}

/// Loads the persisted page count, discovers the current one and persists it
///
/// The configured `initial-pages` value is used when no count has been
/// persisted yet. The state document is written when the count changed or
/// did not exist.
///
/// # Returns
///
/// * `Ok(u32)` - The page count to scrape
/// * `Err(HarvestError)` - The state document could not be read or written
pub async fn refresh_page_count(client: &Client, config: &Config) -> crate::Result<u32> {
    let state_path = Path::new(&config.output.state_path);
    let had_state = state_path.exists();
    let known = load_page_count(state_path, config.scraper.initial_pages)?;
    let base = parse_base_url(&config.scraper.base_url)?;

    let count =
        discover_page_count(client, &base, known, config.scraper.max_new_pages).await;

    if count != known {
        tracing::info!("Page count grew from {} to {}", known, count);
    } else {
        tracing::info!("Page count unchanged at {}", count);
    }

    if count != known || !had_state {
        persist_page_count(state_path, count)?;
    }

    Ok(count)
}
