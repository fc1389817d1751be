//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the shared HTTP client with the configured user agent
//! - GET requests returning the raw page body
//! - Error classification
//!
//! There are no retries: a failed fetch fails the unit of work that issued it.

use crate::config::ScraperConfig;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connect timeout, kept below the overall request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the client timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// DNS, connection or protocol failure
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read or decoded
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::Status { url, .. }
            | Self::Body { url, .. } => url,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration (user agent and timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use quote_harvest::config::ScraperConfig;
/// use quote_harvest::crawler::build_http_client;
///
/// let config = ScraperConfig {
///     base_url: "https://quotes.toscrape.com/".to_string(),
///     initial_pages: 10,
///     max_new_pages: 50,
///     workers: Some(4),
///     request_timeout_secs: 30,
///     user_agent: "quote-harvest/0.1".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | `Ok(body)` |
/// | Other status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | DNS / connection failure | `FetchError::Network` |
/// | Undecodable body | `FetchError::Body` |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    tracing::debug!("GET {}", url);

    let response = client.get(url.as_str()).send().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Network {
                url: url.to_string(),
                source: e,
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                source: e,
            }
        }
    })
}
