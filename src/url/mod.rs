//! URL construction for the quotes site
//!
//! Listing pages live at `<base>page/<n>/`; author biography links are
//! site-relative (`/author/Jane-Doe`) and are resolved against the base URL.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the configured base URL
///
/// The base must end with a slash so that relative joins append to it
/// rather than replacing its last segment.
///
/// # Examples
///
/// ```
/// use quote_harvest::url::parse_base_url;
///
/// assert!(parse_base_url("https://quotes.toscrape.com/").is_ok());
/// assert!(parse_base_url("https://quotes.toscrape.com").is_ok());
/// assert!(parse_base_url("https://example.com/quotes").is_err());
/// ```
pub fn parse_base_url(base: &str) -> UrlResult<Url> {
    let url = Url::parse(base)?;
    if !url.path().ends_with('/') {
        return Err(UrlError::MissingTrailingSlash(base.to_string()));
    }
    Ok(url)
}

/// Builds the URL of listing page `page` (1-based)
///
/// # Examples
///
/// ```
/// use quote_harvest::url::{page_url, parse_base_url};
///
/// let base = parse_base_url("https://quotes.toscrape.com/").unwrap();
/// let url = page_url(&base, 3).unwrap();
/// assert_eq!(url.as_str(), "https://quotes.toscrape.com/page/3/");
/// ```
pub fn page_url(base: &Url, page: u32) -> UrlResult<Url> {
    Ok(base.join(&format!("page/{}/", page))?)
}

/// Builds the URLs of listing pages `1..=count`
pub fn page_urls(base: &Url, count: u32) -> UrlResult<Vec<Url>> {
    (1..=count).map(|page| page_url(base, page)).collect()
}

/// Resolves a (possibly relative) link found on a page against the base URL
pub fn resolve_link(base: &Url, href: &str) -> UrlResult<Url> {
    Ok(base.join(href.trim())?)
}
