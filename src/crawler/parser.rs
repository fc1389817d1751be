//! HTML parser for quote listing and author pages
//!
//! Listing pages are laid out as two `div.row` blocks: a header row and a
//! content row whose `div.col-md-8` column holds one `div.quote` per quote
//! followed by the pager. Author pages carry the biography in
//! `div.author-details`.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// The page markup does not have the expected structure
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("missing element `{0}`")]
    MissingElement(&'static str),

    #[error("invalid selector `{0}`")]
    InvalidSelector(&'static str),
}

/// One quote as it appears on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteEntry {
    /// Quote text, trimmed
    pub text: String,
    /// Author display name, trimmed
    pub author: String,
    /// Link to the author's biography page, as found on the page
    pub bio_link: String,
    /// Tags in page order, without duplicates or empty items
    pub tags: Vec<String>,
}

fn selector(css: &'static str) -> Result<Selector, StructureError> {
    Selector::parse(css).map_err(|_| StructureError::InvalidSelector(css))
}

fn select_first<'a>(
    scope: ElementRef<'a>,
    css: &'static str,
) -> Result<ElementRef<'a>, StructureError> {
    scope
        .select(&selector(css)?)
        .next()
        .ok_or(StructureError::MissingElement(css))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parses a listing page into its quotes, in page order
///
/// A page whose content column exists but holds no quotes yields an empty
/// list. A missing content column, or a quote missing any of its text,
/// author, biography link or keywords, fails the whole page.
///
/// # Arguments
///
/// * `html` - The listing page markup
///
/// # Returns
///
/// * `Ok(Vec<QuoteEntry>)` - The quotes found on the page
/// * `Err(StructureError)` - The markup does not match the listing layout
///
/// # Example
///
/// ```
/// use quote_harvest::crawler::parse_listing_page;
///
/// let html = r#"<html><body>
///   <div class="row"><div class="col-md-8"><h1>Quotes</h1></div></div>
///   <div class="row"><div class="col-md-8">
///     <div class="quote">
///       <span class="text">"Be yourself."</span>
///       <span>by <small class="author">Oscar Wilde</small>
///         <a href="/author/Oscar-Wilde">(about)</a></span>
///       <div class="tags"><meta class="keywords" content="life,humor"></div>
///     </div>
///   </div></div>
/// </body></html>"#;
///
/// let quotes = parse_listing_page(html).unwrap();
/// assert_eq!(quotes.len(), 1);
/// assert_eq!(quotes[0].author, "Oscar Wilde");
/// assert_eq!(quotes[0].tags, vec!["life", "humor"]);
/// ```
pub fn parse_listing_page(html: &str) -> Result<Vec<QuoteEntry>, StructureError> {
    let document = Html::parse_document(html);

    let content_row = document
        .select(&selector("div.row")?)
        .nth(1)
        .ok_or(StructureError::MissingElement("div.row"))?;
    let container = select_first(content_row, "div.col-md-8")?;

    let quote_selector = selector("div.quote")?;
    container
        .select(&quote_selector)
        .map(parse_quote)
        .collect()
}

fn parse_quote(quote: ElementRef<'_>) -> Result<QuoteEntry, StructureError> {
    let text = text_of(select_first(quote, ".text")?);
    let author = text_of(select_first(quote, ".author")?);

    let bio_link = select_first(quote, "span > a[href]")?
        .value()
        .attr("href")
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .ok_or(StructureError::MissingElement("span > a[href]"))?;

    let keywords = select_first(quote, "meta.keywords")?
        .value()
        .attr("content")
        .ok_or(StructureError::MissingElement("meta.keywords[content]"))?;

    let mut tags: Vec<String> = Vec::new();
    for tag in keywords.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }

    Ok(QuoteEntry {
        text,
        author,
        bio_link,
        tags,
    })
}

/// Extracts the biography text from an author page
pub fn parse_author_bio(html: &str) -> Result<String, StructureError> {
    let document = Html::parse_document(html);
    let details = document
        .select(&selector(".author-details")?)
        .next()
        .ok_or(StructureError::MissingElement(".author-details"))?;
    Ok(text_of(details))
}

/// Returns the target of the page's next-page control, as written in the markup
pub fn next_page_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let next = selector("li.next > a[href]").ok()?;
    document
        .select(&next)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
}

/// Returns true when the page has a next-page control
pub fn has_next_page(html: &str) -> bool {
    next_page_link(html).is_some()
}
