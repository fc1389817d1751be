//! Merging of per-page outcomes

use crate::crawler::page_worker::PageOutcome;
use crate::storage::{QuoteRecord, QuoteTagLink};
use std::collections::{BTreeMap, BTreeSet};

/// The union of every successful page outcome
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Number of pages merged
    pub pages: usize,
    pub tags: BTreeSet<String>,
    /// Author name to biography link
    pub authors: BTreeMap<String, String>,
    pub quotes: Vec<QuoteRecord>,
    pub quote_tags: Vec<QuoteTagLink>,
}

/// Merges page outcomes into one aggregate
///
/// Tags and authors are unions; when two pages disagree on an author's
/// biography link the later outcome wins. Quotes and links are concatenated.
pub fn aggregate<I>(outcomes: I) -> Aggregate
where
    I: IntoIterator<Item = PageOutcome>,
{
    outcomes
        .into_iter()
        .fold(Aggregate::default(), |mut merged, outcome| {
            merged.pages += 1;
            merged.tags.extend(outcome.tags);
            merged.authors.extend(outcome.authors);
            merged.quotes.extend(outcome.quotes);
            merged.quote_tags.extend(outcome.quote_tags);
            merged
        })
}
