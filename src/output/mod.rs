//! Output module for exporting scraped data
//!
//! This module handles:
//! - Assembling the exported entity sets from a run
//! - Writing one CSV file per entity set
//! - Writing the combined JSON document
//! - Database statistics for the `--stats` mode

mod csv_export;
mod json_export;
pub mod stats;

pub use csv_export::{export_csv, AUTHORS_CSV, QUOTES_CSV, QUOTE_TAGS_CSV, TAGS_CSV};
pub use json_export::export_json;
pub use stats::{load_statistics, print_statistics, HarvestStatistics};

use crate::crawler::{Aggregate, EnrichedAuthor};
use crate::storage::{AuthorRecord, QuoteRecord, QuoteTagLink};
use serde::Serialize;
use std::collections::HashMap;

/// The entity sets written by the exporters
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportSet {
    pub quotes: Vec<QuoteRecord>,
    pub authors: Vec<AuthorRecord>,
    pub tags: Vec<String>,
    #[serde(rename = "quotes_tags_link")]
    pub quote_tags: Vec<QuoteTagLink>,
}

impl ExportSet {
    /// Builds the export from a run's aggregate and its enriched authors
    ///
    /// Authors whose enrichment failed are exported with an empty biography.
    pub fn from_run(aggregate: &Aggregate, enriched: &[EnrichedAuthor]) -> Self {
        let bios: HashMap<&str, &str> = enriched
            .iter()
            .map(|author| (author.name.as_str(), author.bio.as_str()))
            .collect();

        let authors = aggregate
            .authors
            .keys()
            .map(|name| AuthorRecord {
                author: name.clone(),
                about: Some(bios.get(name.as_str()).copied().unwrap_or("").to_string()),
            })
            .collect();

        Self {
            quotes: aggregate.quotes.clone(),
            authors,
            tags: aggregate.tags.iter().cloned().collect(),
            quote_tags: aggregate.quote_tags.clone(),
        }
    }
}
