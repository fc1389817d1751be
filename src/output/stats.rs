//! Statistics generation from the quotes database
//!
//! This module provides functionality for extracting and displaying
//! database statistics from the storage layer.

use crate::storage::{Store, TableCounts};

/// Database statistics summary
#[derive(Debug, Clone)]
pub struct HarvestStatistics {
    /// Row counts per table
    pub counts: TableCounts,

    /// Authors whose biography is still unset
    pub authors_without_bio: u64,

    /// Tags in alphabetical order
    pub tags: Vec<String>,
}

impl HarvestStatistics {
    /// Average number of tags attached to a quote
    pub fn tags_per_quote(&self) -> f64 {
        if self.counts.quotes == 0 {
            0.0
        } else {
            self.counts.quote_tags as f64 / self.counts.quotes as f64
        }
    }

    /// Share of authors with a biography, in percent
    pub fn bio_coverage(&self) -> f64 {
        if self.counts.authors == 0 {
            0.0
        } else {
            let enriched = self.counts.authors.saturating_sub(self.authors_without_bio);
            (enriched as f64 / self.counts.authors as f64) * 100.0
        }
    }
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The storage backend to query
///
/// # Returns
///
/// * `Ok(HarvestStatistics)` - Successfully loaded statistics
/// * `Err(HarvestError)` - Failed to query statistics
pub fn load_statistics(store: &dyn Store) -> crate::Result<HarvestStatistics> {
    let counts = store.table_counts()?;
    let authors_without_bio = store.count_authors_without_bio()?;
    let tags = store.list_tags()?;

    Ok(HarvestStatistics {
        counts,
        authors_without_bio,
        tags,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &HarvestStatistics) {
    println!("=== Harvest Statistics ===\n");

    println!("Content:");
    println!("  Quotes: {}", stats.counts.quotes);
    println!("  Authors: {}", stats.counts.authors);
    println!("  Tags: {}", stats.counts.tags);
    println!(
        "  Quote-tag links: {} ({:.2} per quote)",
        stats.counts.quote_tags,
        stats.tags_per_quote()
    );
    println!();

    println!("Enrichment:");
    println!(
        "  Authors with biography: {:.1}% ({} missing)",
        stats.bio_coverage(),
        stats.authors_without_bio
    );
    println!();

    println!("API:");
    println!("  Users: {}", stats.counts.users);
    println!("  Log entries: {}", stats.counts.api_logs);

    if !stats.tags.is_empty() {
        println!("\nTags ({}):", stats.tags.len());
        for tag in &stats.tags {
            println!("  - {}", tag);
        }
    }
}
