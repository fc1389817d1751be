//! Configuration module for Quote-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and the small JSON document that remembers the site's page count
//! between runs.
//!
//! # Example
//!
//! ```no_run
//! use quote_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Scraping {}", config.scraper.base_url);
//! ```

mod page_count;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ScraperConfig};

// Re-export parser functions
pub use page_count::{load_page_count, persist_page_count, PAGE_COUNT_KEY};
pub use parser::{
    compute_config_hash, load_config, load_config_with_overrides, ConfigOverrides,
};
