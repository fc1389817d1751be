use serde::Deserialize;
use std::num::NonZeroUsize;

/// Main configuration structure for Quote-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Root URL of the quotes site, ending with '/'
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Page count assumed when no page-count state has been persisted yet
    #[serde(rename = "initial-pages")]
    pub initial_pages: u32,

    /// Most pages discovery may add in one run
    #[serde(rename = "max-new-pages", default = "default_max_new_pages")]
    pub max_new_pages: u32,

    /// Worker pool size; defaults to the available hardware parallelism
    #[serde(default)]
    pub workers: Option<usize>,

    /// Upper bound for a single HTTP request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl ScraperConfig {
    /// Number of workers each pool runs with
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4)
        })
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory receiving the CSV exports and the JSON document
    #[serde(rename = "export-dir")]
    pub export_dir: String,

    /// File stem of the combined JSON export
    #[serde(rename = "json-filename", default = "default_json_filename")]
    pub json_filename: String,

    /// Path to the JSON document holding the last known page count
    #[serde(rename = "state-path")]
    pub state_path: String,

    /// When false, nothing is written to or read from the database
    #[serde(rename = "database-enabled", default = "default_true")]
    pub database_enabled: bool,

    /// Directory receiving one log file per run; file logging is off when unset
    #[serde(rename = "logs-dir", default)]
    pub logs_dir: Option<String>,
}

fn default_max_new_pages() -> u32 {
    50
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("quote-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_json_filename() -> String {
    "quotes".to_string()
}
