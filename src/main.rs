//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest scraper.

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Parser;
use quote_harvest::config::{
    load_config_with_overrides, load_page_count, Config, ConfigOverrides,
};
use quote_harvest::crawler::{run_harvest, RunOptions};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: a concurrent quotes scraper
///
/// Quote-Harvest crawls every listing page of a quotes site, stores quotes,
/// authors and tags in SQLite, fetches every author's biography and exports
/// the results as CSV and JSON.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version)]
#[command(about = "A concurrent quotes scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Keep previously scraped rows instead of starting from empty tables
    #[arg(long)]
    append: bool,

    /// Skip the CSV and JSON exports
    #[arg(long)]
    no_export: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,

    /// Override the site root from the config file (must end with '/')
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the export directory from the config file
    #[arg(long, value_name = "DIR")]
    export_dir: Option<String>,

    /// Override the JSON export file stem from the config file
    #[arg(long, value_name = "STEM")]
    json_filename: Option<String>,

    /// Run without the database; results only reach the exports
    #[arg(long, conflicts_with = "stats")]
    no_db: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            base_url: self.base_url.clone(),
            export_dir: self.export_dir.clone(),
            json_filename: self.json_filename.clone(),
            disable_database: self.no_db,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The log file location comes from the config, so load it first
    let overrides = cli.overrides();
    let (config, config_hash) = load_config_with_overrides(&cli.config, &overrides)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let _log_guard = setup_logging(cli.verbose, cli.quiet, config.output.logs_dir.as_deref())?;

    tracing::info!("Loaded configuration from: {}", cli.config.display());
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);
    if !overrides.is_empty() {
        tracing::info!("Command-line overrides applied: {:?}", overrides);
    }

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else {
        let options = RunOptions {
            append: cli.append,
            export: !cli.no_export,
        };
        handle_harvest(config, options).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr and, when `logs_dir` is set, to a new file in that
/// directory named after the run's start time. The returned guard flushes
/// the file writer and must live until the program exits.
fn setup_logging(
    verbose: u8,
    quiet: bool,
    logs_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Workers run on several threads, so thread ids help untangle the log
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(false);

    let (file_layer, guard) = match logs_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir))?;
            let appender = tracing_appender::rolling::never(dir, log_file_name(Local::now()));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Name of the log file for a run started at `started`
fn log_file_name(started: DateTime<Local>) -> String {
    format!("harvest_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let known = load_page_count(
        Path::new(&config.output.state_path),
        config.scraper.initial_pages,
    )?;

    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Base URL: {}", config.scraper.base_url);
    println!("  Known page count: {}", known);
    println!("  Workers: {}", config.scraper.worker_count());
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nOutput:");
    if config.output.database_enabled {
        println!("  Database: {}", config.output.database_path);
    } else {
        println!("  Database: disabled");
    }
    println!("  Export directory: {}", config.output.export_dir);
    println!("  JSON document: {}.json", config.output.json_filename);
    println!("  Page-count state: {}", config.output.state_path);
    if let Some(dir) = &config.output.logs_dir {
        println!("  Log directory: {}", dir);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape at least {} listing pages", known);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use quote_harvest::output::{load_statistics, print_statistics};
    use quote_harvest::storage::SqliteStore;

    if !config.output.database_enabled {
        anyhow::bail!("statistics need the database, but it is disabled in the configuration");
    }

    println!("Database: {}\n", config.output.database_path);

    let store = SqliteStore::open(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, options: RunOptions) -> anyhow::Result<()> {
    if options.append {
        tracing::info!("Starting harvest (appending to existing data)");
    } else {
        tracing::info!("Starting fresh harvest (content tables will be cleared)");
    }

    tokio::select! {
        result = run_harvest(config, options) => {
            let report = result.context("harvest failed")?;
            report.log_summary();
            for path in &report.exported {
                println!("✓ Exported {}", path.display());
            }
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupted, aborting in-flight workers");
            anyhow::bail!("harvest interrupted")
        }
    }
}
