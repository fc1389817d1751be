//! Configuration loading
//!
//! A configuration is read once, fingerprinted, parsed, patched with any
//! command-line overrides and only then validated, so an override can repair
//! a value the file gets wrong.

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Command-line replacements for individual configuration keys
///
/// Every `Some` field replaces the matching key of the parsed file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Replaces `scraper.base-url`
    pub base_url: Option<String>,
    /// Replaces `output.export-dir`
    pub export_dir: Option<String>,
    /// Replaces `output.json-filename`
    pub json_filename: Option<String>,
    /// Forces `output.database-enabled = false`
    pub disable_database: bool,
}

impl ConfigOverrides {
    /// True when no key is overridden
    pub fn is_empty(&self) -> bool {
        self.base_url.is_none()
            && self.export_dir.is_none()
            && self.json_filename.is_none()
            && !self.disable_database
    }

    /// Applies the overrides to a parsed configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(base_url) = &self.base_url {
            tracing::debug!("base-url overridden: {}", base_url);
            config.scraper.base_url = base_url.clone();
        }
        if let Some(export_dir) = &self.export_dir {
            tracing::debug!("export-dir overridden: {}", export_dir);
            config.output.export_dir = export_dir.clone();
        }
        if let Some(json_filename) = &self.json_filename {
            tracing::debug!("json-filename overridden: {}", json_filename);
            config.output.json_filename = json_filename.clone();
        }
        if self.disable_database {
            config.output.database_enabled = false;
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use quote_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Initial pages: {}", config.scraper.initial_pages);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, &ConfigOverrides::default())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so runs with different settings can be told apart.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(fingerprint(&content))
}

/// Loads a configuration, applies command-line overrides, then validates it
///
/// The hash covers the file as read; overrides do not change it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
/// * `overrides` - Keys replaced before validation
///
/// # Returns
///
/// * `Ok((Config, String))` - The patched configuration and the file's hash
/// * `Err(ConfigError)` - Failed to read, parse, or validate the result
pub fn load_config_with_overrides(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content, overrides)?;
    Ok((config, fingerprint(&content)))
}

fn parse_config(content: &str, overrides: &ConfigOverrides) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    overrides.apply(&mut config);
    validate(&config)?;
    Ok(config)
}

fn fingerprint(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
