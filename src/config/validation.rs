use crate::config::types::{Config, OutputConfig, ScraperConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;

    if config.initial_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "initial_pages must be >= 1, got {}",
            config.initial_pages
        )));
    }

    if !(1..=10_000).contains(&config.max_new_pages) {
        return Err(ConfigError::Validation(format!(
            "max_new_pages must be between 1 and 10000, got {}",
            config.max_new_pages
        )));
    }

    if let Some(workers) = config.workers {
        if !(1..=64).contains(&workers) {
            return Err(ConfigError::Validation(format!(
                "workers must be between 1 and 64, got {}",
                workers
            )));
        }
    }

    if !(1..=300).contains(&config.request_timeout_secs) {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Page and author URLs are joined onto the base, so it must be an
/// absolute http(s) URL whose path ends with a slash
fn validate_base_url(base_url: &str) -> Result<(), ConfigError> {
    let url = Url::parse(base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            base_url
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must end with '/'",
            base_url
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_enabled && config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.export_dir.is_empty() {
        return Err(ConfigError::Validation(
            "export_dir cannot be empty".to_string(),
        ));
    }

    if config.state_path.is_empty() {
        return Err(ConfigError::Validation(
            "state_path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.logs_dir, Some(dir) if dir.is_empty()) {
        return Err(ConfigError::Validation(
            "logs_dir cannot be empty when set".to_string(),
        ));
    }

    if config.json_filename.is_empty() || config.json_filename.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "json_filename must be a bare file stem, got '{}'",
            config.json_filename
        )));
    }

    Ok(())
}
