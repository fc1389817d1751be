//! Persisted page count
//!
//! The last known number of listing pages lives in a small JSON document so
//! that pagination discovery can start from it on the next run. Other keys in
//! the document are preserved on write.

use crate::ConfigError;
use serde_json::{Map, Value};
use std::path::Path;

/// Key holding the page count inside the state document
pub const PAGE_COUNT_KEY: &str = "pagesnum";

/// Reads the persisted page count
///
/// Returns `default` when the document does not exist yet or has no
/// page count entry.
pub fn load_page_count(path: &Path, default: u32) -> Result<u32, ConfigError> {
    if !path.exists() {
        tracing::debug!(
            "No page-count state at {}, using {}",
            path.display(),
            default
        );
        return Ok(default);
    }

    let document = read_document(path)?;
    match document.get(PAGE_COUNT_KEY) {
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ConfigError::Validation(format!(
                    "'{}' in {} must be a positive integer, got {}",
                    PAGE_COUNT_KEY,
                    path.display(),
                    value
                ))
            }),
        None => Ok(default),
    }
}

/// Writes the page count back, keeping every other key of the document
pub fn persist_page_count(path: &Path, count: u32) -> Result<(), ConfigError> {
    let mut document = if path.exists() {
        read_document(path)?
    } else {
        Map::new()
    };

    document.insert(PAGE_COUNT_KEY.to_string(), Value::from(count));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&Value::Object(document))?;
    std::fs::write(path, content)?;

    tracing::info!("Persisted page count {} to {}", count, path.display());
    Ok(())
}

fn read_document(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::Validation(format!(
            "{} must contain a JSON object, got {}",
            path.display(),
            other
        ))),
    }
}
