//! CSV export, one file per entity set

use crate::output::ExportSet;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const QUOTES_CSV: &str = "quotes.csv";
pub const AUTHORS_CSV: &str = "authors.csv";
pub const TAGS_CSV: &str = "tags.csv";
pub const QUOTE_TAGS_CSV: &str = "quotes_tags_link.csv";

#[derive(Serialize)]
struct TagRow<'a> {
    tag: &'a str,
}

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> crate::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the entity sets as CSV files into `dir`
///
/// The directory is created if needed. Existing files are overwritten.
///
/// # Arguments
///
/// * `dir` - Target directory
/// * `set` - The entity sets to write
///
/// # Returns
///
/// * `Ok(Vec<PathBuf>)` - Paths of the written files
/// * `Err(HarvestError)` - A file could not be written
pub fn export_csv(dir: &Path, set: &ExportSet) -> crate::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let quotes = dir.join(QUOTES_CSV);
    write_rows(&quotes, &set.quotes)?;

    let authors = dir.join(AUTHORS_CSV);
    write_rows(&authors, &set.authors)?;

    let tags = dir.join(TAGS_CSV);
    write_rows(&tags, set.tags.iter().map(|tag| TagRow { tag }))?;

    let links = dir.join(QUOTE_TAGS_CSV);
    write_rows(&links, &set.quote_tags)?;

    let written = vec![quotes, authors, tags, links];
    for path in &written {
        tracing::info!("Wrote {}", path.display());
    }
    Ok(written)
}
