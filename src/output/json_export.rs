//! Combined JSON export

use crate::output::ExportSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes every entity set into one JSON document
///
/// The document is an object keyed by entity-set name: `quotes`, `authors`,
/// `tags` and `quotes_tags_link`. The parent directory is created if needed.
pub fn export_json(path: &Path, set: &ExportSet) -> crate::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, set)?;
    writer.flush()?;

    tracing::info!("Wrote {}", path.display());
    Ok(())
}
