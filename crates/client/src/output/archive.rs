//! Archive files: pretty blocks written to `<table>-<yyyy-mm-dd>.txt`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tablekit_core::model::Item;

use super::pretty::format_items;

pub fn archive_path(dir: &Path, table: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}-{}.txt", table, date.format("%Y-%m-%d")))
}

/// Writes `items` to the archive file for `date`, replacing an existing
/// archive of the same day. Creates `dir` when missing.
pub fn write_archive(
    dir: &Path,
    table: &str,
    date: NaiveDate,
    items: &[Item],
) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = archive_path(dir, table, date);
    std::fs::write(&path, format_items(items))?;
    Ok(path)
}
