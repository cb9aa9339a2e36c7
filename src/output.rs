//! CSV output
//!
//! One table per resource type under `<base>/<account>/<YYYYmmdd_HHMMSS>/`.

use crate::resource::FlatRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Directory for one run.
pub fn run_dir<Tz>(base: &Path, account: &str, started: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    base.join(account)
        .join(started.format("%Y%m%d_%H%M%S").to_string())
}

/// Create the run directory, including parents.
pub fn create_run_dir<Tz>(base: &Path, account: &str, started: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let dir = run_dir(base, account, started);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    Ok(dir)
}

/// Write `records` to `<dir>/<name>.csv`.
///
/// The header is the first record's columns. Nothing is written for an empty
/// slice and `None` is returned.
pub fn write_table(dir: &Path, name: &str, records: &[FlatRecord]) -> Result<Option<PathBuf>> {
    let Some(first) = records.first() else {
        return Ok(None);
    };

    let path = dir.join(format!("{}.csv", name));
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let header: Vec<&str> = first.columns().collect();
    writer.write_record(&header)?;

    for record in records {
        let row: Vec<String> = header
            .iter()
            .map(|column| record.get(column).map(|v| v.to_cell()).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path))
}
