//! Destination path computation.
//! `<root>[/YYYY-MM-DD][/<category>]/<name>` with duplicate disambiguation.
//! Intermediate folders are created here; `create_dir_all` already treats a folder
//! created concurrently by another worker as success.

use chrono::{Local, NaiveDate};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::classify::classify;
use crate::config::Config;

use super::duplicate::{OnDuplicate, resolve_destination};
use super::helpers::io_error_with_help_io;

/// Folder name for a date, e.g. `2024-03-09`.
pub fn date_folder_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Resolve the destination for `source` using today's local date.
pub fn resolve(source: &Path, root: &Path, config: &Config) -> io::Result<PathBuf> {
    resolve_with(source, root, config, Local::now().date_naive(), &|_| false)
}

/// Resolve with an explicit date and a predicate for names already claimed by
/// other in-flight moves.
pub fn resolve_with(
    source: &Path,
    root: &Path,
    config: &Config,
    date: NaiveDate,
    is_reserved: &dyn Fn(&Path) -> bool,
) -> io::Result<PathBuf> {
    let dir = destination_dir(source, root, config, date)?;
    pick_name(source, &dir, config, is_reserved)
}

/// `<root>[/YYYY-MM-DD][/<category>]` for `source`, created if missing.
pub fn destination_dir(
    source: &Path,
    root: &Path,
    config: &Config,
    date: NaiveDate,
) -> io::Result<PathBuf> {
    let mut dir = root.to_path_buf();
    if config.organize_by_date {
        dir.push(date_folder_name(date));
    }
    if config.organize_by_type {
        dir.push(classify(source, &config.categories));
    }
    fs::create_dir_all(&dir).map_err(io_error_with_help_io("create destination folder", &dir))?;
    Ok(dir)
}

/// Final path for `source` inside an existing `dir`, applying the duplicate policy.
/// No I/O beyond existence checks.
pub fn pick_name(
    source: &Path,
    dir: &Path,
    config: &Config,
    is_reserved: &dyn Fn(&Path) -> bool,
) -> io::Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("source has no file name: {}", source.display()),
        )
    })?;
    let policy = if config.rename_duplicates {
        OnDuplicate::RenameWithSuffix
    } else {
        OnDuplicate::Skip
    };
    let dest = resolve_destination(dir, name, policy, is_reserved);
    trace!(src = %source.display(), dest = %dest.display(), "resolved destination");
    Ok(dest)
}
