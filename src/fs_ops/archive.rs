//! First-run archive pass.
//! Moves everything already in the root into `old_download/` once, then drops the
//! `.organized` marker so later runs skip this step. Individual failures are logged
//! and counted; they never stop the pass.

use anyhow::Result;
use std::fs::{self, File};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{ARCHIVE_DIR_NAME, Config, archive_dir, is_reserved_name, marker_path};
use crate::filter::is_excluded;

use super::atomic::relocate;
use super::duplicate::{OnDuplicate, resolve_destination};
use super::helpers::io_error_with_help;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Marker was present; nothing was touched.
    pub already_done: bool,
    pub moved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Archive pre-existing items unless the marker says it already happened.
pub fn ensure_archived(root: &Path, config: &Config) -> Result<ArchiveReport> {
    let marker = marker_path(root);
    if marker.exists() {
        debug!(marker = %marker.display(), "first-run archive already done");
        return Ok(ArchiveReport {
            already_done: true,
            ..Default::default()
        });
    }

    info!(root = %root.display(), "First run detected; moving existing items to '{ARCHIVE_DIR_NAME}'");
    let archive = archive_dir(root);
    fs::create_dir_all(&archive).map_err(io_error_with_help("create archive folder", &archive))?;

    let mut report = ArchiveReport::default();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Cannot read entry while archiving");
                report.failed += 1;
                continue;
            }
        };
        let path = entry.path();
        let name = entry.file_name();

        if is_reserved_name(name) || is_excluded(path, config) {
            debug!(path = %path.display(), "archive: skipped");
            report.skipped += 1;
            continue;
        }

        let dest = resolve_destination(&archive, name, OnDuplicate::RenameWithSuffix, &|_| false);
        match relocate(path, &dest) {
            Ok(()) => {
                info!(src = %path.display(), dest = %dest.display(), "Archived");
                report.moved += 1;
            }
            Err(e) => {
                warn!(src = %path.display(), error = %e, "Failed to archive item; leaving it in place");
                report.failed += 1;
            }
        }
    }

    File::create(&marker).map_err(io_error_with_help("create marker", &marker))?;
    info!(
        moved = report.moved,
        skipped = report.skipped,
        failed = report.failed,
        "Initial organization complete"
    );
    Ok(report)
}
