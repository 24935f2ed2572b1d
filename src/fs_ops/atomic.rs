//! Single relocation attempt.
//! - Refuses to replace an existing destination (returns AlreadyExists).
//! - Renames in place when possible; best-effort fsync of the destination directory on Unix.
//! - Cross-filesystem: copies into a hidden temp file next to the destination, renames it
//!   into place, then removes the source. If the source cannot be removed the copy is
//!   deleted again so the file exists in exactly one place.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::platform::{fsync_dir, is_cross_device};

use super::helpers::io_error_with_help_io;

pub fn relocate(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.symlink_metadata().is_ok() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination exists: {}", dst.display()),
        ));
    }

    match fs::rename(src, dst) {
        Ok(()) => {
            if let Some(parent) = dst.parent() {
                let _ = fsync_dir(parent);
            }
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), dst = %dst.display(), "rename crosses filesystems; copying");
            copy_then_remove(src, dst)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot copy directory across filesystems: {}", src.display()),
        ));
    }
    let dir = dst
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    let tmp = temp_sibling(dir);

    if let Err(e) = copy_durable(src, &tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, dst) {
        let _ = fs::remove_file(&tmp);
        return Err(io_error_with_help_io("rename temporary copy", dst)(e));
    }
    let _ = fsync_dir(dir);

    if let Err(e) = fs::remove_file(src) {
        let _ = fs::remove_file(dst);
        return Err(io_error_with_help_io("remove original", src)(e));
    }
    Ok(())
}

fn copy_durable(src: &Path, tmp: &Path) -> io::Result<u64> {
    let mut input = File::open(src).map_err(io_error_with_help_io("open source", src))?;
    let mut output = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp)
        .map_err(io_error_with_help_io("create temporary copy", tmp))?;
    let bytes = io::copy(&mut input, &mut output)?;
    output.sync_all()?;
    Ok(bytes)
}

fn temp_sibling(dir: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    dir.join(format!(".download_organizer.{}.{}.tmp", std::process::id(), nanos))
}
