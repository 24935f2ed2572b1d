//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Browsers and scanners routinely hold downloads open without sharing; those
//!   surface as sharing/lock violations rather than permission errors.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use windows_sys::Win32::Foundation::{
    ERROR_LOCK_VIOLATION, ERROR_NOT_SAME_DEVICE, ERROR_SHARING_VIOLATION,
};

/// Open log file for appending (no ACL changes).
pub fn open_log_file_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn is_lock_error(e: &io::Error) -> bool {
    match e.raw_os_error() {
        Some(code) => {
            let code = code as u32;
            code == ERROR_SHARING_VIOLATION || code == ERROR_LOCK_VIOLATION
        }
        None => false,
    }
}

pub fn is_cross_device(e: &io::Error) -> bool {
    matches!(e.raw_os_error(), Some(code) if code as u32 == ERROR_NOT_SAME_DEVICE)
}

/// Directory fsync is not available through std on Windows.
pub fn fsync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
