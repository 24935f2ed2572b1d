//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{fsync_dir, is_cross_device, is_lock_error, open_log_file_append};

#[cfg(not(unix))]
pub use windows::{fsync_dir, is_cross_device, is_lock_error, open_log_file_append};

use std::io;

/// Errors worth waiting out: another process holds the file, or access is
/// temporarily refused.
pub fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::TimedOut
    ) || is_lock_error(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_transient() {
        let e = io::Error::from(io::ErrorKind::PermissionDenied);
        assert!(is_transient(&e));
    }

    #[test]
    fn not_found_is_not_transient() {
        let e = io::Error::from(io::ErrorKind::NotFound);
        assert!(!is_transient(&e));
        assert!(!is_cross_device(&e));
    }

    #[cfg(unix)]
    #[test]
    fn busy_and_exdev_classified() {
        assert!(is_lock_error(&io::Error::from_raw_os_error(libc::EBUSY)));
        assert!(is_cross_device(&io::Error::from_raw_os_error(libc::EXDEV)));
        assert!(!is_lock_error(&io::Error::from_raw_os_error(libc::ENOSPC)));
    }
}
