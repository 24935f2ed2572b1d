//! Duplicate-name resolution.
//!
//! Policy:
//! - Skip: return the intended path; the mover refuses to replace it and the file stays put.
//! - RenameWithSuffix: generate a free name by inserting " (n)" before the extension.
//!
//! A name counts as taken if it exists on disk or the caller's `is_reserved`
//! predicate claims it (a destination another worker is about to fill).

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDuplicate {
    /// Use the requested name even if taken.
    Skip,
    /// Pick a free name: "name (1).ext", "name (2).ext", ...
    RenameWithSuffix,
}

const MAX_TRIES: u64 = 100_000;

#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

/// Compute the destination for `name` inside `dst_dir` according to `policy`.
///
/// Examples with RenameWithSuffix:
/// - "movie.mkv" -> "movie (1).mkv", "movie (2).mkv", ...
/// - ".env" -> ".env (1)"
/// - "archive.tar.gz" -> "archive.tar (1).gz"
pub fn resolve_destination(
    dst_dir: &Path,
    name: &OsStr,
    policy: OnDuplicate,
    is_reserved: &dyn Fn(&Path) -> bool,
) -> PathBuf {
    let candidate = dst_dir.join(name);
    let taken = |p: &Path| p.symlink_metadata().is_ok() || is_reserved(p);

    if policy == OnDuplicate::Skip || !taken(&candidate) {
        return candidate;
    }

    let base = Path::new(name);
    let stem: OsString = base
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| name.to_os_string());
    let ext: Option<OsString> = base.extension().map(|e| e.to_os_string());

    for n in 1..=MAX_TRIES {
        let next = dst_dir.join(name_with_counter(&stem, ext.as_deref(), n));
        if !taken(&next) {
            return next;
        }
        if n == 3 {
            trace!(name = ?name, dir = %dst_dir.display(), "duplicate: several collisions, still searching");
        }
    }
    dst_dir.join(name_with_suffix(&stem, ext.as_deref(), " (final)"))
}

fn name_with_counter(stem: &OsStr, ext: Option<&OsStr>, n: u64) -> OsString {
    name_with_suffix(stem, ext, &format!(" ({n})"))
}

#[cfg(unix)]
fn name_len(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// `stem + suffix + [".ext"]`, shortening the stem so the result fits the file-name limit.
fn name_with_suffix(stem: &OsStr, ext: Option<&OsStr>, suffix: &str) -> OsString {
    let mut tail = OsString::from(suffix);
    if let Some(e) = ext {
        tail.push(".");
        tail.push(e);
    }

    let budget = MAX_FILENAME_LEN.saturating_sub(name_len(&tail));
    let stem = if name_len(stem) <= budget {
        stem.to_os_string()
    } else {
        truncate_stem(stem, budget)
    };

    let mut out = stem;
    out.push(&tail);
    out
}

fn truncate_stem(stem: &OsStr, budget: usize) -> OsString {
    let lossy = stem.to_string_lossy();
    let mut acc = String::new();
    for ch in lossy.chars() {
        if acc.len() + ch.len_utf8() > budget {
            break;
        }
        acc.push(ch);
    }
    if acc.is_empty() {
        acc.push('f');
    }
    OsString::from(acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_stem_is_truncated_to_fit() {
        let stem = "a".repeat(300);
        let out = name_with_counter(OsStr::new(&stem), Some(OsStr::new("txt")), 12);
        let s = out.to_string_lossy();
        assert!(s.len() <= MAX_FILENAME_LEN);
        assert!(s.ends_with(" (12).txt"));
    }

    #[test]
    fn reserved_names_are_skipped() {
        let dir = Path::new("/nonexistent-organizer-test");
        let reserved = |p: &Path| p == dir.join("a.txt") || p == dir.join("a (1).txt");
        let out = resolve_destination(dir, OsStr::new("a.txt"), OnDuplicate::RenameWithSuffix, &reserved);
        assert_eq!(out, dir.join("a (2).txt"));
    }
}
