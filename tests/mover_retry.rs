use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::tempdir;

use download_organizer::fs_ops::relocate;
use download_organizer::{Mover, OrganizerError, Shutdown, Stats};

fn mover(attempts: u32) -> Mover {
    Mover::new(attempts, Duration::from_millis(10), Shutdown::new())
}

#[test]
fn succeeds_after_transient_failures() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.pdf");
    let dest = td.path().join("documents").join("a.pdf");
    fs::create_dir_all(dest.parent().unwrap()).unwrap();
    fs::write(&src, b"payload").unwrap();

    let stats = Stats::new();
    let mut calls = 0;
    let moved = mover(3)
        .move_with_retry_using(&src, &dest, "documents", &stats, |s: &Path, d: &Path| {
            calls += 1;
            if calls < 3 {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            } else {
                relocate(s, d)
            }
        })
        .expect("third attempt should succeed");

    assert_eq!(moved, dest);
    assert_eq!(calls, 3);
    assert!(!src.exists());
    assert_eq!(fs::read(&dest).unwrap(), b"payload");
    let snap = stats.snapshot();
    assert_eq!(snap.total, 1);
    assert_eq!(snap.per_category.get("documents"), Some(&1));
}

#[test]
fn gives_up_after_max_attempts_and_keeps_source() {
    let td = tempdir().unwrap();
    let src = td.path().join("locked.zip");
    let dest = td.path().join("locked (moved).zip");
    fs::write(&src, b"zip").unwrap();

    let stats = Stats::new();
    let mut calls = 0;
    let err = mover(3)
        .move_with_retry_using(&src, &dest, "archives", &stats, |_: &Path, _: &Path| {
            calls += 1;
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();

    match err {
        OrganizerError::MoveFailed { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(calls, 3);
    assert!(src.exists(), "source must be left in place");
    assert!(!dest.exists());
    assert_eq!(stats.total(), 0);
}

#[test]
fn non_transient_error_fails_immediately() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.txt");
    fs::write(&src, b"x").unwrap();
    let stats = Stats::new();
    let mut calls = 0;
    let err = mover(5)
        .move_with_retry_using(&src, &td.path().join("b.txt"), "documents", &stats, |_: &Path, _: &Path| {
            calls += 1;
            Err(io::Error::other("disk on fire"))
        })
        .unwrap_err();
    assert!(matches!(err, OrganizerError::MoveFailed { attempts: 1, .. }));
    assert_eq!(err.code(), 22);
    assert_eq!(calls, 1);
}

#[test]
fn existing_destination_is_never_replaced() {
    let td = tempdir().unwrap();
    let src = td.path().join("new.png");
    let dest = td.path().join("old.png");
    fs::write(&src, b"new").unwrap();
    fs::write(&dest, b"old").unwrap();

    let stats = Stats::new();
    let err = mover(3).move_with_retry(&src, &dest, "images", &stats).unwrap_err();
    assert!(matches!(err, OrganizerError::DestinationExists(ref p) if p == &dest));
    assert_eq!(fs::read(&dest).unwrap(), b"old");
    assert_eq!(fs::read(&src).unwrap(), b"new");
    assert_eq!(stats.total(), 0);
}

#[test]
fn vanished_source_is_reported() {
    let td = tempdir().unwrap();
    let src = td.path().join("ghost.mp3");
    let stats = Stats::new();
    let err = mover(3)
        .move_with_retry(&src, &td.path().join("ghost2.mp3"), "audio", &stats)
        .unwrap_err();
    assert!(matches!(err, OrganizerError::SourceVanished(_)));
    assert_eq!(stats.total(), 0);
}

#[test]
fn real_move_records_category() {
    let td = tempdir().unwrap();
    let src = td.path().join("clip.mp4");
    let dest = td.path().join("clip-moved.mp4");
    fs::write(&src, vec![7u8; 4096]).unwrap();
    let stats = Stats::new();
    mover(1).move_with_retry(&src, &dest, "videos", &stats).unwrap();
    assert_eq!(fs::metadata(&dest).unwrap().len(), 4096);
    assert_eq!(stats.snapshot().per_category.get("videos"), Some(&1));
}

#[test]
fn zero_attempts_is_clamped_to_one() {
    assert_eq!(mover(0).max_attempts(), 1);
}

#[test]
fn shutdown_cuts_retry_wait_short() {
    let td = tempdir().unwrap();
    let src = td.path().join("slow.iso");
    fs::write(&src, b"iso").unwrap();

    let shutdown = Shutdown::new();
    let m = Mover::new(10, Duration::from_secs(30), shutdown.clone());
    let s2 = shutdown.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        s2.request();
    });

    let stats = Stats::new();
    let start = Instant::now();
    let err = m
        .move_with_retry_using(&src, &td.path().join("x.iso"), "disk_images", &stats, |_: &Path, _: &Path| {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        })
        .unwrap_err();
    assert!(matches!(err, OrganizerError::Interrupted));
    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(src.exists());
}

#[test]
fn destination_taken_mid_retry_is_not_retried() {
    let td = tempdir().unwrap();
    let src = td.path().join("a.pdf");
    let dest = td.path().join("b.pdf");
    fs::write(&src, b"a").unwrap();

    let stats = Stats::new();
    let mut calls = 0;
    let err = mover(5)
        .move_with_retry_using(&src, &dest, "documents", &stats, |s: &Path, d: &Path| {
            calls += 1;
            if calls == 1 {
                // Someone else fills the destination while we back off.
                fs::write(d, b"theirs").unwrap();
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            relocate(s, d)
        })
        .unwrap_err();
    assert!(matches!(err, OrganizerError::DestinationExists(_)));
    assert_eq!(err.code(), 21);
    assert_eq!(calls, 2);
    assert_eq!(fs::read(&dest).unwrap(), b"theirs");
    assert!(src.exists());
}
