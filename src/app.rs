//! Application orchestrator.
//! Validates the root, loads config, initializes logging, installs the signal handler,
//! runs the first-run archive pass, then feeds watch events to the organizer until
//! interrupted.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use download_organizer::cli::Args;
use download_organizer::config::{LoadReport, LoadStatus, log_path};
use download_organizer::output as out;
use download_organizer::{
    DirWatcher, Organizer, OrganizerError, Shutdown, Stats, ensure_archived, load_or_init,
};

use crate::logging::init_tracing;

/// How often the main loop wakes up to check for shutdown.
const RECV_TICK: Duration = Duration::from_millis(500);
/// How often running totals are logged (only when they changed).
const STATS_REPORT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let Some(root) = args.resolved_root() else {
        out::print_error("Could not determine a Downloads folder; pass one with --downloads");
        anyhow::bail!("no watch root");
    };
    if !root.is_dir() {
        out::print_error(&format!("{} is not a directory.", root.display()));
        return Err(OrganizerError::RootNotDirectory(root).into());
    }
    let root = dunce::canonicalize(&root)
        .with_context(|| format!("resolve watch root '{}'", root.display()))?;

    // Config comes first: it decides the log level.
    let report = load_or_init(&root, args.reset_config);
    let mut cfg = report.config.clone();
    args.apply_overrides(&mut cfg);

    let log_file = (!args.no_log_file).then(|| log_path(&root));
    let guard = init_tracing(cfg.log_level, log_file.as_deref(), args.json).inspect_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
    })?;

    log_load_report(&report);
    debug!(?args, "Starting download_organizer");

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.request();
            out::print_warn("Received interrupt; finishing in-flight files...");
        })
        .context("install signal handler")?;
    }

    match ensure_archived(&root, &cfg) {
        Ok(r) if !r.already_done => out::print_info(&format!(
            "First run: archived {} item(s) ({} skipped, {} failed)",
            r.moved, r.skipped, r.failed
        )),
        Ok(_) => {}
        Err(e) => warn!(error = %format!("{e:#}"), "First-run archive did not complete"),
    }

    let organizer = Arc::new(Organizer::new(&root, cfg, shutdown.clone()));
    let (watcher, events) =
        DirWatcher::start(&root).with_context(|| format!("watch '{}'", root.display()))?;

    info!(
        root = %watcher.root().display(),
        by_date = organizer.config().organize_by_date,
        by_type = organizer.config().organize_by_type,
        delay = ?organizer.config().delay,
        categories = organizer.config().categories.len(),
        "Watching folder"
    );
    debug!(
        labels = ?organizer.config().categories.labels().collect::<Vec<_>>(),
        "Category folders"
    );
    out::print_info(&format!("Watching {} (Ctrl-C to stop)", root.display()));

    let stats = organizer.stats();
    let mut last_report = Instant::now();
    let mut last_total = 0;

    while !shutdown.is_requested() {
        match events.recv_timeout(RECV_TICK) {
            Ok(event) => organizer.dispatch(event),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                error!("Watcher stopped unexpectedly");
                break;
            }
        }
        if last_report.elapsed() >= STATS_REPORT_INTERVAL {
            last_total = report_stats(&stats, last_total);
            last_report = Instant::now();
        }
    }

    // Stop the OS watch before draining workers.
    drop(watcher);
    drop(events);
    info!(active = organizer.active_workers(), "Stopping; waiting for in-flight files");
    organizer.wait_idle();

    let snap = stats.snapshot();
    info!(total = snap.total, per_category = ?snap.per_category, "Session summary");
    out::print_summary(&snap);

    // Flush the file writer before exit.
    drop(guard);
    Ok(())
}

fn log_load_report(report: &LoadReport) {
    let path = report.path.as_path();
    match &report.status {
        LoadStatus::Loaded => info!(path = %path.display(), "Loaded config"),
        LoadStatus::CreatedDefault => info!(path = %path.display(), "Wrote default config"),
        LoadStatus::Fallback(reason) => {
            warn!(path = %path.display(), %reason, "Config unreadable; using defaults for this run")
        }
    }
    if let Some(e) = &report.write_error {
        warn!(path = %path.display(), error = %e, "Could not write config file");
    }
    for note in &report.notes {
        warn!(path = %path.display(), "{note}");
    }
}

fn report_stats(stats: &Stats, last_total: u64) -> u64 {
    let snap = stats.snapshot();
    if snap.total != last_total {
        info!(total = snap.total, per_category = ?snap.per_category, "Running totals");
    }
    snap.total
}
