//! Tracing initialization.
//! Builds a subscriber with EnvFilter, supports compact or JSON formats, and mirrors
//! everything into the log file inside the watched folder.
//!
//! Behavior:
//! - Log level is driven by LogLevel; RUST_LOG is not consulted.
//! - The file layer never uses ANSI colors.
//! - File logging uses tracing_appender::non_blocking; the returned guard must be held
//!   until exit so buffered lines are flushed.

use anyhow::Result;
use chrono::Local;
use download_organizer::LogLevel;
use download_organizer::output as out;
use download_organizer::platform::open_log_file_append;
use std::fmt as stdfmt;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt as tsfmt;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;
use tracing_subscriber::util::SubscriberInitExt;

/// Local timestamp (YYYY-MM-DD HH:MM:SS).
struct LocalTime;
impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut tsfmt::format::Writer<'_>) -> stdfmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S"))
    }
}

#[inline]
fn to_level_filter(lvl: LogLevel) -> LevelFilter {
    match lvl {
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

fn open_non_blocking_writer(path: &Path) -> Option<(NonBlocking, WorkerGuard)> {
    match open_log_file_append(path) {
        Ok(file) => Some(tracing_appender::non_blocking(file)),
        Err(e) => {
            out::print_warn(&format!(
                "Could not open log file {}: {}. Logs will continue to the console only.",
                path.display(),
                e
            ));
            None
        }
    }
}

/// Initialize tracing. Returns the file writer guard when a log file is active.
pub fn init_tracing(
    lvl: LogLevel,
    log_file: Option<&Path>,
    json: bool,
) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::default().add_directive(to_level_filter(lvl).into());
    let file = log_file.and_then(open_non_blocking_writer);

    match (file, json) {
        (Some((writer, guard)), true) => {
            let stdout_layer = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalTime)
                .with_target(false);
            let file_layer = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalTime)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        (Some((writer, guard)), false) => {
            let stdout_layer = tsfmt::layer()
                .with_timer(LocalTime)
                .with_target(false)
                .compact();
            let file_layer = tsfmt::layer()
                .with_timer(LocalTime)
                .with_target(false)
                .with_ansi(false)
                .compact()
                .with_writer(writer);
            registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .try_init()?;
            Ok(Some(guard))
        }
        (None, true) => {
            let stdout_layer = tsfmt::layer()
                .event_format(tsfmt::format().json())
                .with_timer(LocalTime)
                .with_target(false);
            registry().with(env_filter).with(stdout_layer).try_init()?;
            Ok(None)
        }
        (None, false) => {
            let stdout_layer = tsfmt::layer()
                .with_timer(LocalTime)
                .with_target(false)
                .compact();
            registry().with(env_filter).with(stdout_layer).try_init()?;
            Ok(None)
        }
    }
}
