//! User-facing console messages for startup and shutdown.
//! Colors are enabled only when stdout is a TTY; everything else goes through tracing.

use owo_colors::OwoColorize;

use crate::stats::StatsSnapshot;

fn is_tty() -> bool {
    atty::is(atty::Stream::Stdout)
}

pub fn print_info(msg: &str) {
    if is_tty() {
        println!("{} {}", "info:".cyan().bold(), msg);
    } else {
        println!("info: {}", msg);
    }
}

pub fn print_warn(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "warn:".yellow().bold(), msg);
    } else {
        eprintln!("warn: {}", msg);
    }
}

pub fn print_error(msg: &str) {
    if is_tty() {
        eprintln!("{} {}", "error:".red().bold(), msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

/// One-line summary, e.g. `Organized 5 file(s): documents=2, images=3`.
pub fn summary_line(snap: &StatsSnapshot) -> String {
    if snap.total == 0 {
        return "Organized 0 files".to_string();
    }
    let parts: Vec<String> = snap
        .per_category
        .iter()
        .map(|(cat, n)| format!("{cat}={n}"))
        .collect();
    format!("Organized {} file(s): {}", snap.total, parts.join(", "))
}

pub fn print_summary(snap: &StatsSnapshot) {
    let line = summary_line(snap);
    if is_tty() {
        println!("{} {}", "done:".green().bold(), line);
    } else {
        println!("done: {}", line);
    }
}
