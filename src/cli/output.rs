//! Terminal rendering of the run summary.
//!
//! Colors respect the NO_COLOR environment variable (handled by
//! `colored`).

use std::fmt::Display;

use colored::{ColoredString, Colorize};

/// Styles for summary fields
pub mod style {
    use super::*;

    pub fn path(path: impl Display) -> ColoredString {
        path.to_string().blue()
    }

    pub fn count(value: impl Display) -> ColoredString {
        value.to_string().yellow()
    }

    pub fn done(label: &str) -> ColoredString {
        label.green().bold()
    }
}

const BYTE_UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

/// Byte count with a binary unit, e.g. `4.0 MiB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < BYTE_UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", BYTE_UNITS[unit])
}

/// Wall-clock time of a run: milliseconds below a second, then seconds,
/// then minutes.
pub fn format_elapsed(ms: u64) -> String {
    match ms {
        0..=999 => format!("{ms}ms"),
        1_000..=59_999 => format!("{:.2}s", ms as f64 / 1000.0),
        _ => format!("{}m {:.1}s", ms / 60_000, (ms % 60_000) as f64 / 1000.0),
    }
}

/// Read throughput; `None` when the run was too short to measure.
pub fn format_throughput(bytes: u64, ms: u64) -> Option<String> {
    if ms == 0 {
        return None;
    }
    let per_sec = (bytes as f64 * 1000.0 / ms as f64) as u64;
    Some(format!("{}/s", format_bytes(per_sec)))
}

pub fn print_warning(message: &str) {
    eprintln!("{}: {}", "Warning".yellow(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{}: {}", "Error".red().bold(), message);
}
