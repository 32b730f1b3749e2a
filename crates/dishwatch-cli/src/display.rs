//! Terminal rendering for the ping monitor.
//!
//! ```text
//! ================================================================================
//! STARLINK PING STATISTICS MONITOR
//! ================================================================================
//! Timestamp: 2026-10-15 08:05:09
//! Iteration: 42
//! Press Ctrl+C to stop
//! ================================================================================
//!
//!   ping_drop_rate                  : 0.004
//!   pop_ping_latency_ms             : 27.812
//!   seconds_to_first_non_empty_slot : 0.051
//!
//! ================================================================================
//! ```
//!
//! Screens are built as strings so they can be checked in tests, then printed
//! after clearing the terminal.

use std::fmt::Write as _;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use dishwatch_core::{MetricSnapshot, StatusErrors, format_value};

pub const RULE_WIDTH: usize = 80;
const TITLE: &str = "STARLINK PING STATISTICS MONITOR";

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Clear the screen and move the cursor home.
pub fn clear_terminal() {
    let mut out = io::stdout();
    let _ = execute!(out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0));
    let _ = out.flush();
}

fn title(demo: bool) -> String {
    if demo {
        format!("{TITLE} (DEMO)")
    } else {
        TITLE.to_string()
    }
}

fn header(out: &mut String, demo: bool, timestamp: &str, iteration: u64, show_hint: bool) {
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{}", title(demo));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Timestamp: {timestamp}");
    let _ = writeln!(out, "Iteration: {iteration}");
    if show_hint {
        let _ = writeln!(out, "Press Ctrl+C to stop");
    }
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out);
}

/// Sorted `name : value` rows, names padded to the longest name.
pub fn stats_table(stats: &MetricSnapshot) -> String {
    let width = stats.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    // BTreeMap iteration is already lexicographic.
    for (name, value) in stats {
        let _ = writeln!(out, "  {name:<width$} : {}", format_value(value));
    }
    out
}

/// Full monitor screen for one successful cycle.
pub fn ping_screen(
    stats: &MetricSnapshot,
    status_errors: &StatusErrors,
    timestamp: &str,
    iteration: u64,
    demo: bool,
) -> String {
    let mut out = String::new();
    header(&mut out, demo, timestamp, iteration, true);

    if stats.is_empty() {
        let _ = writeln!(out, "No ping statistics available");
    } else {
        out.push_str(&stats_table(stats));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule());

    if !status_errors.is_empty() {
        let _ = writeln!(out, "Errors: {}", status_errors.join("; "));
    }
    if demo {
        let _ = writeln!(out);
        let _ = writeln!(out, "NOTE: This is a DEMO with simulated data.");
        let _ = writeln!(out, "Run `dishwatch ping` to poll a real Starlink dish.");
    }
    out
}

/// Screen shown when a cycle failed to collect data.
pub fn error_screen(error: &str, timestamp: &str, iteration: u64, demo: bool) -> String {
    let mut out = String::new();
    header(&mut out, demo, timestamp, iteration, false);
    let _ = writeln!(out, "Error collecting data: {error}");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule());
    out
}

/// Screen shown after the user stops the monitor.
pub fn stopped_screen(iterations: u64, demo: bool) -> String {
    let mut out = String::new();
    let (label, who) = if demo {
        ("DEMO STOPPED", "Demo")
    } else {
        ("STOPPED", "Monitor")
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "{TITLE} - {label}");
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "Total iterations: {iterations}");
    let _ = writeln!(out, "{who} stopped by user");
    let _ = writeln!(out, "{}", rule());
    out
}

/// Print a screen on a cleared terminal.
pub fn show(screen: &str) {
    clear_terminal();
    print!("{screen}");
    let _ = io::stdout().flush();
}
