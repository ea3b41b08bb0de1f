//! Terminal spinners shown while a remote call is in flight.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Braille dots.
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Spinner drawn on stderr, so piped stdout stays clean.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_chars(TICK_CHARS)
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn finish(pb: &ProgressBar, msg: String) {
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg}") {
        pb.set_style(style);
    }
    pb.finish_with_message(msg);
}

pub fn finish_success(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("{} {}", status_icon(true), msg));
}

pub fn finish_error(pb: &ProgressBar, msg: &str) {
    finish(pb, format!("{} {}", status_icon(false), msg));
}

/// Icon for a finished step.
pub fn status_icon(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}
