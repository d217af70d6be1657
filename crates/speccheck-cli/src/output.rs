// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Terminal styling.
//!
//! Respects NO_COLOR and FORCE_COLOR environment variables.

use colored::{ColoredString, Colorize};

/// Call once at startup.
pub fn init() {
    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    } else if std::env::var("FORCE_COLOR").is_ok() {
        colored::control::set_override(true);
    }
}

pub fn error_label() -> ColoredString {
    "error".red().bold()
}

pub fn status_pass() -> ColoredString {
    "✓".green()
}

pub fn status_fail() -> ColoredString {
    "✗".red()
}

pub fn line_label(n: usize) -> ColoredString {
    format!("Line {}", n).bold()
}

pub fn file_path(path: &str) -> ColoredString {
    path.underline()
}

pub fn passed_count(n: usize) -> ColoredString {
    format!("{} passed", n).green()
}

pub fn failed_count(n: usize) -> ColoredString {
    if n > 0 {
        format!("{} failed", n).red()
    } else {
        format!("{} failed", n).normal()
    }
}
