//! Console rendering for log entries.

use colored::Colorize;
use tasker_core::{Log, LogEntry};

/// Renders events to stdout and errors to stderr, with child entries
/// indented under their parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLog;

impl Log for ConsoleLog {
    fn event(&self, entry: LogEntry) {
        print_event(&entry, 0);
    }

    fn error(&self, entry: LogEntry) {
        print_error(&entry, 0);
    }
}

fn print_event(entry: &LogEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{}: {}", entry.category.green().bold(), entry.detail);
    for child in &entry.children {
        print_event(child, depth + 1);
    }
}

pub(crate) fn print_error(entry: &LogEntry, depth: usize) {
    let indent = "  ".repeat(depth);
    eprintln!("{indent}{}: {}", entry.category.red().bold(), entry.detail);
    for child in &entry.children {
        print_error(child, depth + 1);
    }
}
