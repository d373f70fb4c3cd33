//! Structured event reporting for commands and tasks.
//!
//! Commands and tasks report user-visible output as [`LogEntry`] values
//! through a [`Log`]: a short category string, a human-readable detail
//! string, and optional nested child entries. Aggregated failures compose
//! their sub-diagnostics as children under one summary entry.
//!
//! Ambient diagnostics (cache hits, scheduling decisions) go through
//! `tracing` instead; the `Log` stream is reserved for output the user
//! asked for.

use std::cell::RefCell;

/// One structured diagnostic or status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Short classification, e.g. `status` or `unknown command`.
    pub category: String,
    /// Human-readable message.
    pub detail: String,
    /// Sub-entries, used by aggregated diagnostics.
    pub children: Vec<LogEntry>,
}

impl LogEntry {
    /// Create an entry with no children.
    pub fn new(category: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            detail: detail.into(),
            children: Vec::new(),
        }
    }

    /// Create an entry carrying sub-entries.
    pub fn with_children(
        category: impl Into<String>,
        detail: impl Into<String>,
        children: Vec<LogEntry>,
    ) -> Self {
        Self {
            category: category.into(),
            detail: detail.into(),
            children,
        }
    }
}

/// Sink for user-visible events and errors.
pub trait Log {
    /// Report a routine event.
    fn event(&self, entry: LogEntry);

    /// Report an error.
    fn error(&self, entry: LogEntry);
}

/// A log that records entries in memory, for inspection in tests and
/// for buffering output that is rendered later.
#[derive(Debug, Default)]
pub struct MemoryLog {
    events: RefCell<Vec<LogEntry>>,
    errors: RefCell<Vec<LogEntry>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events reported so far, in order.
    pub fn events(&self) -> Vec<LogEntry> {
        self.events.borrow().clone()
    }

    /// All errors reported so far, in order.
    pub fn errors(&self) -> Vec<LogEntry> {
        self.errors.borrow().clone()
    }
}

impl Log for MemoryLog {
    fn event(&self, entry: LogEntry) {
        self.events.borrow_mut().push(entry);
    }

    fn error(&self, entry: LogEntry) {
        self.errors.borrow_mut().push(entry);
    }
}
