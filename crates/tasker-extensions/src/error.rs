//! Error types for tasker-extensions.
//!
//! Like the core errors, every variant is cloneable so extension-resolution
//! outcomes can live in the manager's permanent cache.

use tasker_core::LogEntry;

/// Result type for tasker-extensions operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving extensions and managing the
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No provider produced the extension. Carries every consulted
    /// provider's rejection message.
    #[error("cannot find an extension named '{identifier}'")]
    UnknownExtension {
        identifier: String,
        attempts: Vec<String>,
    },

    /// The registry has no entry point for the identifier.
    #[error("no registered module provides extension '{identifier}'")]
    NotRegistered { identifier: String },

    /// The manifest file could not be read.
    #[error("extension manifest at '{path}' cannot be read: {reason}")]
    ManifestRead { path: String, reason: String },

    /// The manifest file could not be written.
    #[error("extension manifest at '{path}' cannot be written: {reason}")]
    ManifestWrite { path: String, reason: String },

    /// The manifest document does not deserialize.
    #[error("extension manifest is malformed: {reason}")]
    ManifestParse { reason: String },

    /// The manifest could not be rendered as a document.
    #[error("extension manifest cannot be serialized: {reason}")]
    ManifestSerialize { reason: String },
}

impl Error {
    /// The short category string used in diagnostics.
    pub fn category(&self) -> &str {
        match self {
            Error::UnknownExtension { .. } | Error::NotRegistered { .. } => "unknown extension",
            Error::ManifestRead { .. }
            | Error::ManifestWrite { .. }
            | Error::ManifestParse { .. }
            | Error::ManifestSerialize { .. } => "extension manifest",
        }
    }

    /// Rejection messages gathered from every provider consulted before
    /// this error was produced.
    pub fn attempts(&self) -> &[String] {
        match self {
            Error::UnknownExtension { attempts, .. } => attempts,
            _ => &[],
        }
    }

    /// Render this error as a log entry, with aggregated rejection
    /// messages as child entries.
    pub fn to_entry(&self) -> LogEntry {
        LogEntry::with_children(
            self.category(),
            self.to_string(),
            self.attempts()
                .iter()
                .map(|attempt| LogEntry::new("note", attempt.clone()))
                .collect(),
        )
    }
}
