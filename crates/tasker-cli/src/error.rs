//! Error types for the tasker CLI.

use tasker_core::LogEntry;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the driver.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine error.
    #[error(transparent)]
    Core(#[from] tasker_core::Error),

    /// Extension-system error.
    #[error(transparent)]
    Extensions(#[from] tasker_extensions::Error),

    /// The command line itself could not be interpreted.
    #[error("{message}")]
    InvalidCommandSpec { message: String },
}

impl Error {
    /// Render this error as a log entry for console output.
    pub fn to_entry(&self) -> LogEntry {
        match self {
            Error::Core(e) => e.to_entry(),
            Error::Extensions(e) => e.to_entry(),
            Error::InvalidCommandSpec { message } => {
                LogEntry::new("invalid command specification", message.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_their_categories() {
        let core: Error = tasker_core::Error::CyclicDependency.into();
        assert_eq!(core.to_entry().category, "cyclic dependency");

        let spec = Error::InvalidCommandSpec {
            message: "a pseudo-filename of '--' must be followed by a command name".into(),
        };
        assert_eq!(spec.to_entry().category, "invalid command specification");
    }
}
