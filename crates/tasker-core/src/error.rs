//! Error types for tasker-core.
//!
//! Every variant carries owned, cloneable data so that outcomes can live in
//! the permanent project and extension caches and be replayed verbatim on
//! later lookups. Underlying I/O and serde errors are captured as rendered
//! reason strings for the same purpose.

use crate::ident::{ProjectIdentifier, TaskIdentifier};
use crate::log::LogEntry;
use crate::task::TaskDescription;

/// Result type for tasker-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving, parsing, and running tasks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A path string could not be resolved to a usable location.
    #[error("path '{path}' is not a valid path: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The filesystem refused access.
    #[error("access to '{path}' was denied")]
    AccessDenied { path: String },

    /// The project file does not exist.
    #[error("project file '{project}' does not exist")]
    MissingProjectFile { project: ProjectIdentifier },

    /// The project file exists but cannot be deserialized.
    #[error("project file '{project}' cannot be read: {reason}")]
    MalformedProjectFile {
        project: ProjectIdentifier,
        reason: String,
    },

    /// A task record is not a usable task specification.
    #[error("task '{task}' {detail}")]
    InvalidTaskSpec { task: TaskIdentifier, detail: String },

    /// The project defines no task under the requested name.
    #[error("project '{project}' does not define a task called '{name}'")]
    MissingTask {
        project: ProjectIdentifier,
        name: String,
    },

    /// No provider claims the command name. Carries every consulted
    /// provider's rejection message.
    #[error("cannot find a command named '{name}'")]
    UnknownCommand { name: String, attempts: Vec<String> },

    /// No provider claims the task type. Same aggregation as
    /// [`Error::UnknownCommand`].
    #[error("cannot find a task type named '{description}'")]
    UnknownTaskType {
        description: TaskDescription,
        attempts: Vec<String>,
    },

    /// A task failed to parse; wraps the underlying failure and names the
    /// task it belongs to.
    #[error("task '{task}': {source}")]
    TaskParse {
        task: TaskIdentifier,
        source: Box<Error>,
    },

    /// The scheduler found no runnable task while tasks remain.
    #[error("the dependency graph contains at least one cycle")]
    CyclicDependency,

    /// An adjacency query named a vertex the graph does not contain.
    #[error("the graph does not contain the requested vertex")]
    VertexNotFound,

    /// A command was invoked with unusable arguments.
    #[error("{message}")]
    Syntax { message: String },

    /// A task or command failed while running. Extensions report their own
    /// failures through this variant with a category of their choosing.
    #[error("{detail}")]
    Failure { category: String, detail: String },
}

impl Error {
    /// The short category string used in diagnostics.
    pub fn category(&self) -> &str {
        match self {
            Error::InvalidPath { .. } => "invalid path",
            Error::AccessDenied { .. } => "access denied",
            Error::MissingProjectFile { .. } => "missing project file",
            Error::MalformedProjectFile { .. } => "malformed project file",
            Error::InvalidTaskSpec { .. } => "invalid task specification",
            Error::MissingTask { .. } => "missing task",
            Error::UnknownCommand { .. } => "unknown command",
            Error::UnknownTaskType { .. } => "unknown task type",
            Error::TaskParse { source, .. } => source.category(),
            Error::CyclicDependency => "cyclic dependency",
            Error::VertexNotFound => "vertex not found",
            Error::Syntax { .. } => "syntax error",
            Error::Failure { category, .. } => category,
        }
    }

    /// Rejection messages gathered from every provider consulted before
    /// this error was produced. Empty for non-aggregated errors.
    pub fn attempts(&self) -> &[String] {
        match self {
            Error::UnknownCommand { attempts, .. } => attempts,
            Error::UnknownTaskType { attempts, .. } => attempts,
            Error::TaskParse { source, .. } => source.attempts(),
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
