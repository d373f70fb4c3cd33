//! Splitting the positional tail into a command and its arguments.
//!
//! The grammar is `[project-file | --] command [args...]`:
//!
//! - a leading `--` forces the next token to be a bare command name;
//! - a single token is a bare command name;
//! - two or more tokens where the first names an existing file become a
//!   task run of `(file, second)`;
//! - otherwise the default project filenames are probed in priority
//!   order, and when one exists the run targets `(default, second)`;
//! - failing all of that, the first token is a bare command name and the
//!   rest are its arguments.

use std::sync::Arc;

use tasker_core::provider::{Command, CommandProvider};
use tasker_core::{ProjectIdentifier, RunTaskCommand, TaskIdentifier};
use tasker_extensions::ExtensionManager;
use tracing::debug;

use crate::error::{Error, Result};

/// Default project filenames, probed in priority order when the first
/// token does not name an existing file.
pub const DEFAULT_PROJECT_FILES: [&str; 2] = ["tasker.json", "Tasker.json"];

/// Resolves the positional tail against the loaded extensions.
pub struct CommandParser {
    manager: Arc<ExtensionManager>,
}

impl CommandParser {
    pub fn new(manager: Arc<ExtensionManager>) -> Self {
        Self { manager }
    }

    /// Split `tokens` into the command to run and its arguments.
    ///
    /// # Errors
    ///
    /// Fails when a lone `--` is given, when a path cannot be resolved,
    /// or when no provider claims the command name.
    pub fn parse(&self, tokens: &[String]) -> Result<(Arc<dyn Command>, Vec<String>)> {
        match tokens {
            [] => Err(Error::InvalidCommandSpec {
                message: "no command was given".to_string(),
            }),
            [separator, rest @ ..] if separator == "--" => match rest {
                [] => Err(Error::InvalidCommandSpec {
                    message: "a pseudo-filename of '--' must be followed by a command name"
                        .to_string(),
                }),
                [name, args @ ..] => Ok((self.bare_command(name)?, args.to_vec())),
            },
            [only] => Ok((self.bare_command(only)?, Vec::new())),
            [first, second, rest @ ..] => {
                let identifier = ProjectIdentifier::resolve(first, None)?;
                if identifier.path().exists() {
                    Ok((self.run_command(identifier, second), rest.to_vec()))
                } else if let Some(default) = find_default_project() {
                    debug!(project = %default, "falling back to default project");
                    Ok((self.run_command(default, second), rest.to_vec()))
                } else {
                    Ok((self.bare_command(first)?, tokens[1..].to_vec()))
                }
            }
        }
    }

    fn bare_command(&self, name: &str) -> Result<Arc<dyn Command>> {
        // The driver supplies the task runner itself; everything else
        // comes from extensions.
        if name == "run" {
            return Ok(Arc::new(RunTaskCommand::new(self.manager.clone())));
        }
        Ok(self.manager.command(name)?)
    }

    fn run_command(&self, project: ProjectIdentifier, task: &str) -> Arc<dyn Command> {
        Arc::new(RunTaskCommand::for_task(
            self.manager.clone(),
            TaskIdentifier::new(project, task),
        ))
    }
}

/// Probe the default project filenames in the current directory, in
/// priority order.
pub fn find_default_project() -> Option<ProjectIdentifier> {
    for name in DEFAULT_PROJECT_FILES {
        if let Ok(identifier) = ProjectIdentifier::resolve(name, None) {
            if identifier.path().exists() {
                return Some(identifier);
            }
        }
    }
    None
}
