//! Provider capabilities for resolving commands and task handlers, plus
//! the small building-block providers extensions compose from.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::ident::TaskIdentifier;
use crate::log::Log;
use crate::task::{Task, TaskDescription};

/// A task record: the JSON object declared under a task's name in a
/// project file.
pub type TaskRecord = Map<String, Value>;

/// An operation the command line can invoke directly.
pub trait Command {
    /// The name the command is invoked by.
    fn name(&self) -> &str;

    fn run(&self, args: &[String], log: &dyn Log) -> Result<()>;
}

impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command").field("name", &self.name()).finish()
    }
}

/// Interprets task records of one or more task types into concrete tasks.
pub trait TaskHandler {
    /// The task `type` this handler claims.
    fn task_type(&self) -> &str;

    /// Produce a task from its record.
    fn parse(&self, task: &TaskIdentifier, record: &TaskRecord) -> Result<Arc<dyn Task>>;
}

impl std::fmt::Debug for dyn TaskHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandler")
            .field("task_type", &self.task_type())
            .finish()
    }
}

/// Resolves command names to commands.
pub trait CommandProvider {
    fn command(&self, name: &str) -> Result<Arc<dyn Command>>;
}

/// Resolves task descriptions to task handlers.
pub trait TaskHandlerProvider {
    fn handler(&self, description: &TaskDescription) -> Result<Arc<dyn TaskHandler>>;
}

/// A command provider that rejects every name.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyCommandProvider;

impl CommandProvider for EmptyCommandProvider {
    fn command(&self, name: &str) -> Result<Arc<dyn Command>> {
        Err(Error::UnknownCommand {
            name: name.to_string(),
            attempts: Vec::new(),
        })
    }
}

/// A task-handler provider that rejects every description.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyTaskHandlerProvider;

impl TaskHandlerProvider for EmptyTaskHandlerProvider {
    fn handler(&self, description: &TaskDescription) -> Result<Arc<dyn TaskHandler>> {
        Err(Error::UnknownTaskType {
            description: description.clone(),
            attempts: Vec::new(),
        })
    }
}

/// A provider exposing exactly one command under its own name.
pub struct SingleCommandProvider {
    command: Arc<dyn Command>,
}

impl SingleCommandProvider {
    pub fn new(command: Arc<dyn Command>) -> Self {
        Self { command }
    }
}

impl CommandProvider for SingleCommandProvider {
    fn command(&self, name: &str) -> Result<Arc<dyn Command>> {
        if self.command.name() == name {
            Ok(self.command.clone())
        } else {
            Err(Error::UnknownCommand {
                name: name.to_string(),
                attempts: Vec::new(),
            })
        }
    }
}

/// A provider exposing exactly one task handler for its task type.
pub struct SingleTaskHandlerProvider {
    handler: Arc<dyn TaskHandler>,
}

impl SingleTaskHandlerProvider {
    pub fn new(handler: Arc<dyn TaskHandler>) -> Self {
        Self { handler }
    }
}

impl TaskHandlerProvider for SingleTaskHandlerProvider {
    fn handler(&self, description: &TaskDescription) -> Result<Arc<dyn TaskHandler>> {
        if self.handler.task_type() == description.task_type() {
            Ok(self.handler.clone())
        } else {
            Err(Error::UnknownTaskType {
                description: description.clone(),
                attempts: Vec::new(),
            })
        }
    }
}

/// A task handler that deserializes the whole record into `T` with serde.
///
/// Most task kinds are plain data plus behavior, which makes a derived
/// `Deserialize` the entire parsing story.
pub struct SerdeTaskHandler<T> {
    task_type: String,
    marker: PhantomData<fn() -> T>,
}

impl<T> SerdeTaskHandler<T> {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            marker: PhantomData,
        }
    }
}

impl<T> TaskHandler for SerdeTaskHandler<T>
where
    T: Task + DeserializeOwned + 'static,
{
    fn task_type(&self) -> &str {
        &self.task_type
    }

    fn parse(&self, task: &TaskIdentifier, record: &TaskRecord) -> Result<Arc<dyn Task>> {
        let parsed: T = serde_json::from_value(Value::Object(record.clone())).map_err(|e| {
            Error::InvalidTaskSpec {
                task: task.clone(),
                detail: format!("cannot be deserialized: {e}"),
            }
        })?;
        Ok(Arc::new(parsed))
    }
}
