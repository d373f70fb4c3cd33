//! Task primitives: the task capability, results, and per-run state.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::ident::TaskIdentifier;
use crate::log::Log;

/// The `type`/`package` pair a task record declares. Providers use this to
/// decide whether they can supply a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription {
    task_type: String,
    package: Option<String>,
}

impl TaskDescription {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            package: None,
        }
    }

    pub fn with_package(task_type: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            package: Some(package.into()),
        }
    }

    pub fn task_type(&self) -> &str {
        &self.task_type
    }

    /// The extension the record names as the origin of the task type, if
    /// any.
    pub fn package(&self) -> Option<&str> {
        self.package.as_deref()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{} (from {})", self.task_type, package),
            None => write!(f, "{}", self.task_type),
        }
    }
}

/// A runnable unit declared in a project file.
///
/// Concrete task kinds come entirely from extensions; the engine only
/// depends on this capability.
pub trait Task {
    /// Identifiers of the tasks this task depends on, in declaration
    /// order.
    fn dependencies(&self) -> Vec<TaskIdentifier>;

    /// Run the task against the results accumulated so far. By the
    /// scheduler's ordering guarantee, `state` already holds the result of
    /// every dependency.
    fn run(&self, state: &TaskState<'_>, log: &dyn Log) -> Result<TaskResult>;
}

impl std::fmt::Debug for dyn Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("dependencies", &self.dependencies())
            .finish()
    }
}

/// An immutable mapping from output key to dynamically-typed value,
/// produced by a completed task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskResult {
    outputs: HashMap<String, Value>,
}

impl TaskResult {
    /// The result with no outputs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(outputs: HashMap<String, Value>) -> Self {
        Self { outputs }
    }

    /// Look up an output by key, converting it to the expected type. A
    /// missing key or a value of the wrong shape yields `None`; neither is
    /// an error.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.outputs.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

/// The scheduler-owned mutable store of results for one run. Grows
/// monotonically as tasks complete and is discarded with the run.
#[derive(Debug, Default)]
pub struct TaskStateBuilder {
    results: HashMap<TaskIdentifier, TaskResult>,
}

impl TaskStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of a completed task.
    pub fn complete(&mut self, task: TaskIdentifier, result: TaskResult) {
        self.results.insert(task, result);
    }

    pub fn is_completed(&self, task: &TaskIdentifier) -> bool {
        self.results.contains_key(task)
    }

    pub fn result(&self, task: &TaskIdentifier) -> Option<&TaskResult> {
        self.results.get(task)
    }
}

/// Read-only view of a run's accumulated results, handed to running
/// tasks.
#[derive(Debug, Clone, Copy)]
pub struct TaskState<'a> {
    builder: &'a TaskStateBuilder,
}

impl<'a> TaskState<'a> {
    pub fn new(builder: &'a TaskStateBuilder) -> Self {
        Self { builder }
    }

    /// The result of an already-completed task.
    pub fn result(&self, task: &TaskIdentifier) -> Option<&'a TaskResult> {
        self.builder.result(task)
    }

    pub fn is_completed(&self, task: &TaskIdentifier) -> bool {
        self.builder.is_completed(task)
    }
}
