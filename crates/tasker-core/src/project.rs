//! Project files and the memoizing project parser.
//!
//! A project file is a JSON object mapping task names to task records.
//! [`ProjectParser`] parses each distinct project at most once per process
//! run and memoizes the outcome permanently, successes and failures alike:
//! a run sees one consistent snapshot of every project even if the file
//! changes on disk mid-run.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::ident::{ProjectIdentifier, TaskIdentifier};
use crate::provider::{TaskHandlerProvider, TaskRecord};
use crate::task::{Task, TaskDescription};

const TYPE_FIELD: &str = "type";
const PACKAGE_FIELD: &str = "package";

/// A named collection of tasks backed by one file.
#[derive(Clone)]
pub struct Project {
    identifier: ProjectIdentifier,
    tasks: HashMap<String, Arc<dyn Task>>,
}

impl Project {
    pub fn new(identifier: ProjectIdentifier, tasks: HashMap<String, Arc<dyn Task>>) -> Self {
        Self { identifier, tasks }
    }

    pub fn identifier(&self) -> &ProjectIdentifier {
        &self.identifier
    }

    /// The task with the given name, if the project declares one.
    pub fn task(&self, name: &str) -> Option<&Arc<dyn Task>> {
        self.tasks.get(name)
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }
}

impl fmt::Debug for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Project")
            .field("identifier", &self.identifier)
            .field("tasks", &self.tasks.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Parses project files into [`Project`]s, consulting a task-handler
/// provider for each record's `type`.
pub struct ProjectParser {
    handlers: Arc<dyn TaskHandlerProvider>,
    cache: RefCell<HashMap<ProjectIdentifier, Result<Project>>>,
}

impl ProjectParser {
    pub fn new(handlers: Arc<dyn TaskHandlerProvider>) -> Self {
        Self {
            handlers,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a path against an optional base directory and parse the
    /// project there.
    pub fn parse_path(&self, path: &str, base: Option<&Path>) -> Result<Project> {
        let identifier = ProjectIdentifier::resolve(path, base)?;
        self.parse(&identifier)
    }

    /// Parse the project with the given identifier, or replay the
    /// memoized outcome of an earlier parse.
    pub fn parse(&self, identifier: &ProjectIdentifier) -> Result<Project> {
        if let Some(outcome) = self.cache.borrow().get(identifier) {
            debug!(project = %identifier, "project cache hit");
            return outcome.clone();
        }
        let outcome = self.parse_project(identifier);
        self.cache
            .borrow_mut()
            .insert(identifier.clone(), outcome.clone());
        outcome
    }

    fn parse_project(&self, identifier: &ProjectIdentifier) -> Result<Project> {
        debug!(project = %identifier, "parsing project file");
        let text = match fs::read_to_string(identifier.path()) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::MissingProjectFile {
                    project: identifier.clone(),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(Error::AccessDenied {
                    path: identifier.to_string(),
                });
            }
            Err(e) => {
                return Err(Error::MalformedProjectFile {
                    project: identifier.clone(),
                    reason: e.to_string(),
                });
            }
        };

        // BTreeMap keeps record iteration deterministic, so a project with
        // several bad records always reports the same one first.
        let records: BTreeMap<String, TaskRecord> =
            serde_json::from_str(&text).map_err(|e| Error::MalformedProjectFile {
                project: identifier.clone(),
                reason: e.to_string(),
            })?;

        let mut tasks = HashMap::with_capacity(records.len());
        for (name, record) in &records {
            let task_id = TaskIdentifier::new(identifier.clone(), name.clone());
            let task = self.parse_task(&task_id, record)?;
            tasks.insert(name.clone(), task);
        }
        Ok(Project::new(identifier.clone(), tasks))
    }

    fn parse_task(&self, task: &TaskIdentifier, record: &TaskRecord) -> Result<Arc<dyn Task>> {
        let description = describe(task, record)?;
        let handler = self
            .handlers
            .handler(&description)
            .map_err(|e| Error::TaskParse {
                task: task.clone(),
                source: Box::new(e),
            })?;
        handler.parse(task, record)
    }
}

fn describe(task: &TaskIdentifier, record: &TaskRecord) -> Result<TaskDescription> {
    let Some(task_type) = record.get(TYPE_FIELD).and_then(Value::as_str) else {
        return Err(Error::InvalidTaskSpec {
            task: task.clone(),
            detail: format!("does not have a '{TYPE_FIELD}' property"),
        });
    };
    Ok(match record.get(PACKAGE_FIELD).and_then(Value::as_str) {
        Some(package) => TaskDescription::with_package(task_type, package),
        None => TaskDescription::new(task_type),
    })
}
