//! The `run` command: dependency-graph construction and task scheduling.
//!
//! Construction walks the requested task's dependency closure depth-first,
//! parsing owning projects on demand; a task already visited is not
//! re-descended, so a cyclic declaration is tolerated here and only
//! surfaced during scheduling. Scheduling repeatedly extracts a ready
//! vertex (one with no remaining dependency edges) and runs it; when tasks
//! remain but none is ready, the graph contains a cycle and the run fails.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::DirectedGraph;
use crate::ident::TaskIdentifier;
use crate::log::Log;
use crate::project::ProjectParser;
use crate::provider::{Command, TaskHandlerProvider};
use crate::task::{Task, TaskState, TaskStateBuilder};

/// Parses a project, selects a task, and runs it along with all of its
/// dependencies.
pub struct RunTaskCommand {
    handlers: Arc<dyn TaskHandlerProvider>,
    spec: Option<TaskIdentifier>,
}

impl RunTaskCommand {
    /// A run command that takes its project path and task name from its
    /// arguments.
    pub fn new(handlers: Arc<dyn TaskHandlerProvider>) -> Self {
        Self {
            handlers,
            spec: None,
        }
    }

    /// A run command bound to a pre-resolved task.
    pub fn for_task(handlers: Arc<dyn TaskHandlerProvider>, spec: TaskIdentifier) -> Self {
        Self {
            handlers,
            spec: Some(spec),
        }
    }
}

impl Command for RunTaskCommand {
    fn name(&self) -> &str {
        "run"
    }

    fn run(&self, args: &[String], log: &dyn Log) -> Result<()> {
        let spec = match &self.spec {
            Some(spec) => spec.clone(),
            None => {
                if args.len() < 2 {
                    return Err(Error::Syntax {
                        message: "the 'run' command requires at least two arguments: \
                                  the filename of the project and the name of the task"
                            .to_string(),
                    });
                }
                TaskIdentifier::resolve(&args[0], None, &args[1])?
            }
        };
        run_task(&spec, &ProjectParser::new(self.handlers.clone()), log)
    }
}

/// Run the given task and its transitive dependencies in dependency
/// order, threading completed results forward through the task state.
///
/// The first failure, during construction or while running a task,
/// aborts the whole run; state accumulated so far is discarded with it.
pub fn run_task(spec: &TaskIdentifier, parser: &ProjectParser, log: &dyn Log) -> Result<()> {
    let mut graph = DirectedGraph::new();
    let mut tasks: HashMap<TaskIdentifier, Arc<dyn Task>> = HashMap::new();
    collect(spec, parser, &mut graph, &mut tasks)?;
    debug!(root = %spec, count = tasks.len(), "task graph constructed");

    let mut state = TaskStateBuilder::new();
    while !tasks.is_empty() {
        let Some(next) = pop_ready(&mut graph) else {
            return Err(Error::CyclicDependency);
        };
        if let Some(task) = tasks.remove(&next) {
            debug!(task = %next, "running task");
            let result = task.run(&TaskState::new(&state), log)?;
            state.complete(next, result);
        }
    }
    Ok(())
}

/// Record `spec` and its transitive dependencies in the graph, parsing
/// owning projects as they are first reached.
fn collect(
    spec: &TaskIdentifier,
    parser: &ProjectParser,
    graph: &mut DirectedGraph<TaskIdentifier>,
    tasks: &mut HashMap<TaskIdentifier, Arc<dyn Task>>,
) -> Result<()> {
    if tasks.contains_key(spec) {
        return Ok(());
    }

    let project = parser.parse(spec.project())?;
    let task = project
        .task(spec.name())
        .ok_or_else(|| Error::MissingTask {
            project: spec.project().clone(),
            name: spec.name().to_string(),
        })?
        .clone();

    tasks.insert(spec.clone(), task.clone());
    graph.add_vertex(spec.clone());
    for dependency in task.dependencies() {
        graph.add_edge(spec.clone(), dependency.clone());
        collect(&dependency, parser, graph, tasks)?;
    }
    Ok(())
}

/// Remove and return the smallest vertex with no remaining dependency
/// edges. The lexicographic tie-break (project path, then task name)
/// keeps execution order reproducible when several tasks are ready at
/// once.
fn pop_ready(graph: &mut DirectedGraph<TaskIdentifier>) -> Option<TaskIdentifier> {
    let next = graph
        .vertices()
        .filter(|vertex| {
            matches!(graph.outgoing_edges(vertex), Ok(edges) if edges.is_empty())
        })
        .min()
        .cloned()?;
    graph.remove_vertex(&next);
    Some(next)
}
