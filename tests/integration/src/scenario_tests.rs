//! End-to-end scenarios through the library API: extensions loaded into a
//! manager, projects parsed against it, tasks scheduled and run.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use serde_json::json;
use tasker_core::provider::{CommandProvider, TaskHandler, TaskRecord};
use tasker_core::{
    Log, MemoryLog, ProjectParser, Result, Task, TaskIdentifier, TaskResult, TaskState, run_task,
};
use tasker_extensions::{ExtensionBuilder, ExtensionManager, ExtensionRegistry};
use tasker_test_utils::ProjectDir;

/// Echoes its text like the echo task, but can declare dependencies on
/// other tasks in the same project through a `DependsOn` list.
struct ChainedEchoTask {
    text: String,
    dependencies: Vec<TaskIdentifier>,
}

impl Task for ChainedEchoTask {
    fn dependencies(&self) -> Vec<TaskIdentifier> {
        self.dependencies.clone()
    }

    fn run(&self, state: &TaskState<'_>, log: &dyn Log) -> Result<TaskResult> {
        for dependency in &self.dependencies {
            assert!(state.is_completed(dependency), "dependency ran first");
        }
        log.event(tasker_core::LogEntry::new("status", self.text.clone()));
        Ok(TaskResult::empty())
    }
}

struct ChainedEchoHandler;

impl TaskHandler for ChainedEchoHandler {
    fn task_type(&self) -> &str {
        "chained-echo"
    }

    fn parse(&self, task: &TaskIdentifier, record: &TaskRecord) -> Result<Arc<dyn Task>> {
        let text = record
            .get("Text")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string();
        let dependencies = record
            .get("DependsOn")
            .and_then(|value| value.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| entry.as_str())
                    .map(|name| TaskIdentifier::new(task.project().clone(), name))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Arc::new(ChainedEchoTask { text, dependencies }))
    }
}

fn chained_echo_extension() -> tasker_extensions::Extension {
    let mut builder = ExtensionBuilder::new("chained-echo");
    builder.add_task_handler(Arc::new(ChainedEchoHandler));
    builder.build()
}

fn manager_with_builtins() -> Arc<ExtensionManager> {
    use tasker_extensions::ExtensionProvider;

    let mut registry = ExtensionRegistry::new();
    registry.register("echo", tasker_echo::extension);
    registry.register("chained-echo", chained_echo_extension);

    let mut manager = ExtensionManager::new();
    for identifier in ["echo", "chained-echo"] {
        let extension = registry.extension(identifier).unwrap();
        assert!(manager.load_extension(&extension));
    }
    Arc::new(manager)
}

fn statuses(log: &MemoryLog) -> Vec<String> {
    log.events()
        .into_iter()
        .filter(|entry| entry.category == "status")
        .map(|entry| entry.detail)
        .collect()
}

#[test]
fn test_echo_greet_scenario() {
    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({"greet": {"type": "echo", "Text": "hello"}}),
    );

    let parser = ProjectParser::new(manager_with_builtins());
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "greet").unwrap();
    let log = MemoryLog::new();
    run_task(&spec, &parser, &log).unwrap();

    assert_eq!(statuses(&log), vec!["hello".to_string()]);
}

#[test]
fn test_dependency_chain_runs_in_order() {
    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({
            "a": {"type": "chained-echo", "Text": "A"},
            "b": {"type": "chained-echo", "Text": "B", "DependsOn": ["a"]}
        }),
    );

    let parser = ProjectParser::new(manager_with_builtins());
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "b").unwrap();
    let log = MemoryLog::new();
    run_task(&spec, &parser, &log).unwrap();

    assert_eq!(statuses(&log), vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_mixed_task_types_share_one_run() {
    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({
            "plain": {"type": "echo", "Text": "plain"},
            "top": {"type": "chained-echo", "Text": "top", "DependsOn": ["plain"]}
        }),
    );

    let parser = ProjectParser::new(manager_with_builtins());
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "top").unwrap();
    let log = MemoryLog::new();
    run_task(&spec, &parser, &log).unwrap();

    assert_eq!(statuses(&log), vec!["plain".to_string(), "top".to_string()]);
}

#[test]
fn test_missing_type_aborts_before_any_task_runs() {
    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({
            "good": {"type": "echo", "Text": "should not run"},
            "bad": {}
        }),
    );

    let parser = ProjectParser::new(manager_with_builtins());
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "good").unwrap();
    let log = MemoryLog::new();
    let err = run_task(&spec, &parser, &log).unwrap_err();

    assert_eq!(err.category(), "invalid task specification");
    assert!(statuses(&log).is_empty());
}

#[test]
fn test_cycle_is_reported() {
    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({
            "a": {"type": "chained-echo", "Text": "A", "DependsOn": ["b"]},
            "b": {"type": "chained-echo", "Text": "B", "DependsOn": ["a"]}
        }),
    );

    let parser = ProjectParser::new(manager_with_builtins());
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "a").unwrap();
    let log = MemoryLog::new();
    let err = run_task(&spec, &parser, &log).unwrap_err();

    assert_eq!(err.category(), "cyclic dependency");
    assert!(statuses(&log).is_empty());
}

#[test]
fn test_unknown_command_aggregates_both_rejections() {
    /// General provider that rejects everything with its own message.
    struct Rejecting(&'static str);

    impl CommandProvider for Rejecting {
        fn command(&self, _name: &str) -> Result<Arc<dyn tasker_core::Command>> {
            Err(tasker_core::Error::Failure {
                category: "unknown command".to_string(),
                detail: self.0.to_string(),
            })
        }
    }

    let mut first = ExtensionBuilder::new("first");
    first.add_command_provider(Arc::new(Rejecting("first has no such command")));
    let mut second = ExtensionBuilder::new("second");
    second.add_command_provider(Arc::new(Rejecting("second has no such command")));

    let mut manager = ExtensionManager::new();
    manager.load_extension(&first.build());
    manager.load_extension(&second.build());

    let err = manager.command("frobnicate").unwrap_err();
    assert_eq!(err.category(), "unknown command");
    assert!(err.to_string().contains("frobnicate"));
    assert_eq!(err.attempts().len(), 2);
    assert!(err.attempts()[0].contains("first has no such command"));
    assert!(err.attempts()[1].contains("second has no such command"));
}

#[test]
fn test_results_thread_between_tasks() {
    /// Emits one output value.
    struct EmitTask;

    /// Reads the emitter's output and records what it saw.
    struct ReadTask {
        emitter: TaskIdentifier,
        seen: Rc<RefCell<Option<String>>>,
    }

    impl Task for EmitTask {
        fn dependencies(&self) -> Vec<TaskIdentifier> {
            Vec::new()
        }

        fn run(&self, _state: &TaskState<'_>, _log: &dyn Log) -> Result<TaskResult> {
            Ok(TaskResult::new(
                [("greeting".to_string(), serde_json::Value::from("hello"))].into(),
            ))
        }
    }

    impl Task for ReadTask {
        fn dependencies(&self) -> Vec<TaskIdentifier> {
            vec![self.emitter.clone()]
        }

        fn run(&self, state: &TaskState<'_>, _log: &dyn Log) -> Result<TaskResult> {
            let greeting = state
                .result(&self.emitter)
                .and_then(|result| result.get::<String>("greeting"));
            *self.seen.borrow_mut() = greeting;
            Ok(TaskResult::empty())
        }
    }

    struct WiringHandler {
        seen: Rc<RefCell<Option<String>>>,
    }

    impl TaskHandler for WiringHandler {
        fn task_type(&self) -> &str {
            "wired"
        }

        fn parse(&self, task: &TaskIdentifier, _record: &TaskRecord) -> Result<Arc<dyn Task>> {
            if task.name() == "emit" {
                Ok(Arc::new(EmitTask))
            } else {
                Ok(Arc::new(ReadTask {
                    emitter: TaskIdentifier::new(task.project().clone(), "emit"),
                    seen: self.seen.clone(),
                }))
            }
        }
    }

    let fixture = ProjectDir::new();
    fixture.write_project(
        "project.json",
        &json!({
            "emit": {"type": "wired"},
            "read": {"type": "wired"}
        }),
    );

    let seen = Rc::new(RefCell::new(None));
    let mut extension = ExtensionBuilder::new("wiring");
    extension.add_task_handler(Arc::new(WiringHandler { seen: seen.clone() }));
    let mut manager = ExtensionManager::new();
    manager.load_extension(&extension.build());

    let parser = ProjectParser::new(Arc::new(manager));
    let spec = TaskIdentifier::resolve("project.json", Some(fixture.path()), "read").unwrap();
    run_task(&spec, &parser, &MemoryLog::new()).unwrap();

    assert_eq!(*seen.borrow(), Some("hello".to_string()));
}
