//! Demonstration extension: the `echo` command and the `echo` task type.
//!
//! This is the smallest useful extension and doubles as the reference for
//! writing new ones: implement the capabilities, then expose one
//! [`extension`] entry point that registers them on a builder.

use std::sync::Arc;

use serde::Deserialize;
use tasker_core::{
    Command, Log, LogEntry, Result, SerdeTaskHandler, Task, TaskIdentifier, TaskResult, TaskState,
};
use tasker_extensions::{Extension, ExtensionBuilder};

/// Prints its arguments as one status event.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoCommand;

impl Command for EchoCommand {
    fn name(&self) -> &str {
        "echo"
    }

    fn run(&self, args: &[String], log: &dyn Log) -> Result<()> {
        log.event(LogEntry::new("status", args.join(" ")));
        Ok(())
    }
}

/// A task that echoes a fixed text when run.
///
/// ```json
/// {"greet": {"type": "echo", "Text": "hello"}}
/// ```
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EchoTask {
    #[serde(default)]
    text: String,
}

impl EchoTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Task for EchoTask {
    fn dependencies(&self) -> Vec<TaskIdentifier> {
        Vec::new()
    }

    fn run(&self, _state: &TaskState<'_>, log: &dyn Log) -> Result<TaskResult> {
        EchoCommand.run(&[self.text.clone()], log)?;
        Ok(TaskResult::empty())
    }
}

/// The module entry point: everything this extension provides.
pub fn extension() -> Extension {
    let mut builder = ExtensionBuilder::new("echo");
    builder
        .add_command(Arc::new(EchoCommand))
        .add_task_handler(Arc::new(SerdeTaskHandler::<EchoTask>::new("echo")));
    builder.build()
}
