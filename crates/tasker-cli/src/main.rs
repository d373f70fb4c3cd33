//! tasker CLI
//!
//! The driver wires the pieces together: it loads the built-in extension
//! modules through an [`ExtensionRegistry`], splits the command line with
//! [`parser::CommandParser`], and renders log entries to the console.

mod cli;
mod console;
mod error;
mod parser;

use std::sync::Arc;

use clap::Parser;
use tasker_core::{Log, LogEntry};
use tasker_extensions::{ExtensionBuilder, ExtensionManager, ExtensionProvider, ExtensionRegistry};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, restore_command_separator};
use console::ConsoleLog;
use error::Result;

const USAGE: &str = "tasker [project-file | --] command [args...]";

fn main() {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set tracing subscriber");
        tracing::debug!("verbose mode enabled");
    }

    let log = ConsoleLog;
    if let Err(e) = run(&cli, &raw, &log) {
        console::print_error(&e.to_entry(), 0);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, raw: &[String], log: &dyn Log) -> Result<()> {
    let tokens = restore_command_separator(raw, cli.args.clone());
    if tokens.is_empty() {
        log.event(LogEntry::new("usage", USAGE));
        return Ok(());
    }

    let manager = Arc::new(builtin_manager()?);
    let parser = parser::CommandParser::new(manager);
    let (command, args) = parser.parse(&tokens)?;
    command.run(&args, log)?;
    Ok(())
}

/// Load the built-in extension modules.
///
/// Built-ins go through the same registry and provider chain installed
/// modules would, so the driver exercises no private shortcuts.
fn builtin_manager() -> Result<ExtensionManager> {
    let mut registry = ExtensionRegistry::new();
    registry.register("echo", tasker_echo::extension);

    let mut manager = ExtensionManager::new();
    let echo = registry.extension("echo")?;

    let mut modules = ExtensionBuilder::new("builtin-modules");
    modules.add_extension_provider(Arc::new(registry));
    manager.load_extension(&modules.build());
    manager.load_extension(&echo);
    Ok(manager)
}
