//! Manifest lifecycle: register extensions, record dependencies, persist
//! to disk, and load the registry back.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tasker_core::{EmptyTaskHandlerProvider, Log, Result as CoreResult};
use tasker_extensions::{
    ExtensionBuilder, ExtensionManifest, ExtensionPath, ManagementScheme,
};
use tasker_test_utils::ProjectDir;

struct NamedCommand(&'static str);

impl tasker_core::Command for NamedCommand {
    fn name(&self) -> &str {
        self.0
    }

    fn run(&self, _args: &[String], _log: &dyn Log) -> CoreResult<()> {
        Ok(())
    }
}

fn build_manifest() -> ExtensionManifest {
    let mut echo = ExtensionBuilder::new("echo");
    echo.add_command(Arc::new(NamedCommand("echo")));

    let mut handlers = ExtensionBuilder::new("handlers");
    handlers
        .add_command(Arc::new(NamedCommand("deploy")))
        .add_task_handler_provider(Arc::new(EmptyTaskHandlerProvider));

    let mut manifest = ExtensionManifest::new();
    manifest.add(&echo.build(), ExtensionPath::new("echo/mod"));
    manifest.add(&handlers.build(), ExtensionPath::new("handlers/mod"));
    manifest.add_dependency(
        &ExtensionPath::new("echo/mod"),
        &ExtensionPath::new("handlers/mod"),
    );
    manifest.change_management_scheme("echo", ManagementScheme::Manual);
    manifest
}

#[test]
fn test_persisted_manifest_round_trips() {
    let fixture = ProjectDir::new();
    let file = fixture.path().join(tasker_extensions::MANIFEST_FILENAME);

    let manifest = build_manifest();
    manifest.save(&file).unwrap();
    let restored = ExtensionManifest::load(&file).unwrap();

    assert_eq!(manifest, restored);
    assert_eq!(
        restored.extension_names().collect::<Vec<_>>(),
        vec!["echo", "handlers"]
    );
    assert_eq!(restored.command_owner("echo"), Some("echo"));
    assert_eq!(restored.command_owner("deploy"), Some("handlers"));
    assert_eq!(
        restored.management_scheme_of("echo"),
        Some(ManagementScheme::Manual)
    );
    assert_eq!(
        restored.management_scheme_of("handlers"),
        Some(ManagementScheme::Automatic)
    );
    assert_eq!(
        restored.dependencies_of(&ExtensionPath::new("handlers/mod")),
        vec![ExtensionPath::new("echo/mod")]
    );
}

#[test]
fn test_purge_survives_persistence() {
    let fixture = ProjectDir::new();
    let file = fixture.path().join(tasker_extensions::MANIFEST_FILENAME);

    let mut manifest = build_manifest();
    assert!(manifest.purge("handlers"));
    manifest.save(&file).unwrap();

    let restored = ExtensionManifest::load(&file).unwrap();
    assert!(!restored.contains("handlers"));
    assert_eq!(restored.command_owner("deploy"), None);
    assert_eq!(restored.general_task_provider_names().count(), 0);
    assert!(
        restored
            .dependencies_of(&ExtensionPath::new("handlers/mod"))
            .is_empty()
    );
    // The untouched extension is intact.
    assert_eq!(restored.command_owner("echo"), Some("echo"));
}

#[test]
fn test_recursive_dependencies_cross_the_graph() {
    let mut manifest = ExtensionManifest::new();
    let top = ExtensionPath::new("top/mod");
    let middle = ExtensionPath::new("middle/mod");
    let bottom = ExtensionPath::new("bottom/mod");
    manifest.add_dependency(&middle, &top);
    manifest.add_dependency(&bottom, &middle);

    assert_eq!(manifest.dependencies_of(&top), vec![middle.clone()]);
    assert_eq!(
        manifest.recursive_dependencies_of(&top),
        vec![bottom, middle]
    );
}
