//! The durable extension registry.
//!
//! An [`ExtensionManifest`] records which extensions are installed, where
//! their modules live, how they are managed, what provider keys they
//! claim, and how they depend on each other. It serializes to a TOML
//! document (`from_toml`/`to_toml`, with `load`/`save` file helpers) so
//! the registry survives between runs of the program even though loaded
//! extensions themselves do not.
//!
//! The extension *name* is the manifest's unique key: adding an extension
//! under an existing name purges the previous registration completely
//! before the new one is recorded. Paths are not unique keys.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tasker_core::DirectedGraph;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extension::Extension;
use crate::path::ExtensionPath;

/// How an installed extension came to be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagementScheme {
    /// Installed as a dependency of another extension; may be removed
    /// once nothing depends on it.
    Automatic,
    /// Installed explicitly by the user; never removed automatically.
    Manual,
}

/// A serializable record of known extensions, their locations, their
/// provider keys, and their inter-extension dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionManifest {
    extension_paths: BTreeMap<String, ExtensionPath>,
    management_schemes: BTreeMap<String, ManagementScheme>,
    specific_command_providers: BTreeMap<String, String>,
    specific_task_providers: BTreeMap<String, String>,
    general_command_providers: BTreeSet<String>,
    general_task_providers: BTreeSet<String>,
    extension_providers: BTreeSet<String>,
    dependencies: DirectedGraph<ExtensionPath>,
}

impl ExtensionManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extension's providers under the given path.
    ///
    /// If an extension with the same name is already registered it is
    /// purged first: registration replaces, it never merges. The
    /// management scheme defaults to [`ManagementScheme::Automatic`];
    /// specific provider keys overwrite any other extension's claim
    /// (last writer wins), and membership in the general-provider sets is
    /// recorded only when the extension actually carries providers of
    /// that kind.
    pub fn add(&mut self, extension: &Extension, path: ExtensionPath) {
        if self.extension_paths.contains_key(extension.name()) {
            debug!(extension = extension.name(), "replacing manifest entry");
            self.purge(extension.name());
        }

        let name = extension.name().to_string();
        self.extension_paths.insert(name.clone(), path);
        self.management_schemes
            .insert(name.clone(), ManagementScheme::Automatic);

        for key in extension.specific_commands().keys() {
            self.specific_command_providers
                .insert(key.clone(), name.clone());
        }
        for key in extension.specific_task_handlers().keys() {
            self.specific_task_providers.insert(key.clone(), name.clone());
        }

        if !extension.general_command_providers().is_empty() {
            self.general_command_providers.insert(name.clone());
        }
        if !extension.general_task_handler_providers().is_empty() {
            self.general_task_providers.insert(name.clone());
        }
        if !extension.extension_providers().is_empty() {
            self.extension_providers.insert(name);
        }
    }

    /// Remove every trace of the named extension: its path, its
    /// management scheme, every specific provider key it owns, its
    /// general-provider memberships, and its vertex in the dependency
    /// graph. Returns whether anything was actually removed.
    pub fn purge(&mut self, name: &str) -> bool {
        let removed_path = self.extension_paths.remove(name);
        let mut changed = removed_path.is_some();
        changed |= self.management_schemes.remove(name).is_some();
        changed |= purge_owner(&mut self.specific_command_providers, name);
        changed |= purge_owner(&mut self.specific_task_providers, name);
        changed |= self.general_command_providers.remove(name);
        changed |= self.general_task_providers.remove(name);
        changed |= self.extension_providers.remove(name);
        if let Some(path) = removed_path {
            changed |= self.dependencies.remove_vertex(&path);
        }
        changed
    }

    /// Update how the named extension is managed. Pure metadata: provider
    /// registrations are untouched. Returns `false` for an unregistered
    /// name.
    pub fn change_management_scheme(&mut self, name: &str, scheme: ManagementScheme) -> bool {
        if !self.extension_paths.contains_key(name) {
            return false;
        }
        self.management_schemes.insert(name.to_string(), scheme);
        true
    }

    /// Record that the extension at `dependent` depends on the extension
    /// at `dependency`. Both vertices are created as needed.
    pub fn add_dependency(&mut self, dependency: &ExtensionPath, dependent: &ExtensionPath) {
        self.dependencies
            .add_edge(dependent.clone(), dependency.clone());
    }

    /// The direct dependencies of the extension at `path`, sorted.
    /// Empty, not an error, for an unregistered path.
    pub fn dependencies_of(&self, path: &ExtensionPath) -> Vec<ExtensionPath> {
        let mut direct: Vec<ExtensionPath> = match self.dependencies.outgoing_edges(path) {
            Ok(edges) => edges.iter().cloned().collect(),
            Err(_) => Vec::new(),
        };
        direct.sort();
        direct
    }

    /// The full transitive dependency closure of the extension at
    /// `path`, sorted. Empty, not an error, for an unregistered path.
    pub fn recursive_dependencies_of(&self, path: &ExtensionPath) -> Vec<ExtensionPath> {
        let mut closure: Vec<ExtensionPath> =
            self.dependencies.reachable_vertices(path).into_iter().collect();
        closure.sort();
        closure
    }

    /// Whether an extension with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.extension_paths.contains_key(name)
    }

    /// All registered extension names, sorted.
    pub fn extension_names(&self) -> impl Iterator<Item = &str> {
        self.extension_paths.keys().map(String::as_str)
    }

    /// The path the named extension was registered under.
    pub fn path_of(&self, name: &str) -> Option<&ExtensionPath> {
        self.extension_paths.get(name)
    }

    pub fn management_scheme_of(&self, name: &str) -> Option<ManagementScheme> {
        self.management_schemes.get(name).copied()
    }

    /// The extension that claims the given command name, if any.
    pub fn command_owner(&self, command: &str) -> Option<&str> {
        self.specific_command_providers
            .get(command)
            .map(String::as_str)
    }

    /// The extension that claims the given task type, if any.
    pub fn task_type_owner(&self, task_type: &str) -> Option<&str> {
        self.specific_task_providers.get(task_type).map(String::as_str)
    }

    /// Names of extensions exposing general command providers.
    pub fn general_command_provider_names(&self) -> impl Iterator<Item = &str> {
        self.general_command_providers.iter().map(String::as_str)
    }

    /// Names of extensions exposing general task-handler providers.
    pub fn general_task_provider_names(&self) -> impl Iterator<Item = &str> {
        self.general_task_providers.iter().map(String::as_str)
    }

    /// Names of extensions exposing nested extension providers.
    pub fn extension_provider_names(&self) -> impl Iterator<Item = &str> {
        self.extension_providers.iter().map(String::as_str)
    }

    /// Parse a manifest from its TOML document form.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::ManifestParse {
            reason: e.to_string(),
        })
    }

    /// Render the manifest as a TOML document.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ManifestSerialize {
            reason: e.to_string(),
        })
    }

    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::ManifestRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&text)
    }

    /// Write the manifest to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_toml()?;
        fs::write(path, text).map_err(|e| Error::ManifestWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

fn purge_owner(map: &mut BTreeMap<String, String>, owner: &str) -> bool {
    let before = map.len();
    map.retain(|_, value| value != owner);
    map.len() != before
}
