//! Shared test utilities for the tasker workspace.
//!
//! This crate provides the [`ProjectDir`] fixture used across crate test
//! suites to lay out temporary project files. It is a dev-dependency only
//! and is never published.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// A temporary directory with helpers for writing project files.
///
/// The directory and everything in it is removed when the fixture is
/// dropped.
pub struct ProjectDir {
    root: TempDir,
}

impl ProjectDir {
    /// Create an empty fixture directory.
    ///
    /// # Panics
    ///
    /// Panics when the temporary directory cannot be created; fixtures
    /// fail loudly rather than producing misleading test results.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create fixture directory"),
        }
    }

    /// The fixture directory's path.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write a project file from a JSON document and return its path.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be written.
    pub fn write_project(&self, name: &str, document: &Value) -> PathBuf {
        let path = self.root.path().join(name);
        let text = serde_json::to_string_pretty(document).expect("project document is JSON");
        fs::write(&path, text).unwrap_or_else(|e| panic!("failed to write {name}: {e}"));
        path
    }

    /// Write an arbitrary file and return its path.
    ///
    /// # Panics
    ///
    /// Panics when the file cannot be written.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.path().join(name);
        fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {name}: {e}"));
        path
    }
}

impl Default for ProjectDir {
    fn default() -> Self {
        Self::new()
    }
}
