//! Registry of extension entry points.
//!
//! Extension modules expose one well-known entry point returning their
//! [`Extension`] description. The registry maps extension identifiers to
//! those entry points and answers the [`ExtensionProvider`] capability
//! from the map, standing in for a platform dynamic-module loader: the
//! engine never inspects arbitrary declarations, it calls the registered
//! function.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::extension::{Extension, ExtensionProvider};

/// A module's well-known entry point.
pub type ExtensionEntryPoint = fn() -> Extension;

/// Maps extension identifiers to module entry points.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    entries: HashMap<String, ExtensionEntryPoint>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module entry point. An existing registration under the
    /// same identifier is replaced.
    pub fn register(&mut self, identifier: impl Into<String>, entry: ExtensionEntryPoint) {
        self.entries.insert(identifier.into(), entry);
    }

    /// Whether an entry point is registered for the identifier.
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// All registered identifiers, sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ExtensionProvider for ExtensionRegistry {
    fn extension(&self, identifier: &str) -> Result<Extension> {
        match self.entries.get(identifier) {
            Some(entry) => Ok(entry()),
            None => Err(Error::NotRegistered {
                identifier: identifier.to_string(),
            }),
        }
    }
}
