//! The runtime extension resolver.
//!
//! [`ExtensionManager`] aggregates the providers of every loaded extension
//! and implements all three provider capabilities itself, which makes it
//! usable as a nested extension provider in turn. Resolution follows the
//! specific-first rule: an extension that explicitly claims a command name
//! or task type is never shadowed by a later-loaded general provider,
//! while the general providers form an order-sensitive fallback chain for
//! anything unclaimed.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tasker_core::provider::{Command, CommandProvider, TaskHandler, TaskHandlerProvider};
use tasker_core::task::TaskDescription;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extension::{Extension, ExtensionProvider};

/// Aggregates extension providers and resolves commands, task handlers,
/// and further extensions through them.
#[derive(Default)]
pub struct ExtensionManager {
    /// Permanent resolution cache. Failures are cached alongside
    /// successes: an identifier that failed to resolve once fails
    /// identically for the rest of the process.
    cache: RefCell<HashMap<String, Result<Extension>>>,
    loaded: HashSet<String>,
    specific_commands: HashMap<String, Arc<dyn CommandProvider>>,
    specific_task_handlers: HashMap<String, Arc<dyn TaskHandlerProvider>>,
    command_providers: Vec<Arc<dyn CommandProvider>>,
    task_handler_providers: Vec<Arc<dyn TaskHandlerProvider>>,
    extension_providers: Vec<Arc<dyn ExtensionProvider>>,
}

impl ExtensionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an extension's providers into the manager.
    ///
    /// Loading is deduplicated by extension name: the first load wins and
    /// a repeat is a no-op returning `false`. Specific provider keys
    /// overwrite earlier claims; general and nested providers append in
    /// load order.
    pub fn load_extension(&mut self, extension: &Extension) -> bool {
        if !self.loaded.insert(extension.name().to_string()) {
            debug!(extension = extension.name(), "extension already loaded");
            return false;
        }
        debug!(extension = extension.name(), "loading extension");

        for (name, provider) in extension.specific_commands() {
            self.specific_commands.insert(name.clone(), provider.clone());
        }
        for (task_type, provider) in extension.specific_task_handlers() {
            self.specific_task_handlers
                .insert(task_type.clone(), provider.clone());
        }
        self.command_providers
            .extend(extension.general_command_providers().iter().cloned());
        self.task_handler_providers
            .extend(extension.general_task_handler_providers().iter().cloned());
        self.extension_providers
            .extend(extension.extension_providers().iter().cloned());
        true
    }

    /// Names of the extensions loaded so far.
    pub fn loaded_extensions(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(String::as_str)
    }
}

impl CommandProvider for ExtensionManager {
    fn command(&self, name: &str) -> tasker_core::Result<Arc<dyn Command>> {
        if let Some(specific) = self.specific_commands.get(name) {
            // A specific claim is exclusive: the general chain is not
            // consulted even if the specific provider rejects.
            return specific.command(name);
        }

        let mut attempts = Vec::new();
        for provider in &self.command_providers {
            match provider.command(name) {
                Ok(command) => return Ok(command),
                Err(e) => attempts.push(e.to_string()),
            }
        }
        Err(tasker_core::Error::UnknownCommand {
            name: name.to_string(),
            attempts,
        })
    }
}

impl TaskHandlerProvider for ExtensionManager {
    fn handler(&self, description: &TaskDescription) -> tasker_core::Result<Arc<dyn TaskHandler>> {
        if let Some(specific) = self.specific_task_handlers.get(description.task_type()) {
            return specific.handler(description);
        }

        let mut attempts = Vec::new();
        for provider in &self.task_handler_providers {
            match provider.handler(description) {
                Ok(handler) => return Ok(handler),
                Err(e) => attempts.push(e.to_string()),
            }
        }
        Err(tasker_core::Error::UnknownTaskType {
            description: description.clone(),
            attempts,
        })
    }
}

impl ExtensionProvider for ExtensionManager {
    fn extension(&self, identifier: &str) -> Result<Extension> {
        if let Some(outcome) = self.cache.borrow().get(identifier) {
            debug!(extension = identifier, "extension cache hit");
            return outcome.clone();
        }

        let mut attempts = Vec::new();
        let mut outcome = None;
        for provider in &self.extension_providers {
            match provider.extension(identifier) {
                Ok(extension) => {
                    outcome = Some(Ok(extension));
                    break;
                }
                Err(e) => attempts.push(e.to_string()),
            }
        }
        let outcome = outcome.unwrap_or_else(|| {
            Err(Error::UnknownExtension {
                identifier: identifier.to_string(),
                attempts,
            })
        });

        self.cache
            .borrow_mut()
            .insert(identifier.to_string(), outcome.clone());
        outcome
    }
}
