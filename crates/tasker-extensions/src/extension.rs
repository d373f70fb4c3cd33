//! Runtime extension objects and their builder.
//!
//! An [`Extension`] is the in-memory form of a loaded module: a named
//! bundle of specific providers (claiming exact command names or task
//! types), general fallback providers, and nested extension providers.
//! It is built once through an [`ExtensionBuilder`] while a module's
//! declarations are imported and is immutable afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use tasker_core::provider::{
    Command, CommandProvider, SingleCommandProvider, SingleTaskHandlerProvider, TaskHandler,
    TaskHandlerProvider,
};

use crate::error::Result;

/// Resolves extension identifiers to loaded extensions.
pub trait ExtensionProvider {
    fn extension(&self, identifier: &str) -> Result<Extension>;
}

/// A loaded extension: a named bundle of providers.
#[derive(Clone)]
pub struct Extension {
    name: String,
    specific_commands: HashMap<String, Arc<dyn CommandProvider>>,
    specific_task_handlers: HashMap<String, Arc<dyn TaskHandlerProvider>>,
    general_command_providers: Vec<Arc<dyn CommandProvider>>,
    general_task_handler_providers: Vec<Arc<dyn TaskHandlerProvider>>,
    extension_providers: Vec<Arc<dyn ExtensionProvider>>,
}

impl Extension {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Command providers claiming exact command names.
    pub fn specific_commands(&self) -> &HashMap<String, Arc<dyn CommandProvider>> {
        &self.specific_commands
    }

    /// Task-handler providers claiming exact task types.
    pub fn specific_task_handlers(&self) -> &HashMap<String, Arc<dyn TaskHandlerProvider>> {
        &self.specific_task_handlers
    }

    /// Fallback command providers, in declaration order.
    pub fn general_command_providers(&self) -> &[Arc<dyn CommandProvider>] {
        &self.general_command_providers
    }

    /// Fallback task-handler providers, in declaration order.
    pub fn general_task_handler_providers(&self) -> &[Arc<dyn TaskHandlerProvider>] {
        &self.general_task_handler_providers
    }

    /// Nested extension providers, in declaration order.
    pub fn extension_providers(&self) -> &[Arc<dyn ExtensionProvider>] {
        &self.extension_providers
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.name)
            .field(
                "specific_commands",
                &self.specific_commands.keys().collect::<Vec<_>>(),
            )
            .field(
                "specific_task_handlers",
                &self.specific_task_handlers.keys().collect::<Vec<_>>(),
            )
            .field(
                "general_command_providers",
                &self.general_command_providers.len(),
            )
            .field(
                "general_task_handler_providers",
                &self.general_task_handler_providers.len(),
            )
            .field("extension_providers", &self.extension_providers.len())
            .finish()
    }
}

/// Mutable accumulator used while importing a module's declarations.
pub struct ExtensionBuilder {
    name: String,
    specific_commands: HashMap<String, Arc<dyn CommandProvider>>,
    specific_task_handlers: HashMap<String, Arc<dyn TaskHandlerProvider>>,
    general_command_providers: Vec<Arc<dyn CommandProvider>>,
    general_task_handler_providers: Vec<Arc<dyn TaskHandlerProvider>>,
    extension_providers: Vec<Arc<dyn ExtensionProvider>>,
}

impl ExtensionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specific_commands: HashMap::new(),
            specific_task_handlers: HashMap::new(),
            general_command_providers: Vec::new(),
            general_task_handler_providers: Vec::new(),
            extension_providers: Vec::new(),
        }
    }

    /// Register a single command as a specific provider under the
    /// command's own name.
    pub fn add_command(&mut self, command: Arc<dyn Command>) -> &mut Self {
        let name = command.name().to_string();
        self.specific_commands
            .insert(name, Arc::new(SingleCommandProvider::new(command)));
        self
    }

    /// Register a single task handler as a specific provider under the
    /// handler's task type.
    pub fn add_task_handler(&mut self, handler: Arc<dyn TaskHandler>) -> &mut Self {
        let task_type = handler.task_type().to_string();
        self.specific_task_handlers
            .insert(task_type, Arc::new(SingleTaskHandlerProvider::new(handler)));
        self
    }

    /// Register a provider claiming one exact command name.
    pub fn add_specific_command_provider(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn CommandProvider>,
    ) -> &mut Self {
        self.specific_commands.insert(name.into(), provider);
        self
    }

    /// Register a provider claiming one exact task type.
    pub fn add_specific_task_handler_provider(
        &mut self,
        task_type: impl Into<String>,
        provider: Arc<dyn TaskHandlerProvider>,
    ) -> &mut Self {
        self.specific_task_handlers.insert(task_type.into(), provider);
        self
    }

    /// Register a fallback command provider.
    pub fn add_command_provider(&mut self, provider: Arc<dyn CommandProvider>) -> &mut Self {
        self.general_command_providers.push(provider);
        self
    }

    /// Register a fallback task-handler provider.
    pub fn add_task_handler_provider(
        &mut self,
        provider: Arc<dyn TaskHandlerProvider>,
    ) -> &mut Self {
        self.general_task_handler_providers.push(provider);
        self
    }

    /// Register a nested extension provider.
    pub fn add_extension_provider(&mut self, provider: Arc<dyn ExtensionProvider>) -> &mut Self {
        self.extension_providers.push(provider);
        self
    }

    /// Freeze the accumulated declarations into an extension.
    pub fn build(self) -> Extension {
        Extension {
            name: self.name,
            specific_commands: self.specific_commands,
            specific_task_handlers: self.specific_task_handlers,
            general_command_providers: self.general_command_providers,
            general_task_handler_providers: self.general_task_handler_providers,
            extension_providers: self.extension_providers,
        }
    }
}
