//! Extension system for tasker.
//!
//! This crate provides the runtime extension objects, the durable
//! [`ExtensionManifest`], the resolving [`ExtensionManager`], and the
//! [`ExtensionRegistry`] of module entry points.
//!
//! Extensions supply everything the engine can do: commands the CLI can
//! invoke, handlers for task types, and providers for further extensions.
//! The manager composes them with specific-first resolution: an
//! extension that claims an exact command name or task type always wins
//! over the general fallback chain.

pub mod error;
pub mod extension;
pub mod manager;
pub mod manifest;
pub mod path;
pub mod registry;

/// The canonical filename for the durable extension manifest.
pub const MANIFEST_FILENAME: &str = "extensions.toml";

pub use error::{Error, Result};
pub use extension::{Extension, ExtensionBuilder, ExtensionProvider};
pub use manager::ExtensionManager;
pub use manifest::{ExtensionManifest, ManagementScheme};
pub use path::ExtensionPath;
pub use registry::{ExtensionEntryPoint, ExtensionRegistry};
