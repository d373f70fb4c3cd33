//! Identity types for projects and tasks.
//!
//! A [`ProjectIdentifier`] is the canonical absolute path of a project
//! file; a [`TaskIdentifier`] pairs a project identifier with a task name.
//! Both compare, hash, and order structurally, so differently-spelled
//! paths to the same file collapse to one identity and one cache entry.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifies a project file by its canonical absolute path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectIdentifier {
    path: PathBuf,
}

impl ProjectIdentifier {
    /// Resolve a path string to a project identifier, optionally against a
    /// base directory.
    ///
    /// When the file exists the path is fully canonicalized (symlinks
    /// resolved); otherwise it is absolutized and normalized lexically so
    /// an identifier can be formed before the file is checked for
    /// existence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for empty or malformed paths and
    /// [`Error::AccessDenied`] when the filesystem refuses to resolve the
    /// location.
    pub fn resolve(path: &str, base: Option<&Path>) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "paths cannot be empty".to_string(),
            });
        }
        if path.contains('\0') {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason: "paths cannot contain NUL bytes".to_string(),
            });
        }

        let joined = match base {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        };
        let absolute = if joined.is_absolute() {
            joined
        } else {
            let cwd = std::env::current_dir().map_err(|e| Error::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
            cwd.join(joined)
        };

        match dunce::canonicalize(&absolute) {
            Ok(canonical) => Ok(Self { path: canonical }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self {
                path: normalize(&absolute),
            }),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(Error::AccessDenied {
                path: path.to_string(),
            }),
            Err(e) => Err(Error::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// The canonical path of the project file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory containing the project file. Relative dependency
    /// paths in task records resolve against this.
    pub fn directory(&self) -> Option<&Path> {
        self.path.parent()
    }
}

impl fmt::Display for ProjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Remove `.` components and resolve `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push("..");
                }
            }
            other => result.push(other.as_os_str()),
        }
    }
    result
}

/// Identifies a task: a project identifier plus a task name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskIdentifier {
    project: ProjectIdentifier,
    name: String,
}

impl TaskIdentifier {
    pub fn new(project: ProjectIdentifier, name: impl Into<String>) -> Self {
        Self {
            project,
            name: name.into(),
        }
    }

    /// Resolve a project path and task name to a task identifier in one
    /// step.
    pub fn resolve(path: &str, base: Option<&Path>, name: &str) -> Result<Self> {
        Ok(Self::new(ProjectIdentifier::resolve(path, base)?, name))
    }

    pub fn project(&self) -> &ProjectIdentifier {
        &self.project
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for TaskIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.project, self.name)
    }
}
