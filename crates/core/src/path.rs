//! Absolute path newtype
//!
//! Every location gouzi mutates (hook targets, the hooks directory, the ledger)
//! is carried as an [`AbsPath`], so relative paths are resolved exactly once,
//! against the working directory of the run, and never against the process
//! current directory by accident.
//!
//! # Examples
//!
//! ```
//! use gouzi_core::path::AbsPath;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = AbsPath::new("/work/project".into())?;
//! let hooks = repo.join(".git/hooks");
//! assert_eq!(hooks.as_path().to_str().unwrap(), "/work/project/.git/hooks");
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An absolute path on the filesystem
///
/// This type guarantees that the path is absolute (starts with `/` on Unix or a drive letter on Windows).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsPath(PathBuf);

impl AbsPath {
    /// Create a new `AbsPath` from a `PathBuf`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use gouzi_core::path::AbsPath;
    ///
    /// assert!(AbsPath::new("/srv/repo".into()).is_ok());
    /// assert!(AbsPath::new("relative/path".into()).is_err());
    /// ```
    pub fn new(path: PathBuf) -> Result<Self> {
        if path.is_absolute() {
            Ok(AbsPath(path))
        } else {
            Err(Error::PathNotAbsolute { path })
        }
    }

    /// Create a new `AbsPath` from a reference to a `Path`
    ///
    /// # Errors
    ///
    /// Returns an error if the path is not absolute.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::new(path.to_path_buf())
    }

    /// Resolve `path` against this directory
    ///
    /// Absolute inputs are returned unchanged; relative inputs are joined onto `self`.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> Self {
        if path.is_absolute() {
            AbsPath(path.to_path_buf())
        } else {
            self.join(path)
        }
    }

    /// Get the underlying `Path`
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Convert to a `PathBuf`
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Join a path component
    ///
    /// The base is absolute, so the result is always absolute as well.
    #[must_use]
    pub fn join(&self, component: impl AsRef<Path>) -> Self {
        AbsPath(self.0.join(component))
    }

    /// Get the parent directory
    ///
    /// Returns `None` if this is the root directory.
    pub fn parent(&self) -> Option<Self> {
        self.0.parent().map(|p| AbsPath(p.to_path_buf()))
    }

    /// Get the file name
    pub fn file_name(&self) -> Option<&str> {
        self.0.file_name().and_then(|s| s.to_str())
    }
}

impl AsRef<Path> for AbsPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for AbsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_resolve_relative_joins_base() {
        let base = AbsPath::new("/work/project".into()).unwrap();
        let resolved = base.resolve(Path::new(".git-hooks"));
        assert_eq!(resolved.as_path(), Path::new("/work/project/.git-hooks"));
    }

    #[test]
    fn test_resolve_absolute_is_unchanged() {
        let base = AbsPath::new("/work/project".into()).unwrap();
        let resolved = base.resolve(Path::new("/opt/hooks"));
        assert_eq!(resolved.as_path(), Path::new("/opt/hooks"));
    }

    #[test]
    fn test_parent_and_file_name() {
        let path = AbsPath::new("/repo/.git/hooks/pre-push".into()).unwrap();
        assert_eq!(path.file_name(), Some("pre-push"));
        assert_eq!(
            path.parent().unwrap().as_path(),
            Path::new("/repo/.git/hooks")
        );
    }

    #[test]
    fn test_display() {
        let path = AbsPath::new("/repo".into()).unwrap();
        assert_eq!(path.to_string(), "/repo");
    }
}
