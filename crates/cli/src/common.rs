//! Common utilities and types shared across CLI commands

use crate::error::{CommandError, Result};
use anyhow::Context;
use gouzi_config::{Manifest, OptionLayer};
use gouzi_core::path::AbsPath;
use std::fs;
use std::path::{Path, PathBuf};

/// State shared by every command of one run
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    working_dir: AbsPath,
}

impl RuntimeContext {
    /// Resolve the working directory given with `-C`, or the current directory
    ///
    /// The path is canonicalized, so everything derived from it is absolute.
    ///
    /// # Errors
    ///
    /// Returns `InvalidWorkingDir` if the directory does not exist.
    pub fn resolve(working_dir: Option<&Path>) -> Result<Self> {
        let path = match working_dir {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().map_err(|source| {
                CommandError::InvalidWorkingDir {
                    path: PathBuf::from("."),
                    source,
                }
            })?,
        };

        let canonical = fs::canonicalize(&path)
            .map_err(|source| CommandError::InvalidWorkingDir { path, source })?;

        Ok(Self {
            working_dir: AbsPath::new(canonical)?,
        })
    }

    /// The repository root of this run
    pub fn working_dir(&self) -> &AbsPath {
        &self.working_dir
    }

    /// Load the manifest option layer
    ///
    /// `manifest` is resolved against the working directory. Without it, the
    /// working directory is searched; no manifest at all yields an empty layer.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest exists but cannot be parsed.
    pub fn manifest_layer(&self, manifest: Option<&Path>) -> Result<OptionLayer> {
        let manifest = match manifest {
            Some(path) => {
                let path = self.working_dir.resolve(path);
                Some(
                    Manifest::load(path.as_path())
                        .with_context(|| format!("Failed to load manifest {path}"))?,
                )
            }
            None => Manifest::discover(self.working_dir.as_path())
                .context("Failed to load project manifest")?,
        };

        Ok(manifest.map(|m| m.options).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_missing_dir() {
        let err = RuntimeContext::resolve(Some(Path::new("/definitely/not/here"))).unwrap_err();
        assert!(matches!(err, CommandError::InvalidWorkingDir { .. }));
    }

    #[test]
    fn test_resolve_is_absolute() {
        let temp = TempDir::new().unwrap();
        let context = RuntimeContext::resolve(Some(temp.path())).unwrap();
        assert!(context.working_dir().as_path().is_absolute());
    }

    #[test]
    fn test_manifest_layer_empty_without_manifest() {
        let temp = TempDir::new().unwrap();
        let context = RuntimeContext::resolve(Some(temp.path())).unwrap();
        assert!(context.manifest_layer(None).unwrap().is_empty());
    }

    #[test]
    fn test_manifest_layer_explicit_relative_path() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("build")).unwrap();
        fs::write(
            temp.path().join("build/composer.json"),
            r#"{"name": "a/b", "extra": {"a/b": {"no-symlink": true}}}"#,
        )
        .unwrap();

        let context = RuntimeContext::resolve(Some(temp.path())).unwrap();
        let layer = context
            .manifest_layer(Some(Path::new("build/composer.json")))
            .unwrap();
        assert_eq!(layer.no_symlink, Some(true));
    }

    #[test]
    fn test_manifest_layer_explicit_missing_file() {
        let temp = TempDir::new().unwrap();
        let context = RuntimeContext::resolve(Some(temp.path())).unwrap();
        assert!(
            context
                .manifest_layer(Some(Path::new("composer.json")))
                .is_err()
        );
    }
}
