//! Project manifest loading
//!
//! gouzi reads its options from the "extra" section of the project's manifest.
//! Two manifest formats are understood:
//!
//! - `composer.json`: the section is `extra.<name>`, keyed by the manifest's own
//!   `name` field:
//!
//!   ```json
//!   {
//!       "name": "acme/website",
//!       "extra": {
//!           "acme/website": { "core-hooks-path": ".git-hooks" }
//!       }
//!   }
//!   ```
//!
//! - `Cargo.toml`: the section is Cargo's tool metadata table
//!   `[package.metadata.gouzi]`.
//!
//! A manifest without the section yields an empty [`OptionLayer`].

use crate::options::OptionLayer;
use gouzi_core::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file names probed, in order, when none is given explicitly
pub const MANIFEST_CANDIDATES: &[&str] = &["composer.json", "Cargo.toml"];

/// Metadata table name used in `Cargo.toml`
const CARGO_METADATA_KEY: &str = "gouzi";

/// Supported manifest formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `composer.json` style JSON manifest
    Composer,
    /// `Cargo.toml` style TOML manifest
    Cargo,
}

impl ManifestFormat {
    /// Infer the format from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Some(Self::Composer),
            Some("toml") => Some(Self::Cargo),
            _ => None,
        }
    }
}

/// A loaded manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Where the manifest was read from
    pub path: PathBuf,
    /// Manifest format
    pub format: ManifestFormat,
    /// The package's own name, if declared
    pub package_name: Option<String>,
    /// The gouzi section, empty when absent
    pub options: OptionLayer,
}

#[derive(Deserialize)]
struct ComposerManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct CargoManifest {
    #[serde(default)]
    package: Option<CargoPackage>,
}

#[derive(Deserialize)]
struct CargoPackage {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata: Option<toml::Table>,
}

impl Manifest {
    /// Load a manifest, inferring its format from the extension
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` if the file cannot be read, has an unsupported
    /// extension, or the gouzi section does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ManifestFormat::from_path(path).ok_or_else(|| Error::Manifest {
            path: path.to_path_buf(),
            message: "unsupported manifest format (expected .json or .toml)".to_string(),
        })?;

        let content = fs::read_to_string(path).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match format {
            ManifestFormat::Composer => Self::from_json_str(&content, path),
            ManifestFormat::Cargo => Self::from_toml_str(&content, path),
        }
    }

    /// Find and load the first manifest present in `dir`
    ///
    /// Returns `Ok(None)` when the directory has no manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest exists but cannot be loaded.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        for candidate in MANIFEST_CANDIDATES {
            let path = dir.join(candidate);
            if path.is_file() {
                tracing::debug!("Using manifest {}", path.display());
                return Self::load(&path).map(Some);
            }
        }
        tracing::debug!("No manifest found in {}", dir.display());
        Ok(None)
    }

    /// Parse a `composer.json` style manifest
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` on malformed JSON or an invalid gouzi section.
    pub fn from_json_str(content: &str, path: &Path) -> Result<Self> {
        let manifest: ComposerManifest =
            serde_json::from_str(content).map_err(|e| manifest_error(path, &e))?;

        let options = match manifest
            .name
            .as_deref()
            .and_then(|name| manifest.extra.get(name))
        {
            Some(section) => OptionLayer::deserialize(section.clone())
                .map_err(|e| manifest_error(path, &e))?,
            None => OptionLayer::default(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            format: ManifestFormat::Composer,
            package_name: manifest.name,
            options,
        })
    }

    /// Parse a `Cargo.toml` style manifest
    ///
    /// # Errors
    ///
    /// Returns `Error::Manifest` on malformed TOML or an invalid gouzi section.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self> {
        let manifest: CargoManifest =
            toml::from_str(content).map_err(|e| manifest_error(path, &e))?;

        let (package_name, section) = match manifest.package {
            Some(package) => (
                package.name,
                package
                    .metadata
                    .and_then(|mut metadata| metadata.remove(CARGO_METADATA_KEY)),
            ),
            None => (None, None),
        };

        let options = match section {
            Some(section) => {
                OptionLayer::deserialize(section).map_err(|e| manifest_error(path, &e))?
            }
            None => OptionLayer::default(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            format: ManifestFormat::Cargo,
            package_name,
            options,
        })
    }
}

fn manifest_error(path: &Path, err: &dyn std::fmt::Display) -> Error {
    Error::Manifest {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_composer_section_keyed_by_package_name() {
        let json = r#"{
            "name": "acme/website",
            "extra": {
                "acme/website": { "no-symlink": true, "hooks": ["pre-commit"] },
                "other/tool": { "whatever": 1 }
            }
        }"#;
        let manifest = Manifest::from_json_str(json, Path::new("composer.json")).unwrap();

        assert_eq!(manifest.format, ManifestFormat::Composer);
        assert_eq!(manifest.package_name.as_deref(), Some("acme/website"));
        assert_eq!(manifest.options.no_symlink, Some(true));
        assert_eq!(manifest.options.hooks, Some(vec!["pre-commit".to_string()]));
    }

    #[test]
    fn test_composer_without_section_is_empty() {
        let json = r#"{"name": "acme/website", "require": {}}"#;
        let manifest = Manifest::from_json_str(json, Path::new("composer.json")).unwrap();
        assert!(manifest.options.is_empty());
    }

    #[test]
    fn test_composer_without_name_is_empty() {
        let json = r#"{"extra": {"acme/website": {"symlink": true}}}"#;
        let manifest = Manifest::from_json_str(json, Path::new("composer.json")).unwrap();
        assert!(manifest.package_name.is_none());
        assert!(manifest.options.is_empty());
    }

    #[test]
    fn test_composer_invalid_section_reports_path() {
        let json = r#"{"name": "a/b", "extra": {"a/b": {"symlnk": true}}}"#;
        let err = Manifest::from_json_str(json, Path::new("/p/composer.json")).unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
        assert!(err.to_string().contains("/p/composer.json"));
    }

    #[test]
    fn test_cargo_metadata_table() {
        let toml = r#"
[package]
name = "website"
version = "0.1.0"

[package.metadata.gouzi]
core-hooks-path = ".git-hooks"
"#;
        let manifest = Manifest::from_toml_str(toml, Path::new("Cargo.toml")).unwrap();
        assert_eq!(manifest.format, ManifestFormat::Cargo);
        assert_eq!(manifest.package_name.as_deref(), Some("website"));
        assert_eq!(
            manifest.options.core_hooks_path.as_deref(),
            Some(".git-hooks")
        );
    }

    #[test]
    fn test_cargo_workspace_manifest_is_empty() {
        let toml = "[workspace]\nmembers = [\"crates/*\"]\n";
        let manifest = Manifest::from_toml_str(toml, Path::new("Cargo.toml")).unwrap();
        assert!(manifest.options.is_empty());
        assert!(manifest.package_name.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let err = Manifest::load(Path::new("package.yaml")).unwrap_err();
        assert!(err.to_string().contains("unsupported manifest format"));
    }

    #[test]
    fn test_discover_prefers_composer() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("composer.json"),
            r#"{"name": "a/b", "extra": {"a/b": {"symlink": false}}}"#,
        )
        .unwrap();
        fs::write(
            temp.path().join("Cargo.toml"),
            "[package]\nname = \"b\"\n[package.metadata.gouzi]\nsymlink = true\n",
        )
        .unwrap();

        let manifest = Manifest::discover(temp.path()).unwrap().unwrap();
        assert_eq!(manifest.format, ManifestFormat::Composer);
        assert_eq!(manifest.options.symlink, Some(false));
    }

    #[test]
    fn test_discover_none() {
        let temp = TempDir::new().unwrap();
        assert!(Manifest::discover(temp.path()).unwrap().is_none());
    }
}
