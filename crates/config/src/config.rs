//! Resolved configuration
//!
//! [`resolve`] merges the three option layers into one [`Configuration`]:
//!
//! 1. built-in defaults (`OptionLayer::defaults()`)
//! 2. the manifest extra section
//! 3. options passed by the caller (command line)
//!
//! Later layers win field by field. The deployment strategy counts as a single
//! field: whichever highest layer mentions `symlink`, `no-symlink` or
//! `core-hooks-path` decides it as a whole. Every layer is validated, including
//! the ones that end up overridden.

use crate::options::OptionLayer;
use gouzi_core::{AbsPath, Error, HookName, Result};
use indexmap::IndexSet;
use serde::Serialize;
use std::path::PathBuf;

/// Default directory holding the hook scripts, relative to the working directory
pub const DEFAULT_SOURCE_DIR: &str = ".git-hooks";

/// How hooks end up where Git looks for them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Strategy {
    /// Symlink each hook from the hooks directory to its source script
    Symlink,
    /// Copy each source script into the hooks directory
    Copy,
    /// Set `core.hooksPath` to the given value
    HooksPath(String),
}

impl Strategy {
    /// Short name used in logs and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Symlink => "symlink",
            Self::Copy => "copy",
            Self::HooksPath(_) => "core.hooksPath",
        }
    }
}

/// Which hooks a run manages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "hooks", rename_all = "kebab-case")]
pub enum HookSelection {
    /// Every recognized hook that has a source script
    All,
    /// Exactly these hooks; a missing source script is reported
    Explicit(Vec<HookName>),
}

/// Normalized configuration for one deployment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Directory with one script per hook, possibly relative to the working directory
    pub source_dir: PathBuf,
    /// Deployment strategy
    pub strategy: Strategy,
    /// Managed hooks
    pub hooks: HookSelection,
}

impl Configuration {
    /// The hook names to plan, in order
    pub fn hook_names(&self) -> Vec<HookName> {
        match &self.hooks {
            HookSelection::All => HookName::all().collect(),
            HookSelection::Explicit(names) => names.clone(),
        }
    }

    /// Whether the hook list was restricted explicitly
    pub fn is_explicit(&self) -> bool {
        matches!(self.hooks, HookSelection::Explicit(_))
    }

    /// The source directory resolved against `working_dir`
    pub fn source_dir_in(&self, working_dir: &AbsPath) -> AbsPath {
        working_dir.resolve(&self.source_dir)
    }
}

/// Merge option layers into a [`Configuration`]
///
/// Pure: nothing is read from disk and nothing is mutated.
///
/// # Errors
///
/// Returns `ConfigInvalid` when any layer is contradictory (see
/// [`OptionLayer::strategy`]), names a hook outside the catalog, or sets an empty
/// source directory.
///
/// # Examples
///
/// ```
/// use gouzi_config::{OptionLayer, Strategy, resolve};
///
/// # fn main() -> gouzi_config::Result<()> {
/// let manifest = OptionLayer { no_symlink: Some(true), ..OptionLayer::default() };
/// let config = resolve(&OptionLayer::defaults(), &manifest, &OptionLayer::default())?;
/// assert_eq!(config.strategy, Strategy::Copy);
/// # Ok(())
/// # }
/// ```
pub fn resolve(
    defaults: &OptionLayer,
    manifest: &OptionLayer,
    caller: &OptionLayer,
) -> Result<Configuration> {
    let layers = [
        ("defaults", defaults),
        ("manifest", manifest),
        ("command line", caller),
    ];

    let mut strategy = None;
    let mut hooks = None;
    let mut source_dir = None;

    for (origin, layer) in layers {
        if let Some(choice) = layer.strategy(origin)? {
            strategy = Some(choice);
        }
        if let Some(names) = &layer.hooks {
            hooks = Some(parse_hook_names(origin, names)?);
        }
        if let Some(dir) = &layer.source_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::ConfigInvalid(format!(
                    "{origin}: 'source-dir' must not be empty"
                )));
            }
            source_dir = Some(dir.clone());
        }
    }

    let config = Configuration {
        source_dir: source_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE_DIR)),
        strategy: strategy.unwrap_or(Strategy::Symlink),
        hooks: hooks.map_or(HookSelection::All, HookSelection::Explicit),
    };

    tracing::debug!(
        strategy = config.strategy.name(),
        source_dir = %config.source_dir.display(),
        explicit = config.is_explicit(),
        "Resolved configuration"
    );

    Ok(config)
}

/// Validate and de-duplicate an explicit hook list, keeping first occurrences
fn parse_hook_names(origin: &str, names: &[String]) -> Result<Vec<HookName>> {
    let mut parsed = IndexSet::with_capacity(names.len());
    for name in names {
        let hook = HookName::lookup(name).ok_or_else(|| {
            Error::ConfigInvalid(format!("{origin}: '{name}' is not a recognized git hook"))
        })?;
        parsed.insert(hook);
    }
    Ok(parsed.into_iter().collect())
}
