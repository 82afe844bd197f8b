//! Hook catalog
//!
//! Pairs each configured hook name with its source script. Under the default
//! (unrestricted) list, hooks without a script are simply not deployed; when
//! the list is explicit, a missing script is something the caller must hear
//! about.

use crate::system::System;
use gouzi_config::Configuration;
use gouzi_core::HookName;
use gouzi_core::path::AbsPath;

/// Whether a hook's source script exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// The script exists and is a regular file
    Present,
    /// No script for this hook
    Missing,
}

/// A hook paired with the location of its source script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Hook name
    pub hook: HookName,
    /// `<source-dir>/<hook>`
    pub source: AbsPath,
    /// Whether `source` exists
    pub status: SourceStatus,
}

/// List the hooks a run should deploy, in configuration order
///
/// `source_dir` is the configuration's source directory, already resolved
/// against the working directory.
pub fn list_deployable(
    config: &Configuration,
    source_dir: &AbsPath,
    system: &dyn System,
) -> Vec<CatalogEntry> {
    let explicit = config.is_explicit();

    config
        .hook_names()
        .into_iter()
        .map(|hook| entry(hook, source_dir, system))
        .filter(|entry| {
            let keep = explicit || entry.status == SourceStatus::Present;
            if !keep {
                tracing::trace!("No source script for {}, skipping", entry.hook);
            }
            keep
        })
        .collect()
}

/// Describe every recognized hook, present or not, in catalog order
pub fn survey(source_dir: &AbsPath, system: &dyn System) -> Vec<CatalogEntry> {
    HookName::all()
        .map(|hook| entry(hook, source_dir, system))
        .collect()
}

fn entry(hook: HookName, source_dir: &AbsPath, system: &dyn System) -> CatalogEntry {
    let source = source_dir.join(hook.as_str());
    let status = if system.is_file(&source) {
        SourceStatus::Present
    } else {
        SourceStatus::Missing
    };
    CatalogEntry {
        hook,
        source,
        status,
    }
}
