//! Deployment planning
//!
//! Planning only reads. For each catalog entry it inspects the target location
//! in the hooks directory and decides what the installer should do:
//!
//! | Target | Symlink | Copy |
//! |---|---|---|
//! | absent | Install | Install |
//! | the source script itself | Fail | Skip |
//! | symlink to the source | Skip | Overwrite |
//! | symlink elsewhere, or dangling | Overwrite | Overwrite |
//! | file with the source's content | Overwrite | Skip (Overwrite if not executable) |
//! | file matching the ledger | Overwrite | Overwrite |
//! | any other file | Fail | Fail |
//! | directory, socket, ... | Fail | Fail |
//!
//! Only exact matches count as tool-managed, so a hand-written hook is never
//! overwritten.

use crate::catalog::{CatalogEntry, SourceStatus};
use crate::ledger::Ledger;
use crate::system::System;
use gouzi_config::Strategy;
use gouzi_core::HookName;
use gouzi_core::path::AbsPath;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

/// How a single hook is placed in the hooks directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMethod {
    /// Symlink to the source script
    Symlink,
    /// Copy of the source script
    Copy,
}

/// Why a hook cannot be deployed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanFailure {
    /// The target is occupied by something gouzi did not write
    Conflict(String),
    /// The hook was requested explicitly but has no source script
    SourceMissing,
}

/// What the installer should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Nothing there yet
    Install,
    /// Replace a previous deployment
    Overwrite,
    /// Already correct
    Skip,
    /// Leave untouched and report
    Fail(PlanFailure),
}

impl PlanAction {
    /// Whether applying this action mutates anything
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Install | Self::Overwrite)
    }
}

/// Plan for one hook under the symlink or copy strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookPlanEntry {
    /// Hook name
    pub hook: HookName,
    /// Symlink or copy
    pub method: LinkMethod,
    /// Source script
    pub source: AbsPath,
    /// `<hooks-dir>/<hook>`
    pub target: AbsPath,
    /// Planned action
    pub action: PlanAction,
}

/// Plan for pointing `core.hooksPath` at the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksPathPlanEntry {
    /// Value to set
    pub value: String,
    /// Value currently set in the repository config
    pub current: Option<String>,
    /// Planned action
    pub action: PlanAction,
}

/// One step of a deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    /// Place one hook in the hooks directory
    Hook(HookPlanEntry),
    /// Set `core.hooksPath`
    HooksPath(HooksPathPlanEntry),
}

impl PlanEntry {
    /// The planned action
    pub fn action(&self) -> &PlanAction {
        match self {
            Self::Hook(entry) => &entry.action,
            Self::HooksPath(entry) => &entry.action,
        }
    }
}

/// Repository state the planner compares against
#[derive(Debug, Clone, Copy)]
pub struct PlanInputs<'a> {
    /// `<common-dir>/hooks`
    pub hooks_dir: &'a AbsPath,
    /// Repository-local `core.hooksPath`
    pub current_hooks_path: Option<&'a str>,
    /// Digests of previously copied hooks
    pub ledger: &'a Ledger,
}

/// Build the deployment plan
///
/// Under [`Strategy::HooksPath`] the result is a single entry regardless of
/// `entries`; otherwise there is one entry per catalog entry, in order.
#[tracing::instrument(skip_all, fields(strategy = strategy.name(), hooks = entries.len()))]
pub fn plan(
    entries: &[CatalogEntry],
    strategy: &Strategy,
    inputs: &PlanInputs<'_>,
    system: &dyn System,
) -> Vec<PlanEntry> {
    let method = match strategy {
        Strategy::Symlink => LinkMethod::Symlink,
        Strategy::Copy => LinkMethod::Copy,
        Strategy::HooksPath(value) => {
            return vec![PlanEntry::HooksPath(plan_hooks_path(
                value,
                inputs.current_hooks_path,
            ))];
        }
    };

    entries
        .iter()
        .map(|entry| PlanEntry::Hook(plan_hook(entry, method, inputs, system)))
        .collect()
}

fn plan_hooks_path(value: &str, current: Option<&str>) -> HooksPathPlanEntry {
    let action = match current {
        Some(current) if current == value => PlanAction::Skip,
        Some(_) => PlanAction::Overwrite,
        None => PlanAction::Install,
    };
    tracing::debug!(?current, value, ?action, "Planned core.hooksPath");

    HooksPathPlanEntry {
        value: value.to_string(),
        current: current.map(ToString::to_string),
        action,
    }
}

fn plan_hook(
    entry: &CatalogEntry,
    method: LinkMethod,
    inputs: &PlanInputs<'_>,
    system: &dyn System,
) -> HookPlanEntry {
    let target = inputs.hooks_dir.join(entry.hook.as_str());

    let action = if entry.status == SourceStatus::Missing {
        PlanAction::Fail(PlanFailure::SourceMissing)
    } else {
        decide(entry, method, &target, inputs.ledger, system)
    };
    tracing::debug!(hook = %entry.hook, ?method, ?action, "Planned hook");

    HookPlanEntry {
        hook: entry.hook,
        method,
        source: entry.source.clone(),
        target,
        action,
    }
}

fn decide(
    entry: &CatalogEntry,
    method: LinkMethod,
    target: &AbsPath,
    ledger: &Ledger,
    system: &dyn System,
) -> PlanAction {
    let metadata = match system.symlink_metadata(target) {
        Ok(Some(metadata)) => metadata,
        Ok(None) => return PlanAction::Install,
        Err(e) => return conflict(format!("cannot inspect target: {e}")),
    };

    if is_same_entry(target, &entry.source, system) {
        return match method {
            LinkMethod::Copy => PlanAction::Skip,
            LinkMethod::Symlink => conflict("target is the source script".to_string()),
        };
    }

    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        return match (method, points_to(target, &entry.source, system)) {
            (LinkMethod::Symlink, true) => PlanAction::Skip,
            _ => PlanAction::Overwrite,
        };
    }

    if !file_type.is_file() {
        let kind = if file_type.is_dir() {
            "a directory"
        } else {
            "not a regular file"
        };
        return conflict(format!("target is {kind}"));
    }

    let current = match system.read_file(target) {
        Ok(bytes) => bytes,
        Err(e) => return conflict(format!("cannot read target: {e}")),
    };

    // An unreadable source only rules out the content match; the installer
    // reports the read error itself.
    let same_as_source = system
        .read_file(&entry.source)
        .is_ok_and(|source| source == current);

    if same_as_source {
        return match method {
            LinkMethod::Copy if is_executable(&metadata) => PlanAction::Skip,
            _ => PlanAction::Overwrite,
        };
    }

    if ledger.matches(entry.hook, &current) {
        return PlanAction::Overwrite;
    }

    conflict("existing hook was not installed by gouzi".to_string())
}

fn conflict(reason: String) -> PlanAction {
    PlanAction::Fail(PlanFailure::Conflict(reason))
}

/// Whether `target` and `source` are the same directory entry
///
/// Parents are compared after resolving symlinks, which catches a source
/// directory that is, or links to, the hooks directory.
fn is_same_entry(target: &AbsPath, source: &AbsPath, system: &dyn System) -> bool {
    if target.file_name() != source.file_name() {
        return false;
    }
    let (Some(target_dir), Some(source_dir)) = (target.parent(), source.parent()) else {
        return false;
    };
    match (
        system.canonicalize(&target_dir),
        system.canonicalize(&source_dir),
    ) {
        (Ok(target_dir), Ok(source_dir)) => target_dir == source_dir,
        _ => false,
    }
}

/// Whether the symlink at `link` resolves to `source`
///
/// Relative link targets are resolved against the link's directory.
fn points_to(link: &AbsPath, source: &AbsPath, system: &dyn System) -> bool {
    let Ok(destination) = system.read_link(link) else {
        return false;
    };

    let resolved = match link.parent() {
        Some(parent) if destination.is_relative() => parent.as_path().join(destination),
        _ => destination,
    };

    normalize(&resolved) == normalize(source.as_path())
}

/// Lexically remove `.` and `..` components
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(unix)]
fn is_executable(metadata: &Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &Metadata) -> bool {
    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::system::RealSystem;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        source_dir: AbsPath,
        hooks_dir: AbsPath,
        ledger: Ledger,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = AbsPath::from_path(temp.path()).unwrap();
            let source_dir = root.join(".git-hooks");
            let hooks_dir = root.join(".git/hooks");
            fs::create_dir_all(source_dir.as_path()).unwrap();
            fs::create_dir_all(hooks_dir.as_path()).unwrap();
            let ledger = Ledger::empty(&root.join(".git"));
            Self {
                _temp: temp,
                source_dir,
                hooks_dir,
                ledger,
            }
        }

        fn source(&self, hook: &str, content: &str) -> CatalogEntry {
            let source = self.source_dir.join(hook);
            fs::write(source.as_path(), content).unwrap();
            CatalogEntry {
                hook: HookName::lookup(hook).unwrap(),
                source,
                status: SourceStatus::Present,
            }
        }

        fn target(&self, hook: &str) -> AbsPath {
            self.hooks_dir.join(hook)
        }

        fn plan_one(&self, entry: &CatalogEntry, strategy: &Strategy) -> PlanAction {
            let inputs = PlanInputs {
                hooks_dir: &self.hooks_dir,
                current_hooks_path: None,
                ledger: &self.ledger,
            };
            let plan = plan(std::slice::from_ref(entry), strategy, &inputs, &RealSystem);
            assert_eq!(plan.len(), 1);
            plan[0].action().clone()
        }
    }

    #[cfg(unix)]
    fn set_mode(path: &AbsPath, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path.as_path(), fs::Permissions::from_mode(mode)).unwrap();
    }

    fn is_conflict(action: &PlanAction) -> bool {
        matches!(action, PlanAction::Fail(PlanFailure::Conflict(_)))
    }

    #[test]
    fn test_absent_target_installs() {
        let fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\n");
        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Install);
        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Install);
    }

    #[test]
    fn test_missing_source_fails() {
        let fx = Fixture::new();
        let entry = CatalogEntry {
            hook: HookName::lookup("pre-push").unwrap(),
            source: fx.source_dir.join("pre-push"),
            status: SourceStatus::Missing,
        };
        assert_eq!(
            fx.plan_one(&entry, &Strategy::Symlink),
            PlanAction::Fail(PlanFailure::SourceMissing)
        );
    }

    #[test]
    fn test_source_inside_hooks_dir() {
        let fx = Fixture::new();
        let target = fx.target("pre-commit");
        fs::write(target.as_path(), "#!/bin/sh\necho precious\n").unwrap();
        let entry = CatalogEntry {
            hook: HookName::lookup("pre-commit").unwrap(),
            source: target,
            status: SourceStatus::Present,
        };

        assert_eq!(
            fx.plan_one(&entry, &Strategy::Symlink),
            PlanAction::Fail(PlanFailure::Conflict(
                "target is the source script".to_string()
            ))
        );
        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Skip);
    }

    #[cfg(unix)]
    #[test]
    fn test_source_dir_linked_to_hooks_dir() {
        let fx = Fixture::new();
        let linked_dir = fx.hooks_dir.parent().unwrap().join("linked-hooks");
        std::os::unix::fs::symlink(fx.hooks_dir.as_path(), linked_dir.as_path()).unwrap();
        fs::write(fx.target("pre-push").as_path(), "#!/bin/sh\n").unwrap();
        let entry = CatalogEntry {
            hook: HookName::lookup("pre-push").unwrap(),
            source: linked_dir.join("pre-push"),
            status: SourceStatus::Present,
        };

        assert!(is_conflict(&fx.plan_one(&entry, &Strategy::Symlink)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_source() {
        let fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\n");
        std::os::unix::fs::symlink(entry.source.as_path(), fx.target("pre-commit").as_path())
            .unwrap();

        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Skip);
        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Overwrite);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_symlink_to_source_is_recognized() {
        let fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\n");
        std::os::unix::fs::symlink(
            "../../.git-hooks/pre-commit",
            fx.target("pre-commit").as_path(),
        )
        .unwrap();

        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Skip);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_elsewhere_or_dangling_is_overwritten() {
        let fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\n");
        std::os::unix::fs::symlink("/nonexistent/hook", fx.target("pre-commit").as_path())
            .unwrap();

        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Overwrite);
        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Overwrite);
    }

    #[cfg(unix)]
    #[test]
    fn test_identical_executable_copy_is_skipped() {
        let fx = Fixture::new();
        let entry = fx.source("commit-msg", "#!/bin/sh\nexit 0\n");
        let target = fx.target("commit-msg");
        fs::write(target.as_path(), "#!/bin/sh\nexit 0\n").unwrap();
        set_mode(&target, 0o755);

        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Skip);
        // Under symlink the copy is replaced by a link
        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Overwrite);
    }

    #[cfg(unix)]
    #[test]
    fn test_identical_non_executable_copy_is_overwritten() {
        let fx = Fixture::new();
        let entry = fx.source("commit-msg", "#!/bin/sh\nexit 0\n");
        let target = fx.target("commit-msg");
        fs::write(target.as_path(), "#!/bin/sh\nexit 0\n").unwrap();
        set_mode(&target, 0o644);

        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Overwrite);
    }

    #[test]
    fn test_ledger_match_is_overwritten() {
        let mut fx = Fixture::new();
        let entry = fx.source("pre-push", "#!/bin/sh\necho v2\n");
        fs::write(fx.target("pre-push").as_path(), "#!/bin/sh\necho v1\n").unwrap();
        fx.ledger.record(entry.hook, b"#!/bin/sh\necho v1\n");

        assert_eq!(fx.plan_one(&entry, &Strategy::Copy), PlanAction::Overwrite);
        assert_eq!(fx.plan_one(&entry, &Strategy::Symlink), PlanAction::Overwrite);
    }

    #[test]
    fn test_foreign_file_conflicts_under_both_methods() {
        let fx = Fixture::new();
        let entry = fx.source("commit-msg", "#!/bin/sh\nexit 0\n");
        fs::write(fx.target("commit-msg").as_path(), "#!/bin/sh\n# mine\n").unwrap();

        assert!(is_conflict(&fx.plan_one(&entry, &Strategy::Copy)));
        assert!(is_conflict(&fx.plan_one(&entry, &Strategy::Symlink)));
    }

    #[test]
    fn test_edited_copy_conflicts() {
        let mut fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\nexit 0\n");
        fx.ledger.record(entry.hook, b"#!/bin/sh\nexit 0\n");
        fs::write(
            fx.target("pre-commit").as_path(),
            "#!/bin/sh\nexit 0\n# local tweak\n",
        )
        .unwrap();

        assert!(is_conflict(&fx.plan_one(&entry, &Strategy::Copy)));
    }

    #[test]
    fn test_directory_target_conflicts() {
        let fx = Fixture::new();
        let entry = fx.source("pre-commit", "#!/bin/sh\n");
        fs::create_dir(fx.target("pre-commit").as_path()).unwrap();

        match fx.plan_one(&entry, &Strategy::Symlink) {
            PlanAction::Fail(PlanFailure::Conflict(reason)) => {
                assert!(reason.contains("directory"));
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_keeps_entry_order() {
        let fx = Fixture::new();
        let entries = vec![
            fx.source("pre-push", "a"),
            fx.source("applypatch-msg", "b"),
        ];
        let inputs = PlanInputs {
            hooks_dir: &fx.hooks_dir,
            current_hooks_path: None,
            ledger: &fx.ledger,
        };
        let plan = plan(&entries, &Strategy::Copy, &inputs, &RealSystem);
        let hooks: Vec<_> = plan
            .iter()
            .map(|entry| match entry {
                PlanEntry::Hook(entry) => entry.hook.as_str(),
                PlanEntry::HooksPath(_) => panic!("unexpected hooks path entry"),
            })
            .collect();
        assert_eq!(hooks, ["pre-push", "applypatch-msg"]);
    }

    #[test]
    fn test_hooks_path_single_entry() {
        let fx = Fixture::new();
        let entries = vec![fx.source("pre-commit", "a"), fx.source("pre-push", "b")];
        let strategy = Strategy::HooksPath("/custom/hooks".to_string());

        for (current, expected) in [
            (None, PlanAction::Install),
            (Some("/custom/hooks"), PlanAction::Skip),
            (Some(".githooks"), PlanAction::Overwrite),
        ] {
            let inputs = PlanInputs {
                hooks_dir: &fx.hooks_dir,
                current_hooks_path: current,
                ledger: &fx.ledger,
            };
            let plan = plan(&entries, &strategy, &inputs, &RealSystem);
            assert_eq!(plan.len(), 1);
            match &plan[0] {
                PlanEntry::HooksPath(entry) => {
                    assert_eq!(entry.value, "/custom/hooks");
                    assert_eq!(entry.current.as_deref(), current);
                    assert_eq!(entry.action, expected);
                }
                PlanEntry::Hook(_) => panic!("expected a hooks path entry"),
            }
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/r/.git/hooks/../../.git-hooks/./pre-commit")),
            PathBuf::from("/r/.git-hooks/pre-commit")
        );
    }
}
