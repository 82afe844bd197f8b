//! Hook installation
//!
//! Applies plan entries one at a time. Replacing a hook is a remove followed by
//! a create; a crash between the two leaves the hook absent, and the next run
//! installs it again.
//!
//! Errors never escape [`Installer::apply`]: each one becomes the outcome of the
//! hook it belongs to, so the remaining hooks are still processed.

use crate::git::HOOKS_PATH_KEY;
use crate::ledger::Ledger;
use crate::planner::{
    HookPlanEntry, HooksPathPlanEntry, LinkMethod, PlanAction, PlanEntry, PlanFailure,
};
use crate::report::{HookOutcome, OutcomeStatus};
use crate::system::System;
use gouzi_core::path::AbsPath;
use gouzi_core::{CommandRunner, Error, Result};

/// Permissions of a copied hook
pub const HOOK_MODE: u32 = 0o755;

/// Applies plan entries against one repository
pub struct Installer<'a> {
    working_dir: &'a AbsPath,
    hooks_dir: &'a AbsPath,
    system: &'a dyn System,
    runner: &'a dyn CommandRunner,
    ledger: &'a mut Ledger,
    dry_run: bool,
    hooks_dir_ready: bool,
}

impl<'a> Installer<'a> {
    /// Create an installer
    ///
    /// With `dry_run` set, `core.hooksPath` is never changed; filesystem
    /// mutations go wherever `system` sends them.
    pub fn new(
        working_dir: &'a AbsPath,
        hooks_dir: &'a AbsPath,
        system: &'a dyn System,
        runner: &'a dyn CommandRunner,
        ledger: &'a mut Ledger,
        dry_run: bool,
    ) -> Self {
        Self {
            working_dir,
            hooks_dir,
            system,
            runner,
            ledger,
            dry_run,
            hooks_dir_ready: false,
        }
    }

    /// Apply one plan entry
    pub fn apply(&mut self, entry: &PlanEntry) -> HookOutcome {
        match entry {
            PlanEntry::Hook(entry) => self.apply_hook(entry),
            PlanEntry::HooksPath(entry) => self.apply_hooks_path(entry),
        }
    }

    #[tracing::instrument(skip_all, fields(hook = %entry.hook))]
    fn apply_hook(&mut self, entry: &HookPlanEntry) -> HookOutcome {
        let name = entry.hook.as_str();

        let status = match &entry.action {
            PlanAction::Skip => {
                tracing::debug!("Already up to date");
                return HookOutcome::new(name, OutcomeStatus::Unchanged);
            }
            PlanAction::Fail(PlanFailure::SourceMissing) => {
                let err = Error::SourceMissing {
                    hook: name.to_string(),
                    path: entry.source.clone(),
                };
                tracing::warn!("{err}");
                return HookOutcome::new(name, OutcomeStatus::SourceMissing)
                    .with_message(err.to_string());
            }
            PlanAction::Fail(PlanFailure::Conflict(reason)) => {
                let err = Error::HookConflict {
                    hook: name.to_string(),
                    path: entry.target.clone(),
                    reason: reason.clone(),
                };
                tracing::warn!("{err}");
                return HookOutcome::new(name, OutcomeStatus::Conflict)
                    .with_message(err.to_string());
            }
            PlanAction::Install => OutcomeStatus::Installed,
            PlanAction::Overwrite => OutcomeStatus::Overwritten,
        };

        let replace = entry.action == PlanAction::Overwrite;
        let result = match entry.method {
            LinkMethod::Symlink => self.link(entry, replace),
            LinkMethod::Copy => self.copy(entry, replace),
        };

        match result {
            Ok(()) => {
                tracing::info!("{} {}", status.label(), entry.target);
                HookOutcome::new(name, status)
            }
            Err(e) => {
                tracing::warn!("Failed to deploy {name}: {e}");
                HookOutcome::new(name, OutcomeStatus::Failed).with_message(e.to_string())
            }
        }
    }

    fn link(&mut self, entry: &HookPlanEntry, replace: bool) -> Result<()> {
        self.ensure_hooks_dir()?;
        if replace {
            self.system.remove(&entry.target)?;
        }
        self.system.symlink(entry.source.as_path(), &entry.target)?;
        self.ledger.forget(entry.hook);
        Ok(())
    }

    fn copy(&mut self, entry: &HookPlanEntry, replace: bool) -> Result<()> {
        // Read first so a bad source never leaves the hook removed
        let content = self.system.read_file(&entry.source)?;

        self.ensure_hooks_dir()?;
        if replace {
            self.system.remove(&entry.target)?;
        }
        self.system
            .write_file(&entry.target, &content, Some(HOOK_MODE))?;
        self.ledger.record(entry.hook, &content);
        Ok(())
    }

    fn ensure_hooks_dir(&mut self) -> Result<()> {
        if self.hooks_dir_ready {
            return Ok(());
        }
        if self.system.symlink_metadata(self.hooks_dir)?.is_none() {
            tracing::debug!("Creating hooks directory {}", self.hooks_dir);
            self.system.create_dir_all(self.hooks_dir)?;
        }
        self.hooks_dir_ready = true;
        Ok(())
    }

    #[tracing::instrument(skip_all, fields(value = %entry.value))]
    fn apply_hooks_path(&mut self, entry: &HooksPathPlanEntry) -> HookOutcome {
        let status = match &entry.action {
            PlanAction::Install => OutcomeStatus::Installed,
            PlanAction::Overwrite => OutcomeStatus::Overwritten,
            PlanAction::Skip => {
                tracing::debug!("{HOOKS_PATH_KEY} already set");
                return HookOutcome::new(HOOKS_PATH_KEY, OutcomeStatus::Unchanged);
            }
            // Never planned for hooks path; report rather than guess
            PlanAction::Fail(PlanFailure::Conflict(reason)) => {
                return HookOutcome::new(HOOKS_PATH_KEY, OutcomeStatus::Conflict)
                    .with_message(reason.clone());
            }
            PlanAction::Fail(PlanFailure::SourceMissing) => {
                return HookOutcome::new(HOOKS_PATH_KEY, OutcomeStatus::SourceMissing);
            }
        };

        let argv = ["git", "config", HOOKS_PATH_KEY, entry.value.as_str()];

        if self.dry_run {
            tracing::info!("Dry run: would run `{}`", argv.join(" "));
            return HookOutcome::new(HOOKS_PATH_KEY, status)
                .with_message(format!("would run `{}`", argv.join(" ")));
        }

        match self.runner.run(&argv, self.working_dir.as_path()) {
            Ok(_) => {
                tracing::info!("Set {HOOKS_PATH_KEY} to {}", entry.value);
                HookOutcome::new(HOOKS_PATH_KEY, status)
            }
            Err(e) => {
                tracing::warn!("{e}");
                HookOutcome::new(HOOKS_PATH_KEY, OutcomeStatus::CommandFailed)
                    .with_message(e.to_string())
            }
        }
    }
}
