//! # gouzi engine
//!
//! Plans and applies the deployment of Git hook scripts into one repository.
//!
//! - **Catalog**: pairs configured hook names with their source scripts
//! - **Planner**: compares each target with its source and decides what to do
//! - **Installer**: applies the plan, one hook at a time
//! - **Report**: folds outcomes into a result with an exit code
//! - **Ledger**: remembers what gouzi copied, to tell it apart from foreign hooks
//! - **System Abstraction**: filesystem operations abstracted for dry runs and tests

pub mod catalog;
pub mod git;
pub mod hash;
pub mod installer;
pub mod ledger;
pub mod planner;
pub mod report;
pub mod system;

// Re-export path types from core
pub use gouzi_core::path::AbsPath;

// Re-export error types from core
pub use gouzi_core::{Error, Result};

// Re-export commonly used types
pub use git::{GitCommandRunner, Repository};
pub use report::{DeploymentResult, HookOutcome, OutcomeStatus};
pub use system::{DryRunSystem, RealSystem, System};

use gouzi_config::{Configuration, Strategy};
use gouzi_core::CommandRunner;
use installer::Installer;
use ledger::Ledger;
use planner::PlanInputs;

/// Deploy hooks into the repository at `working_dir`
///
/// Runs catalog → plan → install → report. Per-hook problems (conflicts,
/// missing sources, I/O errors, a failing `git config`) are collected in the
/// returned [`DeploymentResult`].
///
/// With `dry_run` set, pass a [`DryRunSystem`]: nothing is written and
/// `core.hooksPath` is left alone, but the result still reports what would
/// have happened.
///
/// # Errors
///
/// Returns `RepositoryNotFound` if `working_dir` is not a Git repository, or
/// an error if the repository config cannot be read. Nothing has been
/// modified when an error is returned.
#[tracing::instrument(skip_all, fields(working_dir = %working_dir, strategy = config.strategy.name()))]
pub fn deploy(
    working_dir: &AbsPath,
    config: &Configuration,
    system: &dyn System,
    runner: &dyn CommandRunner,
    dry_run: bool,
) -> Result<DeploymentResult> {
    let repo = Repository::open(working_dir)?;
    let hooks_dir = repo.hooks_dir();
    let source_dir = config.source_dir_in(working_dir);

    let current_hooks_path = match &config.strategy {
        Strategy::HooksPath(_) => repo.local_hooks_path()?,
        Strategy::Symlink | Strategy::Copy => {
            if let Ok(Some(path)) = repo.effective_hooks_path() {
                tracing::warn!(
                    "core.hooksPath is set to '{path}', Git will not run hooks from {hooks_dir}"
                );
            }
            None
        }
    };

    let entries = catalog::list_deployable(config, &source_dir, system);
    tracing::debug!(
        "{} hook(s) to deploy from {}",
        entries.len(),
        source_dir
    );

    let mut ledger = Ledger::load(repo.common_dir(), system);

    let plan = planner::plan(
        &entries,
        &config.strategy,
        &PlanInputs {
            hooks_dir: &hooks_dir,
            current_hooks_path: current_hooks_path.as_deref(),
            ledger: &ledger,
        },
        system,
    );

    let changes = plan
        .iter()
        .filter(|entry| entry.action().is_mutation())
        .count();
    tracing::debug!("{changes} of {} planned entries change something", plan.len());

    let outcomes = {
        let mut installer = Installer::new(
            working_dir,
            &hooks_dir,
            system,
            runner,
            &mut ledger,
            dry_run,
        );
        plan.iter()
            .map(|entry| installer.apply(entry))
            .collect::<Vec<_>>()
    };

    // A stale ledger only makes the next run stricter
    if let Err(e) = ledger.save(system) {
        tracing::warn!("Failed to save ledger {}: {e}", ledger.path());
    }

    Ok(report::summarize(outcomes))
}
