//! Deployment report
//!
//! Every planned step produces exactly one [`HookOutcome`]; [`summarize`] folds
//! them into a [`DeploymentResult`] with the process exit code.

use serde::Serialize;

/// Exit code of a run where every hook succeeded
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code of a run where any hook failed
pub const EXIT_FAILURE: i32 = 1;

/// Result of applying one plan entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    /// Newly placed
    Installed,
    /// Replaced a previous deployment
    Overwritten,
    /// Already correct, nothing touched
    Unchanged,
    /// Target occupied by a foreign hook, left untouched
    Conflict,
    /// Explicitly requested hook without a source script
    SourceMissing,
    /// Filesystem error while installing
    Failed,
    /// `git config core.hooksPath` failed
    CommandFailed,
}

impl OutcomeStatus {
    /// Whether this outcome counts as success for the exit code
    pub fn is_success(self) -> bool {
        matches!(self, Self::Installed | Self::Overwritten | Self::Unchanged)
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Overwritten => "overwritten",
            Self::Unchanged => "unchanged",
            Self::Conflict => "conflict",
            Self::SourceMissing => "source missing",
            Self::Failed => "failed",
            Self::CommandFailed => "command failed",
        }
    }
}

/// Outcome for one hook, or for `core.hooksPath`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookOutcome {
    /// Hook name, or `core.hooksPath` for the hooks-path strategy
    pub hook_name: String,
    /// What happened
    pub status: OutcomeStatus,
    /// Detail, such as the conflict reason or the underlying error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HookOutcome {
    /// Outcome without a message
    pub fn new(hook_name: impl Into<String>, status: OutcomeStatus) -> Self {
        Self {
            hook_name: hook_name.into(),
            status,
            message: None,
        }
    }

    /// Attach a detail message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// The full report of one deployment run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentResult {
    /// `0` when every outcome succeeded, `1` otherwise
    pub exit_code: i32,
    /// One outcome per planned step, in planning order
    pub per_hook: Vec<HookOutcome>,
}

impl DeploymentResult {
    /// Whether every outcome succeeded
    pub fn is_success(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }

    /// Outcomes that did not succeed
    pub fn failures(&self) -> impl Iterator<Item = &HookOutcome> {
        self.per_hook.iter().filter(|o| !o.status.is_success())
    }

    /// Number of outcomes with the given status
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.per_hook.iter().filter(|o| o.status == status).count()
    }
}

/// Fold outcomes into a result, keeping their order
pub fn summarize(outcomes: Vec<HookOutcome>) -> DeploymentResult {
    let exit_code = if outcomes.iter().all(|o| o.status.is_success()) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    };

    DeploymentResult {
        exit_code,
        per_hook: outcomes,
    }
}
