//! Terminal rendering of deployment reports

use gouzi_engine::system::Operation;
use gouzi_engine::{DeploymentResult, HookOutcome, OutcomeStatus};
use owo_colors::OwoColorize;
use std::fmt::Write as _;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per hook plus a summary
    #[default]
    Simple,
    /// The full report as JSON on stdout
    Json,
}

fn status_marker(status: OutcomeStatus) -> String {
    match status {
        OutcomeStatus::Installed | OutcomeStatus::Overwritten => "●".bright_green().to_string(),
        OutcomeStatus::Unchanged => "●".dimmed().to_string(),
        OutcomeStatus::Conflict | OutcomeStatus::SourceMissing => "●".bright_yellow().to_string(),
        OutcomeStatus::Failed | OutcomeStatus::CommandFailed => "●".bright_red().to_string(),
    }
}

/// Render one outcome line
pub fn format_outcome(outcome: &HookOutcome) -> String {
    let mut line = format!(
        "{} {:<24} {}",
        status_marker(outcome.status),
        outcome.hook_name,
        outcome.status.label()
    );
    if let Some(message) = &outcome.message {
        let _ = write!(line, "  {}", message.dimmed());
    }
    line
}

/// Render the closing summary line
pub fn format_summary(result: &DeploymentResult, dry_run: bool) -> String {
    let changed =
        result.count(OutcomeStatus::Installed) + result.count(OutcomeStatus::Overwritten);
    let unchanged = result.count(OutcomeStatus::Unchanged);
    let failed = result.failures().count();

    let verb = if dry_run { "would change" } else { "changed" };
    let mut summary = format!(
        "{} {} {verb}, {} unchanged",
        "●".bright_green(),
        changed.to_string().bright_white().bold(),
        unchanged.to_string().bright_white().bold(),
    );
    if failed > 0 {
        let _ = write!(
            summary,
            " | {} {} failed",
            "●".bright_red(),
            failed.to_string().bright_red().bold()
        );
    }
    summary
}

/// Render a dry-run mutation
pub fn format_operation(operation: &Operation) -> String {
    match operation {
        Operation::WriteFile { path, size, mode } => match mode {
            Some(mode) => format!("write {path} ({size} bytes, mode {mode:o})"),
            None => format!("write {path} ({size} bytes)"),
        },
        Operation::CreateDir { path } => format!("mkdir {path}"),
        Operation::Remove { path } => format!("remove {path}"),
        Operation::Symlink { link, target } => {
            format!("symlink {link} -> {}", target.display())
        }
    }
}

/// Print a report in the simple format
pub fn print_report(result: &DeploymentResult, operations: &[Operation], dry_run: bool) {
    if result.per_hook.is_empty() {
        println!("{}", "No hooks to deploy".dimmed());
        return;
    }

    for outcome in &result.per_hook {
        println!("{}", format_outcome(outcome));
    }

    if dry_run && !operations.is_empty() {
        println!();
        println!("{}", "Dry run, would perform:".bold());
        for operation in operations {
            println!("  {}", format_operation(operation));
        }
    }

    println!();
    println!("{}", format_summary(result, dry_run));
}
