//! gouzi CLI library
//!
//! This library contains all the CLI logic for gouzi, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// gouzi - Deploy version-controlled git hooks
#[derive(Parser, Debug)]
#[command(name = "gouzi")]
#[command(about = "Deploy version-controlled git hooks with gouzi (钩子)")]
#[command(version)]
#[command(long_about = "Deploy version-controlled git hooks with gouzi (钩子)

Keeps the hook scripts committed in your project (.git-hooks/ by default)
installed in the repository, by symlink, by copy, or by pointing
core.hooksPath at them.

Options are read from the command line, then the project manifest
(composer.json extra section or [package.metadata.gouzi] in Cargo.toml),
then built-in defaults.")]
pub struct Cli {
    /// Run as if started in this directory (the repository root)
    #[arg(short = 'C', long, value_name = "DIR", global = true)]
    pub working_dir: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "GOUZI_LOG_FILE", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for gouzi CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy hook scripts into the repository
    #[command(long_about = "Deploy hook scripts into the repository

Every script in the source directory named after a git hook is installed
into the repository's hooks directory. Hooks that are already in place are
left alone, and a hook gouzi did not install is never overwritten: it is
reported as a conflict and the command exits with status 1.

Examples:
  • gouzi deploy
      → Symlink every script from .git-hooks/

  • gouzi deploy --no-symlink --hook pre-commit
      → Copy only the pre-commit hook

  • gouzi deploy --core-hooks-path .git-hooks
      → Point core.hooksPath at .git-hooks instead

  • gouzi deploy --dry-run
      → Show what would change")]
    Deploy(cmd::deploy::DeployCommand),

    /// List recognized hooks and which ones have a script
    Hooks(cmd::hooks::HooksCommand),
}

/// Main entry point for the CLI logic
///
/// Returns the process exit code.
///
/// # Errors
///
/// Returns an error if:
/// - Logging initialization fails
/// - The working directory or manifest cannot be resolved
/// - The configuration is invalid
/// - The working directory is not a git repository
pub fn run(cli: Cli) -> Result<i32> {
    gouzi_config::logging::init(cli.verbose, cli.log_file.as_deref())
        .context("Failed to initialize logging")?;

    let context = RuntimeContext::resolve(cli.working_dir.as_deref())?;
    tracing::debug!("Working directory: {}", context.working_dir());

    execute_command(&cli.command, &context)
}

/// Execute the command based on the command type
fn execute_command(command: &Commands, context: &RuntimeContext) -> Result<i32> {
    let code = match command {
        Commands::Deploy(deploy_cmd) => deploy_cmd.execute(context)?,
        Commands::Hooks(hooks_cmd) => {
            hooks_cmd.execute(context)?;
            0
        }
    };
    Ok(code)
}
