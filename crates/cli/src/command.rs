//! Command trait for the gouzi CLI
//!
//! Every subcommand implements [`Command`] and receives the shared
//! [`RuntimeContext`] of the run.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all gouzi commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         // Access the repository root: context.working_dir()
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    ///
    /// `deploy` returns the process exit code; listing commands return `()`.
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` for run-level failures. Per-hook failures of a
    /// deployment are part of the output, not errors.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
