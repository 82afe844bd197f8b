//! External process capability
//!
//! Shelling out to the `git` binary is the one blocking, externally visible side
//! effect of a deployment. It sits behind [`CommandRunner`] so the engine can be
//! driven by a recording fake in tests.

use crate::error::{Error, Result};
use std::path::Path;

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Process exit code (`-1` when terminated by a signal)
    pub exit_code: i32,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs an argv to completion and captures its output
pub trait CommandRunner {
    /// Run `argv` inside `working_dir` and capture its output
    ///
    /// Only failures to start or wait for the process are errors here; a
    /// non-zero exit is reported through [`CommandOutput::exit_code`].
    fn output(&self, argv: &[&str], working_dir: &Path) -> Result<CommandOutput>;

    /// Run `argv`, treating a non-zero exit as [`Error::ExternalCommand`]
    fn run(&self, argv: &[&str], working_dir: &Path) -> Result<CommandOutput> {
        let output = self.output(argv, working_dir)?;
        if output.success() {
            Ok(output)
        } else {
            Err(Error::ExternalCommand {
                command: argv.join(" "),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            })
        }
    }
}
