//! Error types for CLI commands
//!
//! Structured errors for the failures the CLI itself detects. Everything coming
//! out of the library crates passes through `Other`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The working directory could not be resolved
    #[error("Invalid working directory {}: {source}", path.display())]
    InvalidWorkingDir {
        /// The path given on the command line
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Report serialization failed
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<gouzi_core::Error> for CommandError {
    fn from(err: gouzi_core::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;
