//! Error taxonomy for gouzi
//!
//! Configuration-level errors (`ConfigInvalid`, `RepositoryNotFound`, `Manifest`)
//! abort a run before anything is mutated. The remaining variants describe a
//! single hook and are collected into the deployment report instead of being
//! propagated past the installer.

use crate::path::AbsPath;
use std::path::PathBuf;
use thiserror::Error;

/// Base error type for gouzi
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Path is not absolute
    #[error("Path must be absolute: {}", path.display())]
    PathNotAbsolute {
        /// The offending path
        path: PathBuf,
    },

    /// Contradictory or malformed configuration
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// An explicitly requested hook has no source script
    #[error("No source script for hook '{hook}' (expected {path})")]
    SourceMissing {
        /// Hook name
        hook: String,
        /// Where the script was expected
        path: AbsPath,
    },

    /// The target location holds something gouzi did not put there
    #[error("Hook '{hook}' conflicts with {path}: {reason}")]
    HookConflict {
        /// Hook name
        hook: String,
        /// The occupied target
        path: AbsPath,
        /// What is in the way
        reason: String,
    },

    /// Permission or I/O failure while installing a hook
    #[error("Failed to {operation} {path}: {source}")]
    FileSystem {
        /// The attempted operation, e.g. "write"
        operation: &'static str,
        /// The path it was attempted on
        path: AbsPath,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An external command exited unsuccessfully
    #[error("Command `{command}` failed with exit code {exit_code}: {stderr}")]
    ExternalCommand {
        /// The command line as run
        command: String,
        /// Exit code, -1 when killed by a signal
        exit_code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The working directory is not a Git repository
    #[error("Not a git repository: {}: {message}", path.display())]
    RepositoryNotFound {
        /// The working directory
        path: PathBuf,
        /// Why libgit2 could not open it
        message: String,
    },

    /// Manifest could not be read or parsed
    #[error("Failed to load manifest {}: {message}", path.display())]
    Manifest {
        /// The manifest file
        path: PathBuf,
        /// Read or parse failure
        message: String,
    },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Build a `FileSystem` error for `operation` on `path`
    pub fn fs(operation: &'static str, path: &AbsPath, source: std::io::Error) -> Self {
        Self::FileSystem {
            operation,
            path: path.clone(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
