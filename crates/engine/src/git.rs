//! Git repository access
//!
//! Reads go through git2 (libgit2), so planning never spawns a process. The one
//! write, `git config core.hooksPath <value>`, goes through the `git` binary via
//! [`GitCommandRunner`].

use gouzi_core::path::AbsPath;
use gouzi_core::{CommandOutput, CommandRunner, Error, Result};
use std::path::Path;

/// Config key Git reads the hooks directory override from
pub const HOOKS_PATH_KEY: &str = "core.hooksPath";

/// Helper function to convert git2 errors to `gouzi_core` errors
#[inline]
#[allow(clippy::needless_pass_by_value)]
fn git_err(e: git2::Error) -> Error {
    Error::Message(format!("Git error: {e}"))
}

/// A repository opened at a known working directory
pub struct Repository {
    inner: git2::Repository,
    git_dir: AbsPath,
    common_dir: AbsPath,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("git_dir", &self.git_dir)
            .field("common_dir", &self.common_dir)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Open the repository rooted at `working_dir`
    ///
    /// Parent directories are not searched: `working_dir` must be the work tree
    /// root (or the repository itself, for bare repositories).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryNotFound` if `working_dir` is not a Git repository.
    pub fn open(working_dir: &AbsPath) -> Result<Self> {
        let inner = git2::Repository::open(working_dir.as_path()).map_err(|e| {
            Error::RepositoryNotFound {
                path: working_dir.as_path().to_path_buf(),
                message: e.message().to_string(),
            }
        })?;
        let git_dir = AbsPath::from_path(inner.path())?;
        let common_dir = AbsPath::from_path(inner.commondir())?;

        tracing::debug!(
            bare = inner.is_bare(),
            worktree = inner.is_worktree(),
            "Opened repository, git dir {}",
            git_dir
        );
        Ok(Self {
            inner,
            git_dir,
            common_dir,
        })
    }

    /// The `.git` directory (the repository itself when bare)
    ///
    /// In a linked worktree this is the worktree's private
    /// `.git/worktrees/<name>` directory.
    pub fn git_dir(&self) -> &AbsPath {
        &self.git_dir
    }

    /// The directory shared by all worktrees
    ///
    /// Same as [`Repository::git_dir`] outside linked worktrees.
    pub fn common_dir(&self) -> &AbsPath {
        &self.common_dir
    }

    /// The default hooks directory, `<common-dir>/hooks`
    ///
    /// Git reads hooks from the common directory, so every worktree shares
    /// them.
    pub fn hooks_dir(&self) -> AbsPath {
        self.common_dir.join("hooks")
    }

    /// `core.hooksPath` as set in the repository's own config file
    ///
    /// This is the level `git config core.hooksPath <value>` writes to.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository config cannot be read.
    pub fn local_hooks_path(&self) -> Result<Option<String>> {
        let config = self
            .inner
            .config()
            .and_then(|config| config.open_level(git2::ConfigLevel::Local))
            .map_err(git_err)?;
        read_string(&config, HOOKS_PATH_KEY)
    }

    /// `core.hooksPath` as Git would see it, across all config levels
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read.
    pub fn effective_hooks_path(&self) -> Result<Option<String>> {
        let config = self.inner.config().map_err(git_err)?;
        read_string(&config, HOOKS_PATH_KEY)
    }
}

fn read_string(config: &git2::Config, key: &str) -> Result<Option<String>> {
    match config.get_string(key) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(git_err(e)),
    }
}

/// [`CommandRunner`] backed by real processes
///
/// The program is located on `PATH` with `which` and run with `duct`, capturing
/// both output streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCommandRunner;

impl CommandRunner for GitCommandRunner {
    fn output(&self, argv: &[&str], working_dir: &Path) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::Message("Cannot run an empty command".to_string()))?;

        let executable = which::which(program)
            .map_err(|e| Error::Message(format!("Cannot find '{program}' in PATH: {e}")))?;

        tracing::debug!("Executing command: {}", argv.join(" "));
        tracing::debug!("Working directory: {}", working_dir.display());

        let output = duct::cmd(executable, args.iter().copied())
            .dir(working_dir)
            .stdout_capture()
            .stderr_capture()
            .unchecked()
            .run()?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
