//! System abstraction for filesystem operations
//!
//! Every read and write the engine performs goes through [`System`], so the same
//! planning and installation code drives both a real deployment and a dry run.

use gouzi_core::path::AbsPath;
use gouzi_core::{Error, Result};
use std::cell::RefCell;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

/// Abstraction over filesystem operations
///
/// Implementations:
/// - `RealSystem`: actual filesystem operations
/// - `DryRunSystem`: reads from disk, records mutations without executing them
pub trait System {
    /// Read a file's contents
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>>;

    /// Write a file's contents, then set its permissions if `mode` is given
    fn write_file(&self, path: &AbsPath, content: &[u8], mode: Option<u32>) -> Result<()>;

    /// Create a directory and all of its parents
    fn create_dir_all(&self, path: &AbsPath) -> Result<()>;

    /// Remove a file or symlink
    fn remove(&self, path: &AbsPath) -> Result<()>;

    /// Whether `path` is a regular file, following symlinks
    fn is_file(&self, path: &AbsPath) -> bool;

    /// Metadata of `path` itself, without following symlinks
    ///
    /// Returns `Ok(None)` when nothing exists at `path`.
    fn symlink_metadata(&self, path: &AbsPath) -> Result<Option<Metadata>>;

    /// Create a symbolic link at `link` pointing to `target`
    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()>;

    /// Read the target of a symbolic link
    fn read_link(&self, path: &AbsPath) -> Result<PathBuf>;

    /// Resolve `path` to its canonical form, following every symlink
    fn canonicalize(&self, path: &AbsPath) -> Result<PathBuf>;
}

/// Real filesystem implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl System for RealSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        fs::read(path.as_path()).map_err(|e| Error::fs("read", path, e))
    }

    fn write_file(&self, path: &AbsPath, content: &[u8], mode: Option<u32>) -> Result<()> {
        fs::write(path.as_path(), content).map_err(|e| Error::fs("write", path, e))?;

        #[cfg(unix)]
        if let Some(mode) = mode {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(mode);
            fs::set_permissions(path.as_path(), permissions)
                .map_err(|e| Error::fs("set permissions on", path, e))?;
        }

        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        fs::create_dir_all(path.as_path()).map_err(|e| Error::fs("create directory", path, e))
    }

    fn remove(&self, path: &AbsPath) -> Result<()> {
        fs::remove_file(path.as_path()).map_err(|e| Error::fs("remove", path, e))
    }

    fn is_file(&self, path: &AbsPath) -> bool {
        path.as_path().is_file()
    }

    fn symlink_metadata(&self, path: &AbsPath) -> Result<Option<Metadata>> {
        match fs::symlink_metadata(path.as_path()) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::fs("inspect", path, e)),
        }
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link.as_path())
                .map_err(|e| Error::fs("create symlink", link, e))
        }

        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_file(target, link.as_path())
                .map_err(|e| Error::fs("create symlink", link, e))
        }
    }

    fn read_link(&self, path: &AbsPath) -> Result<PathBuf> {
        fs::read_link(path.as_path()).map_err(|e| Error::fs("read link", path, e))
    }

    fn canonicalize(&self, path: &AbsPath) -> Result<PathBuf> {
        fs::canonicalize(path.as_path()).map_err(|e| Error::fs("resolve", path, e))
    }
}

/// Dry-run system that records mutations without executing them
///
/// Reads still hit the real filesystem, so planning sees the actual state of
/// the repository.
#[derive(Debug, Default)]
pub struct DryRunSystem {
    operations: RefCell<Vec<Operation>>,
}

/// A mutation that would be performed on the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Write a file
    WriteFile {
        /// File to write
        path: AbsPath,
        /// Content length in bytes
        size: usize,
        /// Permissions applied after writing
        mode: Option<u32>,
    },
    /// Create a directory tree
    CreateDir {
        /// Directory to create
        path: AbsPath,
    },
    /// Remove a file or symlink
    Remove {
        /// Entry to remove
        path: AbsPath,
    },
    /// Create a symlink
    Symlink {
        /// Where the link is created
        link: AbsPath,
        /// What the link points to
        target: PathBuf,
    },
}

impl DryRunSystem {
    /// Create a new dry-run system
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutations recorded so far, in order
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }

    fn record(&self, op: Operation) {
        tracing::debug!(?op, "Dry run: skipping filesystem mutation");
        self.operations.borrow_mut().push(op);
    }
}

impl System for DryRunSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        RealSystem.read_file(path)
    }

    fn write_file(&self, path: &AbsPath, content: &[u8], mode: Option<u32>) -> Result<()> {
        self.record(Operation::WriteFile {
            path: path.clone(),
            size: content.len(),
            mode,
        });
        Ok(())
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::CreateDir { path: path.clone() });
        Ok(())
    }

    fn remove(&self, path: &AbsPath) -> Result<()> {
        self.record(Operation::Remove { path: path.clone() });
        Ok(())
    }

    fn is_file(&self, path: &AbsPath) -> bool {
        RealSystem.is_file(path)
    }

    fn symlink_metadata(&self, path: &AbsPath) -> Result<Option<Metadata>> {
        RealSystem.symlink_metadata(path)
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        self.record(Operation::Symlink {
            link: link.clone(),
            target: target.to_path_buf(),
        });
        Ok(())
    }

    fn read_link(&self, path: &AbsPath) -> Result<PathBuf> {
        RealSystem.read_link(path)
    }

    fn canonicalize(&self, path: &AbsPath) -> Result<PathBuf> {
        RealSystem.canonicalize(path)
    }
}
