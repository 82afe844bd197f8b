//! Deployment ledger
//!
//! Records the blake3 digest of every hook gouzi copied into the hooks
//! directory, in `<common-dir>/gouzi/deployed.json`:
//!
//! ```json
//! {
//!   "version": 1,
//!   "hooks": {
//!     "commit-msg": "3f1c…",
//!     "pre-commit": "a9d2…"
//!   }
//! }
//! ```
//!
//! A target whose digest matches its record was written by gouzi and may be
//! overwritten; anything else found in the hooks directory is foreign.

use crate::hash::hex_digest;
use crate::system::System;
use gouzi_core::path::AbsPath;
use gouzi_core::{Error, HookName, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directory under the git dir owned by gouzi
pub const LEDGER_DIR: &str = "gouzi";

/// Ledger file name inside [`LEDGER_DIR`]
pub const LEDGER_FILE: &str = "deployed.json";

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    version: u32,
    #[serde(default)]
    hooks: BTreeMap<String, String>,
}

/// Per-repository record of the hooks gouzi copied
#[derive(Debug, Clone)]
pub struct Ledger {
    path: AbsPath,
    hooks: BTreeMap<String, String>,
    dirty: bool,
}

impl Ledger {
    /// An empty ledger stored under `git_dir`
    pub fn empty(git_dir: &AbsPath) -> Self {
        Self {
            path: git_dir.join(LEDGER_DIR).join(LEDGER_FILE),
            hooks: BTreeMap::new(),
            dirty: false,
        }
    }

    /// Load the ledger of the repository at `git_dir`
    ///
    /// A missing ledger is empty. An unreadable or corrupt one is logged and
    /// treated as empty, which only makes conflict detection stricter.
    pub fn load(git_dir: &AbsPath, system: &dyn System) -> Self {
        let mut ledger = Self::empty(git_dir);

        match system.symlink_metadata(&ledger.path) {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::debug!("No ledger at {}", ledger.path);
                return ledger;
            }
            Err(e) => {
                tracing::warn!("Ignoring ledger: {e}");
                return ledger;
            }
        }

        let parsed = system.read_file(&ledger.path).and_then(|bytes| {
            serde_json::from_slice::<LedgerFile>(&bytes)
                .map_err(|e| Error::Message(format!("corrupt ledger {}: {e}", ledger.path)))
        });

        match parsed {
            Ok(file) if file.version == LEDGER_VERSION => {
                tracing::debug!("Loaded ledger with {} entries", file.hooks.len());
                ledger.hooks = file.hooks;
            }
            Ok(file) => {
                tracing::warn!(
                    "Ignoring ledger {} with unsupported version {}",
                    ledger.path,
                    file.version
                );
            }
            Err(e) => tracing::warn!("Ignoring ledger: {e}"),
        }

        ledger
    }

    /// Where the ledger is stored
    pub fn path(&self) -> &AbsPath {
        &self.path
    }

    /// Whether `content` is exactly what gouzi last wrote for `hook`
    pub fn matches(&self, hook: HookName, content: &[u8]) -> bool {
        self.hooks
            .get(hook.as_str())
            .is_some_and(|digest| *digest == hex_digest(content))
    }

    /// Remember that `content` was written for `hook`
    pub fn record(&mut self, hook: HookName, content: &[u8]) {
        let digest = hex_digest(content);
        if self.hooks.get(hook.as_str()) != Some(&digest) {
            self.hooks.insert(hook.as_str().to_string(), digest);
            self.dirty = true;
        }
    }

    /// Drop the record for `hook`, if any
    pub fn forget(&mut self, hook: HookName) {
        if self.hooks.remove(hook.as_str()).is_some() {
            self.dirty = true;
        }
    }

    /// Whether the ledger changed since it was loaded
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persist the ledger if it changed
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger directory or file cannot be written.
    pub fn save(&mut self, system: &dyn System) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            system.create_dir_all(&parent)?;
        }

        let file = LedgerFile {
            version: LEDGER_VERSION,
            hooks: self.hooks.clone(),
        };
        let mut json = serde_json::to_vec_pretty(&file)
            .map_err(|e| Error::Message(format!("failed to serialize ledger: {e}")))?;
        json.push(b'\n');

        system.write_file(&self.path, &json, None)?;
        tracing::debug!("Saved ledger to {}", self.path);
        self.dirty = false;
        Ok(())
    }
}
