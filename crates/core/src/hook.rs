//! The fixed catalog of hook names Git recognizes
//!
//! Only names in [`KNOWN_HOOKS`] can be deployed. The list follows the order of
//! `githooks(5)`, which is also the order hooks are planned and reported in when
//! the configuration does not restrict the list.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Every hook name documented in `githooks(5)`
pub const KNOWN_HOOKS: &[&str] = &[
    "applypatch-msg",
    "pre-applypatch",
    "post-applypatch",
    "pre-commit",
    "pre-merge-commit",
    "prepare-commit-msg",
    "commit-msg",
    "post-commit",
    "pre-rebase",
    "post-checkout",
    "post-merge",
    "pre-push",
    "pre-receive",
    "update",
    "proc-receive",
    "post-receive",
    "post-update",
    "reference-transaction",
    "push-to-checkout",
    "pre-auto-gc",
    "post-rewrite",
    "sendemail-validate",
    "fsmonitor-watchman",
    "p4-changelist",
    "p4-prepare-changelist",
    "p4-post-changelist",
    "p4-pre-submit",
    "post-index-change",
];

/// A hook name that is guaranteed to be part of [`KNOWN_HOOKS`]
///
/// # Examples
///
/// ```
/// use gouzi_core::HookName;
///
/// let hook: HookName = "pre-commit".parse().unwrap();
/// assert_eq!(hook.as_str(), "pre-commit");
/// assert!("pre-coffee".parse::<HookName>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HookName(&'static str);

impl HookName {
    /// Look up a name in the catalog
    pub fn lookup(name: &str) -> Option<Self> {
        KNOWN_HOOKS
            .iter()
            .copied()
            .find(|known| *known == name)
            .map(HookName)
    }

    /// Iterate over the whole catalog in `githooks(5)` order
    pub fn all() -> impl Iterator<Item = HookName> {
        KNOWN_HOOKS.iter().copied().map(HookName)
    }

    /// The hook name as Git spells it
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl FromStr for HookName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::lookup(s).ok_or_else(|| {
            Error::ConfigInvalid(format!("'{s}' is not a recognized git hook name"))
        })
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
