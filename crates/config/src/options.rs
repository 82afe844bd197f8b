//! Raw option layers
//!
//! An [`OptionLayer`] is what one configuration source says, before precedence is
//! applied. Every field is optional: a field is only "present" when the source set
//! it explicitly, so an absent key never overrides a lower layer.
//!
//! The same struct is deserialized from a manifest extra section and filled in by
//! the command line:
//!
//! ```json
//! {
//!     "no-symlink": true,
//!     "hooks": ["pre-commit", "commit-msg"],
//!     "source-dir": "tools/git-hooks"
//! }
//! ```

use crate::config::Strategy;
use gouzi_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One source of configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct OptionLayer {
    /// Deploy by symlinking (`false` means copy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symlink: Option<bool>,

    /// Deploy by copying (`false` means symlink)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_symlink: Option<bool>,

    /// Point `core.hooksPath` at this value instead of populating the hooks directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_hooks_path: Option<String>,

    /// Restrict deployment to these hooks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hooks: Option<Vec<String>>,

    /// Directory holding one script per hook name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,
}

impl OptionLayer {
    /// Built-in defaults: symlink every recognized hook from `.git-hooks`
    pub fn defaults() -> Self {
        Self {
            symlink: Some(true),
            source_dir: Some(PathBuf::from(crate::config::DEFAULT_SOURCE_DIR)),
            ..Self::default()
        }
    }

    /// Whether this layer sets nothing at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The deployment strategy this layer asks for, if any
    ///
    /// `origin` names the layer in error messages.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when the layer sets both `symlink` and `no-symlink`,
    /// combines either of them with `core-hooks-path`, or gives a
    /// `core-hooks-path` that is empty or starts with `-` (it would reach
    /// `git config` as an option).
    pub fn strategy(&self, origin: &str) -> Result<Option<Strategy>> {
        let link = match (self.symlink, self.no_symlink) {
            (Some(_), Some(_)) => {
                return Err(Error::ConfigInvalid(format!(
                    "{origin}: 'symlink' and 'no-symlink' are mutually exclusive"
                )));
            }
            (Some(symlink), None) => Some(symlink),
            (None, Some(no_symlink)) => Some(!no_symlink),
            (None, None) => None,
        };

        match (link, self.core_hooks_path.as_deref()) {
            (Some(_), Some(_)) => Err(Error::ConfigInvalid(format!(
                "{origin}: 'core-hooks-path' cannot be combined with 'symlink' or 'no-symlink'"
            ))),
            (None, Some(value)) if value.trim().is_empty() => Err(Error::ConfigInvalid(format!(
                "{origin}: 'core-hooks-path' must not be empty"
            ))),
            (None, Some(value)) if value.starts_with('-') => Err(Error::ConfigInvalid(format!(
                "{origin}: 'core-hooks-path' must not start with '-' (use './{value}')"
            ))),
            (None, Some(value)) => Ok(Some(Strategy::HooksPath(value.to_string()))),
            (Some(true), None) => Ok(Some(Strategy::Symlink)),
            (Some(false), None) => Ok(Some(Strategy::Copy)),
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_defaults() {
        let layer = OptionLayer::defaults();
        assert_eq!(layer.symlink, Some(true));
        assert_eq!(layer.source_dir, Some(PathBuf::from(".git-hooks")));
        assert!(layer.hooks.is_none());
        assert_eq!(layer.strategy("defaults").unwrap(), Some(Strategy::Symlink));
    }

    #[test]
    fn test_empty_layer_has_no_strategy() {
        let layer = OptionLayer::default();
        assert!(layer.is_empty());
        assert_eq!(layer.strategy("manifest").unwrap(), None);
    }

    #[test]
    fn test_symlink_false_means_copy() {
        let layer = OptionLayer {
            symlink: Some(false),
            ..OptionLayer::default()
        };
        assert_eq!(layer.strategy("manifest").unwrap(), Some(Strategy::Copy));
    }

    #[test]
    fn test_no_symlink_true_means_copy() {
        let layer = OptionLayer {
            no_symlink: Some(true),
            ..OptionLayer::default()
        };
        assert_eq!(layer.strategy("manifest").unwrap(), Some(Strategy::Copy));
    }

    #[test]
    fn test_no_symlink_false_means_symlink() {
        let layer = OptionLayer {
            no_symlink: Some(false),
            ..OptionLayer::default()
        };
        assert_eq!(layer.strategy("manifest").unwrap(), Some(Strategy::Symlink));
    }

    #[test]
    fn test_symlink_and_no_symlink_conflict() {
        let layer = OptionLayer {
            symlink: Some(true),
            no_symlink: Some(true),
            ..OptionLayer::default()
        };
        let err = layer.strategy("command line").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
        assert!(err.to_string().contains("command line"));
    }

    #[test]
    fn test_hooks_path_with_link_flag_conflicts() {
        let layer = OptionLayer {
            no_symlink: Some(true),
            core_hooks_path: Some(".git-hooks".to_string()),
            ..OptionLayer::default()
        };
        assert!(matches!(
            layer.strategy("manifest"),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_empty_hooks_path_rejected() {
        let layer = OptionLayer {
            core_hooks_path: Some("  ".to_string()),
            ..OptionLayer::default()
        };
        assert!(matches!(
            layer.strategy("manifest"),
            Err(Error::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_dash_prefixed_hooks_path_rejected() {
        let layer = OptionLayer {
            core_hooks_path: Some("--global".to_string()),
            ..OptionLayer::default()
        };
        let err = layer.strategy("manifest").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
        assert!(err.to_string().contains("./--global"));
    }

    #[test]
    fn test_hooks_path_strategy() {
        let layer = OptionLayer {
            core_hooks_path: Some("/custom/hooks".to_string()),
            ..OptionLayer::default()
        };
        assert_eq!(
            layer.strategy("command line").unwrap(),
            Some(Strategy::HooksPath("/custom/hooks".to_string()))
        );
    }

    #[test]
    fn test_deserialize_kebab_case_keys() {
        let layer: OptionLayer = serde_json::from_str(
            r#"{"no-symlink": true, "hooks": ["pre-push"], "source-dir": "scripts/hooks"}"#,
        )
        .unwrap();
        assert_eq!(layer.no_symlink, Some(true));
        assert_eq!(layer.hooks, Some(vec!["pre-push".to_string()]));
        assert_eq!(layer.source_dir, Some(PathBuf::from("scripts/hooks")));
    }

    #[test]
    fn test_deserialize_rejects_unknown_keys() {
        let result: std::result::Result<OptionLayer, _> =
            serde_json::from_str(r#"{"symlinks": true}"#);
        assert!(result.is_err());
    }
}
