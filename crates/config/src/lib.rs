//! Configuration management for gouzi
//!
//! This crate handles:
//! - Raw option layers (built-in defaults, manifest extra, command line)
//! - Resolving the layers into one normalized `Configuration`
//! - Loading the extra section from a project manifest
//! - Logging initialization

pub mod config;
pub mod logging;
pub mod manifest;
pub mod options;

// Re-export error types from core
pub use gouzi_core::{Error, Result};

// Re-export main types
pub use config::{Configuration, DEFAULT_SOURCE_DIR, HookSelection, Strategy, resolve};
pub use manifest::{Manifest, ManifestFormat};
pub use options::OptionLayer;
