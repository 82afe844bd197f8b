//! Core types for gouzi
//!
//! This is the foundation crate (Layer 0) that all other gouzi crates depend on.
//! It provides:
//! - The error taxonomy shared by configuration and deployment
//! - `AbsPath`, the absolute path newtype used for every filesystem target
//! - The catalog of hook names Git recognizes (`HookName`)
//! - The `CommandRunner` capability used for external process invocation
//!
//! This crate has no dependencies on other gouzi crates.

pub mod error;
pub mod hook;
pub mod path;
pub mod runner;

pub use error::{Error, Result};
pub use hook::{HookName, KNOWN_HOOKS};
pub use path::AbsPath;
pub use runner::{CommandOutput, CommandRunner};
