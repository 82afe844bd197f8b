//! Deploy command implementation
//!
//! Builds the command-line option layer, merges it with the manifest and the
//! built-in defaults, and hands the result to the engine.

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::output::{self, OutputFormat};
use clap::Args;
use gouzi_config::{OptionLayer, resolve};
use gouzi_engine::system::Operation;
use gouzi_engine::{DryRunSystem, GitCommandRunner, RealSystem, deploy};
use std::path::PathBuf;

/// Deploy hook scripts into the repository
#[derive(Debug, Clone, Default, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeployCommand {
    /// Symlink hooks into the hooks directory
    #[arg(short = 's', long)]
    pub symlink: bool,

    /// Copy hooks into the hooks directory instead of symlinking
    #[arg(short = 'S', long)]
    pub no_symlink: bool,

    /// Set core.hooksPath to this value instead of populating the hooks directory
    #[arg(short = 'p', long, value_name = "PATH")]
    pub core_hooks_path: Option<String>,

    /// Deploy only this hook (repeatable)
    #[arg(long = "hook", value_name = "NAME")]
    pub hooks: Vec<String>,

    /// Directory holding one script per hook [default: .git-hooks]
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Manifest to read options from [default: composer.json, then Cargo.toml]
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Show what would change without touching anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "simple")]
    pub format: OutputFormat,
}

impl DeployCommand {
    /// The options given on the command line
    ///
    /// Flags that were not passed stay unset, so they never override the
    /// manifest.
    pub fn option_layer(&self) -> OptionLayer {
        OptionLayer {
            symlink: self.symlink.then_some(true),
            no_symlink: self.no_symlink.then_some(true),
            core_hooks_path: self.core_hooks_path.clone(),
            hooks: (!self.hooks.is_empty()).then(|| self.hooks.clone()),
            source_dir: self.source_dir.clone(),
        }
    }
}

impl Command for DeployCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let manifest = context.manifest_layer(self.manifest.as_deref())?;
        let config = resolve(&OptionLayer::defaults(), &manifest, &self.option_layer())?;
        tracing::debug!(?config, "Deploying");

        let working_dir = context.working_dir();
        let runner = GitCommandRunner;

        let (result, operations): (_, Vec<Operation>) = if self.dry_run {
            let system = DryRunSystem::new();
            let result = deploy(working_dir, &config, &system, &runner, true)?;
            (result, system.operations())
        } else {
            (deploy(working_dir, &config, &RealSystem, &runner, false)?, Vec::new())
        };

        match self.format {
            OutputFormat::Simple => output::print_report(&result, &operations, self.dry_run),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }

        Ok(result.exit_code)
    }
}
