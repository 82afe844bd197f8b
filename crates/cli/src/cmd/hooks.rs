//! Hooks command implementation
//!
//! Lists every hook name Git recognizes and whether the source directory has a
//! script for it. Read-only; the repository is not opened.

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::output::OutputFormat;
use clap::Args;
use gouzi_config::{OptionLayer, resolve};
use gouzi_engine::RealSystem;
use gouzi_engine::catalog::{self, CatalogEntry, SourceStatus};
use owo_colors::OwoColorize;
use std::path::PathBuf;

/// List recognized hooks and their source scripts
#[derive(Debug, Clone, Default, Args)]
pub struct HooksCommand {
    /// Directory holding one script per hook [default: .git-hooks]
    #[arg(long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Manifest to read options from [default: composer.json, then Cargo.toml]
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Only list hooks that have a script
    #[arg(long)]
    pub present: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "simple")]
    pub format: OutputFormat,
}

impl HooksCommand {
    /// Survey the source directory the configuration points at
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or the merged configuration is invalid.
    pub fn entries(&self, context: &RuntimeContext) -> Result<Vec<CatalogEntry>> {
        let manifest = context.manifest_layer(self.manifest.as_deref())?;
        let caller = OptionLayer {
            source_dir: self.source_dir.clone(),
            ..OptionLayer::default()
        };
        let config = resolve(&OptionLayer::defaults(), &manifest, &caller)?;
        let source_dir = config.source_dir_in(context.working_dir());

        let mut entries = catalog::survey(&source_dir, &RealSystem);
        if self.present {
            entries.retain(|entry| entry.status == SourceStatus::Present);
        }
        Ok(entries)
    }
}

impl Command for HooksCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let entries = self.entries(context)?;

        match self.format {
            OutputFormat::Simple => {
                for entry in &entries {
                    match entry.status {
                        SourceStatus::Present => println!(
                            "{} {:<24} {}",
                            "●".bright_green(),
                            entry.hook.as_str().bold(),
                            entry.source.to_string().dimmed()
                        ),
                        SourceStatus::Missing => {
                            println!("{} {}", "○".dimmed(), entry.hook.as_str().dimmed());
                        }
                    }
                }
            }
            OutputFormat::Json => {
                let rows: Vec<_> = entries
                    .iter()
                    .map(|entry| {
                        serde_json::json!({
                            "name": entry.hook,
                            "source": entry.source,
                            "present": entry.status == SourceStatus::Present,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        }

        Ok(())
    }
}
