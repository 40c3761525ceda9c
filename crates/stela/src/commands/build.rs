//! `stela build` command implementation.

use std::path::PathBuf;

use clap::Args;
use stela_config::{CliSettings, Config};
use stela_site::SiteBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover stela.yml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Docs source directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Site output directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or the build fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            docs_dir: self.docs_dir,
            site_dir: self.site_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(
            config_path = ?config.config_path,
            docs_dir = %config.paths.docs_dir.display(),
            "starting build"
        );

        output.info(&format!(
            "Building '{}' from {}",
            config.site_name,
            config.paths.docs_dir.display()
        ));

        let report = SiteBuilder::new(config).build()?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.success(&format!(
            "Built {} pages ({} indexes, {} assets) into {}",
            report.pages,
            report.indexes,
            report.assets,
            report.site_dir.display()
        ));

        Ok(())
    }
}
