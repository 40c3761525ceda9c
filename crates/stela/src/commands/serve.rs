//! `stela serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use stela_config::{CliSettings, Config};
use stela_server::{ServerConfig, run_server};
use stela_site::SiteBuilder;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover stela.yml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Docs source directory (overrides config).
    #[arg(short, long)]
    docs_dir: Option<PathBuf>,

    /// Site output directory (overrides config).
    #[arg(short, long)]
    site_dir: Option<PathBuf>,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to.
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Skip the initial build and serve the existing output.
    #[arg(long)]
    no_build: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// Builds the site once, then serves the output directory until
    /// interrupted.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the initial build fails,
    /// or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            docs_dir: self.docs_dir,
            site_dir: self.site_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::info!(config_path = ?config.config_path, "configuration loaded");

        if self.no_build {
            output.info("Skipping build, serving existing output");
        } else {
            let report = SiteBuilder::new(config.clone()).build()?;
            for warning in &report.warnings {
                output.warning(&format!("Warning: {warning}"));
            }
            output.success(&format!("Built {} pages", report.pages));
        }

        let server_config = ServerConfig::from_site_config(&config, self.host, self.port);
        output.info(&format!(
            "Serving {} on http://{}:{}",
            server_config.site_dir.display(),
            server_config.host,
            server_config.port
        ));

        run_server(server_config).await?;
        Ok(())
    }
}
