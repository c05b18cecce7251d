//! `primer serve` command implementation.

use clap::Args;
use primer_config::CliSettings;
use primer_server::{run_server, server_config_from_config};

use crate::commands::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (log page diagnostics).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings {
            host: self.host,
            port: self.port,
            ..CliSettings::default()
        })?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Content directory: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!(
            "Navigation: {}",
            config.docs_resolved.navigation.display()
        ));
        if !config.aliases.is_empty() {
            let names: Vec<&str> = config.aliases.keys().map(String::as_str).collect();
            output.info(&format!("Block aliases: {}", names.join(", ")));
        }

        let server_config = server_config_from_config(&config, version.to_owned(), self.verbose);
        run_server(server_config).await?;

        Ok(())
    }
}
