//! `primer build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use primer_config::CliSettings;
use primer_site::StaticSiteBuilder;

use crate::commands::{SiteArgs, load_site};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Output directory for the generated site (default: dist/ next to the
    /// config file).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.site.load_config(CliSettings::default())?;
        let out_dir = self.out_dir.unwrap_or_else(|| {
            config
                .config_path
                .as_deref()
                .and_then(std::path::Path::parent)
                .map_or_else(|| PathBuf::from("dist"), |dir| dir.join("dist"))
        });

        output.info(&format!(
            "Content: {}",
            config.docs_resolved.source_dir.display()
        ));
        output.info(&format!("Output: {}", out_dir.display()));

        let site = Arc::new(load_site(&config)?);
        let report = StaticSiteBuilder::new(site).build(&out_dir)?;

        for route in &report.missing {
            output.warning(&format!("No content for {route}"));
        }
        if report.diagnostics > 0 {
            output.warning(&format!(
                "{} block diagnostics (run `primer check` for details)",
                report.diagnostics
            ));
        }
        output.success(&format!(
            "Built {} pages to {}",
            report.pages,
            out_dir.display()
        ));
        Ok(())
    }
}
