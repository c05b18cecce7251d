//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod serve;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use serve::ServeArgs;

use std::path::PathBuf;

use clap::Args;
use primer_config::{CliSettings, Config};
use primer_site::{Site, SiteConfig};

use crate::error::CliError;

/// Options shared by every command that reads a site.
#[derive(Args, Debug)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover primer.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lesson content directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Navigation tree file (overrides config).
    #[arg(short, long)]
    navigation: Option<PathBuf>,
}

impl SiteArgs {
    /// Load configuration, applying these args and `extra` overrides.
    pub(crate) fn load_config(&self, extra: CliSettings) -> Result<Config, CliError> {
        let settings = CliSettings {
            source_dir: self.source_dir.clone(),
            navigation: self.navigation.clone(),
            ..extra
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}

/// Load the site described by `config`.
pub(crate) fn load_site(config: &Config) -> Result<Site, CliError> {
    let site_config = SiteConfig {
        title: config.site.title.clone(),
        aliases: config.aliases.clone(),
        page_blocks: config.page_blocks.clone(),
    };
    tracing::debug!(
        config = ?config.config_path,
        aliases = site_config.aliases.len(),
        "Loading site"
    );
    Ok(Site::load(
        &config.docs_resolved.navigation,
        &config.docs_resolved.source_dir,
        site_config,
    )?)
}
