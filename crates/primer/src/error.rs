//! CLI error types.

use primer_config::ConfigError;
use primer_server::ServerError;
use primer_site::{BuildError, SiteError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Runtime(std::io::Error),

    #[error("{0}")]
    Validation(String),
}
