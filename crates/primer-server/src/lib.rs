//! HTTP server for the Primer textbook engine.
//!
//! Serves, with axum:
//! - the two-pane HTML shell for every route (`/`, `/{*path}`)
//! - `GET /api/navigation?route=` with the sidebar state as JSON
//! - `GET /api/pages/{*path}` with the composed page as JSON
//! - the shell stylesheet and script under `/assets`
//!
//! The server holds only immutable state; every request composes its page
//! from the shared [`Site`].
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::PathBuf;
//! use primer_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         source_dir: PathBuf::from("content"),
//!         navigation: PathBuf::from("navigation.toml"),
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use primer_nav::Route;
use primer_renderer::BuiltinBlock;
use primer_site::{Site, SiteConfig};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Lesson content directory.
    pub source_dir: PathBuf,
    /// Navigation tree file.
    pub navigation: PathBuf,
    /// Site title.
    pub title: String,
    /// Component aliases for built-in renderers.
    pub aliases: BTreeMap<String, BuiltinBlock>,
    /// Per-route component restrictions.
    pub page_blocks: HashMap<Route, Vec<String>>,
    /// Log page diagnostics as warnings.
    pub verbose: bool,
    /// Application version (for `ETag`s).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
            source_dir: PathBuf::from("content"),
            navigation: PathBuf::from("navigation.toml"),
            title: "Primer".to_owned(),
            aliases: BTreeMap::new(),
            page_blocks: HashMap::new(),
            verbose: false,
            version: String::new(),
        }
    }
}

impl ServerConfig {
    /// Site configuration part of this server configuration.
    #[must_use]
    pub fn site_config(&self) -> SiteConfig {
        SiteConfig {
            title: self.title.clone(),
            aliases: self.aliases.clone(),
            page_blocks: self.page_blocks.clone(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the site cannot be loaded or the server fails to
/// start.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let site = Site::load(&config.navigation, &config.source_dir, config.site_config())?;

    let state = Arc::new(AppState {
        site: Arc::new(site),
        verbose: config.verbose,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let address = format!("{}:{}", config.host, config.port);
    let addr: SocketAddr = address
        .parse()
        .map_err(|source| ServerError::Address { address, source })?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Primer config.
#[must_use]
pub fn server_config_from_config(
    config: &primer_config::Config,
    version: String,
    verbose: bool,
) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        source_dir: config.docs_resolved.source_dir.clone(),
        navigation: config.docs_resolved.navigation.clone(),
        title: config.site.title.clone(),
        aliases: config.aliases.clone(),
        page_blocks: config.page_blocks.clone(),
        verbose,
        version,
    }
}
