//! Site assembly for Primer.
//!
//! Wires the navigation tree, a document source and the block registry
//! together:
//!
//! - [`Site`]: immutable, shareable; renders any route.
//! - [`Session`]: one reader's navigation state, applying route, toggle and
//!   resolution events in order and discarding stale resolutions.
//! - [`render_shell`]: the two-pane HTML layout.
//! - [`StaticSiteBuilder`]: static export of every linked route.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use primer_nav::{NavTree, Route};
//! use primer_site::{ContentPane, Session, Site, SiteConfig};
//! use primer_storage::MemorySource;
//!
//! let tree = NavTree::from_toml(r#"
//! [[chapter]]
//! id = "measurements"
//! title = "1. Quantities and Measurements"
//! base_path = "/physics/measurements"
//! "#).unwrap();
//! let source = MemorySource::new().with_document("/physics/measurements", "# Measurements\n");
//! let site = Arc::new(Site::new(Arc::new(tree), Arc::new(source), SiteConfig::default()));
//!
//! let mut session = Session::new(Arc::clone(&site));
//! let ticket = session.navigate(Route::parse("/physics/measurements").unwrap());
//! let result = site.render(ticket.route());
//! session.resolved(ticket, result).unwrap();
//!
//! assert!(matches!(session.pane(), ContentPane::Ready { .. }));
//! assert!(session.sidebar().chapters[0].expanded);
//! ```

mod export;
mod session;
mod shell;
mod site;

pub use export::{BuildError, BuildReport, StaticSiteBuilder};
pub use session::{ContentPane, ResolveTicket, Session, SessionEvent, StaleResolution};
pub use shell::{
    SCRIPT, SCRIPT_PATH, STYLESHEET, STYLESHEET_PATH, render_pane, render_shell, render_sidebar,
};
pub use site::{Site, SiteConfig, SiteError};
