//! Static site export.
//!
//! Writes the shell for every linked route as `<route>/index.html`, plus a
//! `404.html` and the shell assets, so the output can be served by any
//! static file server.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use primer_nav::Route;

use crate::session::ContentPane;
use crate::shell::{SCRIPT, SCRIPT_PATH, STYLESHEET, STYLESHEET_PATH, render_shell};
use crate::site::Site;

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Writing output failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// File or directory being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Pages written.
    pub pages: usize,
    /// Linked routes with no document; the shell was written with a
    /// not-found pane.
    pub missing: Vec<Route>,
    /// Diagnostics across all pages.
    pub diagnostics: usize,
}

/// Builds a static copy of a site.
#[derive(Debug)]
pub struct StaticSiteBuilder {
    site: Arc<Site>,
}

impl StaticSiteBuilder {
    /// Create a builder for `site`.
    #[must_use]
    pub fn new(site: Arc<Site>) -> Self {
        Self { site }
    }

    /// Write the site under `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] when a file cannot be written. Missing or
    /// unreadable documents do not fail the build.
    pub fn build(&self, out_dir: &Path) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();

        for route in self.site.routes() {
            let pane = ContentPane::from_result(route.clone(), self.site.render(&route));
            match &pane {
                ContentPane::Ready { page, .. } => report.diagnostics += page.diagnostics.len(),
                ContentPane::NotFound { .. } | ContentPane::Failed { .. } => {
                    tracing::warn!(route = %route, "No content for linked route");
                    report.missing.push(route.clone());
                }
                ContentPane::Idle | ContentPane::Loading { .. } => {}
            }

            let sidebar = self.site.sidebar(Some(&route), false);
            let html = render_shell(self.site.title(), &sidebar, &pane);
            write_file(&page_path(out_dir, &route), html.as_bytes())?;
            report.pages += 1;
        }

        let not_found = ContentPane::NotFound {
            route: Route::root(),
        };
        let html = render_shell(
            self.site.title(),
            &self.site.sidebar(None, false),
            &not_found,
        );
        write_file(&out_dir.join("404.html"), html.as_bytes())?;
        write_file(&asset_path(out_dir, STYLESHEET_PATH), STYLESHEET.as_bytes())?;
        write_file(&asset_path(out_dir, SCRIPT_PATH), SCRIPT.as_bytes())?;

        tracing::info!(
            out_dir = %out_dir.display(),
            pages = report.pages,
            missing = report.missing.len(),
            "Built static site"
        );
        Ok(report)
    }
}

/// `/a/b` to `out/a/b/index.html`; `/` to `out/index.html`.
fn page_path(out_dir: &Path, route: &Route) -> PathBuf {
    let mut path = out_dir.to_path_buf();
    path.extend(route.segments());
    path.join("index.html")
}

fn asset_path(out_dir: &Path, url: &str) -> PathBuf {
    out_dir.join(url.trim_start_matches('/'))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), BuildError> {
    let io_err = |source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
