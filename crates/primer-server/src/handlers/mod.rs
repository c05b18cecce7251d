//! HTTP request handlers.

pub(crate) mod assets;
pub(crate) mod navigation;
pub(crate) mod pages;
pub(crate) mod shell;

use primer_nav::{Route, RouteError};
use primer_renderer::ComposedPage;

use crate::state::AppState;

/// Convert a wildcard capture (no leading slash) to a route.
pub(crate) fn route_from_path(path: &str) -> Result<Route, RouteError> {
    Route::parse(&format!("/{path}"))
}

/// Log page diagnostics in verbose mode.
pub(crate) fn log_diagnostics(state: &AppState, route: &Route, page: &ComposedPage) {
    if !state.verbose {
        return;
    }
    for diagnostic in &page.diagnostics {
        tracing::warn!(route = %route, line = diagnostic.line(), "{diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_path() {
        assert_eq!(route_from_path("").unwrap(), Route::root());
        assert_eq!(
            route_from_path("physics/measurements/").unwrap().as_str(),
            "/physics/measurements"
        );
        assert!(route_from_path("physics/../secrets").is_err());
    }
}
