//! Two-pane HTML shell for browser navigation.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use primer_nav::Route;
use primer_site::{ContentPane, render_shell};

use crate::error::ApiError;
use crate::handlers::{log_diagnostics, route_from_path};
use crate::state::AppState;

/// Handle GET /.
pub(crate) async fn get_root_shell(State(state): State<Arc<AppState>>) -> Response {
    shell_impl(Route::root(), &state)
}

/// Handle GET /{path}.
pub(crate) async fn get_shell(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match route_from_path(&path) {
        Ok(route) => shell_impl(route, &state),
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// Render the shell for `route`. Missing content still renders the sidebar,
/// with a 404 status.
fn shell_impl(route: Route, state: &AppState) -> Response {
    let result = state.site.render(&route);
    if let Ok(page) = &result {
        log_diagnostics(state, &route, page);
    }

    let pane = ContentPane::from_result(route.clone(), result);
    let status = match &pane {
        ContentPane::NotFound { .. } => StatusCode::NOT_FOUND,
        ContentPane::Failed { message, .. } => {
            tracing::error!(route = %route, error = %message, "Failed to load page");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    };

    let sidebar = state.site.sidebar(Some(&route), false);
    (status, Html(render_shell(state.site.title(), &sidebar, &pane))).into_response()
}
