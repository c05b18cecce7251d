//! Navigation API endpoint.
//!
//! Returns the sidebar for a route: which chapter is expanded and which
//! link is active.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use primer_nav::{Route, SidebarView};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Query for GET /api/navigation.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NavigationQuery {
    /// Current route; omitted before the first navigation.
    route: Option<String>,
    /// Sidebar collapsed to its rail.
    #[serde(default)]
    collapsed: bool,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NavigationQuery>,
) -> Result<Json<SidebarView>, ApiError> {
    let route = query.route.as_deref().map(Route::parse).transpose()?;
    Ok(Json(state.site.sidebar(route.as_ref(), query.collapsed)))
}
