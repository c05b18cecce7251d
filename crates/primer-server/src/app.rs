//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use primer_site::{SCRIPT_PATH, STYLESHEET_PATH};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/api/navigation", get(handlers::navigation::get_navigation))
        .route("/api/pages/", get(handlers::pages::get_root_page))
        .route("/api/pages/{*path}", get(handlers::pages::get_page));

    let asset_routes = Router::new()
        .route(STYLESHEET_PATH, get(handlers::assets::get_stylesheet))
        .route(SCRIPT_PATH, get(handlers::assets::get_script));

    let shell_routes = Router::new()
        .route("/", get(handlers::shell::get_root_shell))
        .route("/{*path}", get(handlers::shell::get_shell));

    Router::new()
        .merge(api_routes)
        .merge(asset_routes)
        .merge(shell_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}
