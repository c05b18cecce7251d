//! Pages API endpoint.
//!
//! Composes a page and returns it as JSON with its table of contents and
//! diagnostics.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use md5::{Digest, Md5};
use primer_nav::Route;
use primer_renderer::{Diagnostic, TocEntry};
use serde::Serialize;

use crate::error::ApiError;
use crate::handlers::{log_diagnostics, route_from_path};
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Debug, Serialize)]
pub(crate) struct PageResponse {
    /// Normalized route.
    route: Route,
    /// Page title (first H1).
    title: Option<String>,
    /// Table of contents entries.
    toc: Vec<TocEntry>,
    /// Rendered HTML content.
    content: String,
    /// Contained per-block failures.
    diagnostics: Vec<Diagnostic>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    get_page_impl(Route::root(), &state, &headers)
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    get_page_impl(route_from_path(&path)?, &state, &headers)
}

fn get_page_impl(
    route: Route,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let page = match state.site.render(&route) {
        Ok(page) => page,
        Err(err) => return Err(ApiError::from_resolve(route, err)),
    };
    log_diagnostics(state, &route, &page);

    let etag = compute_etag(&state.version, &page.html);
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = PageResponse {
        route,
        title: page.title,
        toc: page.toc,
        content: page.html,
        diagnostics: page.diagnostics,
    };

    Ok((
        [
            (header::ETAG, etag),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Json(response),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// MD5 truncated to 64 bits (16 hex chars).
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_etag_includes_version() {
        assert_ne!(
            compute_etag("0.1.0", "content"),
            compute_etag("0.1.1", "content")
        );
    }

    #[test]
    fn test_compute_etag_includes_content() {
        assert_ne!(
            compute_etag("0.1.0", "content1"),
            compute_etag("0.1.0", "content2")
        );
    }

    #[test]
    fn test_compute_etag_format() {
        let etag = compute_etag("0.1.0", "content");

        assert!(etag.starts_with('"'));
        assert!(etag.ends_with('"'));
        assert_eq!(etag.len(), 18);
    }
}
