//! Shell stylesheet and script.

use axum::http::header;
use axum::response::IntoResponse;
use primer_site::{SCRIPT, STYLESHEET};

const CACHE_CONTROL: &str = "public, max-age=3600";

/// Handle GET /assets/primer.css.
pub(crate) async fn get_stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        STYLESHEET,
    )
}

/// Handle GET /assets/primer.js.
pub(crate) async fn get_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, CACHE_CONTROL),
        ],
        SCRIPT,
    )
}
