//! Server errors.

use std::net::AddrParseError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use primer_nav::{Route, RouteError};
use primer_site::{ContentPane, SiteError, render_pane};
use primer_storage::ResolveError;
use serde::Serialize;

/// Error returned by `run_server` before the server starts accepting
/// requests.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Site could not be loaded.
    #[error(transparent)]
    Site(#[from] SiteError),
    /// Host and port do not form a socket address.
    #[error("invalid listen address {address}: {source}")]
    Address {
        /// Address as configured.
        address: String,
        /// Parse error.
        #[source]
        source: AddrParseError,
    },
    /// Binding or serving failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ApiError {
    /// No document for the route.
    #[error("page not found: {0}")]
    PageNotFound(Route),
    /// Request path is not a valid route.
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
    /// The document exists but could not be read.
    #[error("failed to load {route}")]
    Unreadable {
        /// Requested route.
        route: Route,
        /// Underlying error.
        #[source]
        source: ResolveError,
    },
}

impl ApiError {
    /// Classify a resolution failure for `route`.
    pub(crate) fn from_resolve(route: Route, err: ResolveError) -> Self {
        if err.is_not_found() {
            Self::PageNotFound(route)
        } else {
            Self::Unreadable { route, source: err }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<Route>,
    /// Content pane fragment to show in place of the page.
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        let (status, body) = match self {
            Self::PageNotFound(route) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error,
                    content: Some(render_pane(&ContentPane::NotFound {
                        route: route.clone(),
                    })),
                    route: Some(route),
                },
            ),
            Self::InvalidRoute(_) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error,
                    route: None,
                    content: None,
                },
            ),
            Self::Unreadable { route, source } => {
                tracing::error!(route = %route, error = %source, "Failed to load page");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error,
                        route: Some(route),
                        content: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
