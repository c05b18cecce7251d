//! Application state.
//!
//! Shared, immutable state for all request handlers.

use std::sync::Arc;

use primer_site::Site;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Navigation tree, document source and registries.
    pub(crate) site: Arc<Site>,
    /// Log per-page diagnostics as warnings.
    pub(crate) verbose: bool,
    /// Application version for `ETag` computation.
    pub(crate) version: String,
}
