//! Document source trait and error types.

use std::path::PathBuf;

use primer_nav::Route;

/// Authored lesson content for a route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Route the document was resolved for.
    pub route: Route,
    /// Raw authored text (markdown with math and component tags).
    pub source: String,
}

impl Document {
    /// Create a document.
    #[must_use]
    pub fn new(route: Route, source: impl Into<String>) -> Self {
        Self {
            route,
            source: source.into(),
        }
    }
}

/// Error returned by [`DocumentSource::resolve`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No document exists for the route.
    #[error("no content for route {0}")]
    NotFound(Route),
    /// The document exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    /// True for [`ResolveError::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Source of authored documents, keyed by route.
///
/// Implementations must be deterministic: the same route resolves to the
/// same source text for the lifetime of the source.
pub trait DocumentSource: Send + Sync {
    /// Resolve the document for `route`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when no document exists for the
    /// route, or [`ResolveError::Io`] when it exists but cannot be read.
    fn resolve(&self, route: &Route) -> Result<Document, ResolveError>;

    /// Check whether a document exists for `route`.
    ///
    /// Errors other than not-found count as existing, so that callers
    /// surface them through [`resolve`](Self::resolve).
    fn exists(&self, route: &Route) -> bool {
        !matches!(self.resolve(route), Err(ResolveError::NotFound(_)))
    }
}

impl<T: DocumentSource + ?Sized> DocumentSource for std::sync::Arc<T> {
    fn resolve(&self, route: &Route) -> Result<Document, ResolveError> {
        (**self).resolve(route)
    }

    fn exists(&self, route: &Route) -> bool {
        (**self).exists(route)
    }
}
