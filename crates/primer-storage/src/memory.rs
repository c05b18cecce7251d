//! In-memory document source.

use std::collections::HashMap;

use primer_nav::Route;

use crate::source::{Document, DocumentSource, ResolveError};

/// Documents held in memory, keyed by route.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    documents: HashMap<Route, String>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document, builder style.
    ///
    /// # Panics
    ///
    /// Panics if `route` is not a valid route.
    #[must_use]
    pub fn with_document(mut self, route: &str, source: impl Into<String>) -> Self {
        let route = Route::parse(route).expect("invalid route literal");
        self.documents.insert(route, source.into());
        self
    }

    /// Add or replace a document.
    pub fn insert(&mut self, route: Route, source: impl Into<String>) {
        self.documents.insert(route, source.into());
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if the source holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn resolve(&self, route: &Route) -> Result<Document, ResolveError> {
        self.documents
            .get(route)
            .map(|source| Document::new(route.clone(), source.clone()))
            .ok_or_else(|| ResolveError::NotFound(route.clone()))
    }

    fn exists(&self, route: &Route) -> bool {
        self.documents.contains_key(route)
    }
}
