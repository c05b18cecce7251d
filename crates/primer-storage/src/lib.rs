//! Document sources for Primer.
//!
//! A [`DocumentSource`] maps a [`Route`](primer_nav::Route) to the authored
//! lesson text for that page. The crate provides:
//!
//! - [`FsSource`]: lessons stored as `.mdx`/`.md` files under a content root
//! - [`MemorySource`]: in-memory documents for tests and embedding
//!
//! # Example
//!
//! ```
//! use primer_nav::Route;
//! use primer_storage::{DocumentSource, MemorySource, ResolveError};
//!
//! let source = MemorySource::new().with_document("/physics/measurements", "# Measurements");
//!
//! let doc = source.resolve(&Route::parse("/physics/measurements").unwrap()).unwrap();
//! assert_eq!(doc.source, "# Measurements");
//!
//! let missing = source.resolve(&Route::parse("/physics/unknown").unwrap());
//! assert!(matches!(missing, Err(ResolveError::NotFound(_))));
//! ```

mod fs;
mod memory;
mod source;

pub use fs::FsSource;
pub use memory::MemorySource;
pub use source::{Document, DocumentSource, ResolveError};
