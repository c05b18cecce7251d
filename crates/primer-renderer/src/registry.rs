//! Block registry.
//!
//! Maps component names to renderers. Composition looks renderers up by
//! name only, so two pages composed with the same registry and source always
//! produce the same output.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::attrs::BlockAttrs;

/// Everything a renderer sees of one component block.
#[derive(Clone, Copy, Debug)]
pub struct BlockInput<'a> {
    /// Tag name as authored (an alias when one is configured).
    pub name: &'a str,
    /// Parsed attributes.
    pub attrs: &'a BlockAttrs,
    /// Children, already composed to HTML.
    pub children_html: &'a str,
    /// Children as authored.
    pub children_source: &'a str,
    /// Line of the opening tag (1-based).
    pub line: usize,
}

/// Renderer failure. Contained to the block that caused it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct BlockError(String);

impl BlockError {
    /// Create an error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Renders one kind of component block to HTML.
///
/// Closures with the right signature implement this trait:
///
/// ```
/// use primer_renderer::{BlockError, BlockInput, BlockRegistry};
///
/// let registry = BlockRegistry::new().with("Hello", |input: &BlockInput<'_>| {
///     Ok::<_, BlockError>(format!("<b>{}</b>", input.children_html))
/// });
/// assert!(registry.contains("Hello"));
/// ```
pub trait BlockRenderer: Send + Sync {
    /// Render the block.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError`] when the input cannot be rendered; the block is
    /// then replaced by an error fragment.
    fn render(&self, input: &BlockInput<'_>) -> Result<String, BlockError>;
}

impl<F> BlockRenderer for F
where
    F: Fn(&BlockInput<'_>) -> Result<String, BlockError> + Send + Sync,
{
    fn render(&self, input: &BlockInput<'_>) -> Result<String, BlockError> {
        self(input)
    }
}

/// Name to renderer mapping. Keys are unique; registering a name again
/// replaces its renderer.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    renderers: HashMap<String, Arc<dyn BlockRenderer>>,
}

impl BlockRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, renderer: impl BlockRenderer + 'static) -> Self {
        self.register(name, renderer);
        self
    }

    /// Register a renderer, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        renderer: impl BlockRenderer + 'static,
    ) -> Option<Arc<dyn BlockRenderer>> {
        self.insert_shared(name, Arc::new(renderer))
    }

    /// Register an already shared renderer.
    pub fn insert_shared(
        &mut self,
        name: impl Into<String>,
        renderer: Arc<dyn BlockRenderer>,
    ) -> Option<Arc<dyn BlockRenderer>> {
        self.renderers.insert(name.into(), renderer)
    }

    /// Renderer for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn BlockRenderer>> {
        self.renderers.get(name)
    }

    /// True if `name` has a renderer.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.renderers.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registry holding only the listed names that are registered here.
    ///
    /// Renderers are shared, not copied.
    #[must_use]
    pub fn restrict<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let renderers = names
            .into_iter()
            .filter_map(|name| {
                self.renderers
                    .get(name)
                    .map(|renderer| (name.to_owned(), Arc::clone(renderer)))
            })
            .collect();
        Self { renderers }
    }

    /// Number of registered names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRegistry")
            .field("names", &self.names())
            .finish()
    }
}
