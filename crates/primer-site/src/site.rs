//! Site: navigation tree, document source and block registries.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use primer_nav::{
    AccordionState, NavTree, NavTreeError, Route, SidebarView, reconcile, sidebar_view,
};
use primer_renderer::{
    BlockRegistry, BlockRenderer, BuiltinBlock, ComposedPage, builtin_registry, compose,
};
use primer_storage::{DocumentSource, FsSource, ResolveError};

/// Error loading a site from disk.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Navigation file could not be read.
    #[error("failed to read navigation file {}: {source}", path.display())]
    Io {
        /// Navigation file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Navigation file is not a valid tree.
    #[error("invalid navigation file {}: {source}", path.display())]
    Navigation {
        /// Navigation file path.
        path: PathBuf,
        /// Validation or parse error.
        #[source]
        source: NavTreeError,
    },
    /// Content directory does not exist.
    #[error("content directory not found: {}", .0.display())]
    MissingContent(PathBuf),
}

/// Configuration for [`Site`].
#[derive(Clone, Debug)]
pub struct SiteConfig {
    /// Site title shown in the sidebar and the browser tab.
    pub title: String,
    /// Extra component names bound to a built-in kind.
    pub aliases: BTreeMap<String, BuiltinBlock>,
    /// Routes whose pages may only use the listed component names.
    pub page_blocks: HashMap<Route, Vec<String>>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Primer".to_owned(),
            aliases: BTreeMap::new(),
            page_blocks: HashMap::new(),
        }
    }
}

/// Immutable site: everything needed to render any route.
///
/// Safe to share across threads; rendering takes `&self`.
pub struct Site {
    title: String,
    tree: Arc<NavTree>,
    source: Arc<dyn DocumentSource>,
    registry: BlockRegistry,
    page_blocks: HashMap<Route, Vec<String>>,
}

impl Site {
    /// Create a site. The registry holds every built-in under its default
    /// name plus the configured aliases.
    #[must_use]
    pub fn new(tree: Arc<NavTree>, source: Arc<dyn DocumentSource>, config: SiteConfig) -> Self {
        let mut registry = builtin_registry();
        for (name, block) in &config.aliases {
            registry.insert_shared(name.clone(), block.renderer());
        }

        Self {
            title: config.title,
            tree,
            source,
            registry,
            page_blocks: config.page_blocks,
        }
    }

    /// Load the navigation tree from `navigation` and serve documents from
    /// the `content` directory.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if the navigation file is unreadable or invalid,
    /// or the content directory does not exist.
    pub fn load(navigation: &Path, content: &Path, config: SiteConfig) -> Result<Self, SiteError> {
        let text = std::fs::read_to_string(navigation).map_err(|source| SiteError::Io {
            path: navigation.to_path_buf(),
            source,
        })?;
        let tree = NavTree::from_toml(&text).map_err(|source| SiteError::Navigation {
            path: navigation.to_path_buf(),
            source,
        })?;
        if !content.is_dir() {
            return Err(SiteError::MissingContent(content.to_path_buf()));
        }

        tracing::info!(
            navigation = %navigation.display(),
            content = %content.display(),
            chapters = tree.len(),
            "Loaded site"
        );
        Ok(Self::new(
            Arc::new(tree),
            Arc::new(FsSource::new(content)),
            config,
        ))
    }

    /// Register a custom renderer, builder style.
    #[must_use]
    pub fn with_renderer(
        mut self,
        name: impl Into<String>,
        renderer: impl BlockRenderer + 'static,
    ) -> Self {
        self.registry.register(name, renderer);
        self
    }

    /// Site title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Navigation tree.
    #[must_use]
    pub fn tree(&self) -> &Arc<NavTree> {
        &self.tree
    }

    /// Site-wide registry.
    #[must_use]
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Registry used for `route`: restricted to the route's configured
    /// names when it has any, the site-wide registry otherwise.
    #[must_use]
    pub fn registry_for(&self, route: &Route) -> Cow<'_, BlockRegistry> {
        match self.page_blocks.get(route) {
            Some(names) => Cow::Owned(self.registry.restrict(names.iter().map(String::as_str))),
            None => Cow::Borrowed(&self.registry),
        }
    }

    /// Resolve and compose the page at `route`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the document is missing or unreadable.
    pub fn render(&self, route: &Route) -> Result<ComposedPage, ResolveError> {
        let document = self.source.resolve(route)?;
        let page = compose(&document.source, &self.registry_for(route));
        tracing::debug!(
            route = %route,
            diagnostics = page.diagnostics.len(),
            "Composed page"
        );
        Ok(page)
    }

    /// Sidebar for a freshly loaded `route`, with the containing chapter
    /// expanded.
    #[must_use]
    pub fn sidebar(&self, route: Option<&Route>, collapsed: bool) -> SidebarView {
        let state = route.map_or_else(AccordionState::collapsed, |r| reconcile(&self.tree, r));
        sidebar_view(&self.tree, &state, route, collapsed)
    }

    /// Every route the site links to: the root, chapter landings and
    /// entries, without duplicates.
    #[must_use]
    pub fn routes(&self) -> Vec<Route> {
        let mut routes = vec![Route::root()];
        for route in self.tree.linked_routes() {
            if !routes.contains(route) {
                routes.push(route.clone());
            }
        }
        routes
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("title", &self.title)
            .field("chapters", &self.tree.len())
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
