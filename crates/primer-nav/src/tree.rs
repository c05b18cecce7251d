//! Navigation tree.
//!
//! The tree is static, ordered data: chapters with a base path and an
//! ordered list of sub-entries. It is validated once on construction and is
//! read-only afterwards.
//!
//! # TOML format
//!
//! ```toml
//! [[chapter]]
//! id = "measurements"
//! title = "1. Quantities and Measurements"
//! base_path = "/physics/measurements"
//! landing_path = "/physics/measurements/learning_outcomes"
//!
//! [[chapter.entry]]
//! title = "1.1 Physical Quantities and Prefixes"
//! path = "/physics/measurements/physical_quantities_prefixes"
//! ```

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::route::Route;

/// Stable chapter identifier.
///
/// Opaque: it is never derived from display text and may contain spaces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    /// Create a chapter id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChapterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A link under a chapter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SubEntry {
    /// Display text (e.g. "1.2 Errors and Uncertainties").
    pub title: String,
    /// Exact route of the page.
    pub path: Route,
}

/// A chapter in the navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Chapter {
    /// Accordion selection key.
    pub id: ChapterId,
    /// Display title.
    pub title: String,
    /// Route prefix; any route under it is inside this chapter.
    pub base_path: Route,
    /// Target of the chapter label. Falls back to `base_path`.
    #[serde(default)]
    pub landing_path: Option<Route>,
    /// Sub-entries in display order.
    #[serde(default, rename = "entry")]
    pub entries: Vec<SubEntry>,
}

impl Chapter {
    /// Route navigated to when the chapter label is activated.
    #[must_use]
    pub fn landing(&self) -> &Route {
        self.landing_path.as_ref().unwrap_or(&self.base_path)
    }

    /// True if `route` is inside this chapter.
    #[must_use]
    pub fn contains(&self, route: &Route) -> bool {
        route.starts_with(&self.base_path)
    }
}

/// Error raised when static navigation data is malformed.
///
/// Only reachable while building a [`NavTree`]; a constructed tree is valid.
#[derive(Debug, thiserror::Error)]
pub enum NavTreeError {
    /// Chapter at `index` has an empty id.
    #[error("chapter #{index} has an empty id")]
    EmptyId {
        /// Position of the chapter in declaration order.
        index: usize,
    },
    /// Two chapters share an id.
    #[error("duplicate chapter id: {0:?}")]
    DuplicateId(ChapterId),
    /// A chapter can never match because an earlier chapter covers its base path.
    #[error("base path {path} of chapter {later:?} is shadowed by earlier chapter {earlier:?}")]
    ShadowedBasePath {
        /// Chapter declared first.
        earlier: ChapterId,
        /// Chapter that can never be selected by route.
        later: ChapterId,
        /// Base path of the later chapter.
        path: Route,
    },
    /// TOML could not be parsed (including invalid routes).
    #[error("navigation parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Deserialize)]
struct NavFile {
    #[serde(default, rename = "chapter")]
    chapters: Vec<Chapter>,
}

/// Validated, ordered navigation tree.
#[derive(Clone, Debug, Default)]
pub struct NavTree {
    chapters: Vec<Chapter>,
}

impl NavTree {
    /// Build a tree from chapters in display order.
    ///
    /// # Errors
    ///
    /// Returns [`NavTreeError`] on an empty or duplicate id, or when a
    /// chapter's base path lies under an earlier chapter's base path.
    pub fn new(chapters: Vec<Chapter>) -> Result<Self, NavTreeError> {
        let mut seen = HashSet::with_capacity(chapters.len());

        for (index, chapter) in chapters.iter().enumerate() {
            if chapter.id.as_str().is_empty() {
                return Err(NavTreeError::EmptyId { index });
            }
            if !seen.insert(&chapter.id) {
                return Err(NavTreeError::DuplicateId(chapter.id.clone()));
            }
            if let Some(earlier) = chapters[..index]
                .iter()
                .find(|c| chapter.base_path.starts_with(&c.base_path))
            {
                return Err(NavTreeError::ShadowedBasePath {
                    earlier: earlier.id.clone(),
                    later: chapter.id.clone(),
                    path: chapter.base_path.clone(),
                });
            }
        }

        Ok(Self { chapters })
    }

    /// Parse and validate a tree from TOML.
    pub fn from_toml(content: &str) -> Result<Self, NavTreeError> {
        let file: NavFile = toml::from_str(content)?;
        Self::new(file.chapters)
    }

    /// Chapters in display order.
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Look up a chapter by id.
    #[must_use]
    pub fn chapter(&self, id: &ChapterId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| &c.id == id)
    }

    /// First chapter (in declaration order) whose base path contains `route`.
    #[must_use]
    pub fn chapter_containing(&self, route: &Route) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.contains(route))
    }

    /// Every route the tree links to: chapter landings and entries, in
    /// display order, without duplicates.
    #[must_use]
    pub fn linked_routes(&self) -> Vec<&Route> {
        let mut seen = HashSet::new();
        self.chapters
            .iter()
            .flat_map(|c| std::iter::once(c.landing()).chain(c.entries.iter().map(|e| &e.path)))
            .filter(|route| seen.insert(*route))
            .collect()
    }

    /// Number of chapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// True if the tree has no chapters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{chapter, physics_tree, route};
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_landing_defaults_to_base_path() {
        let mut c = chapter("a", "/a", &[]);
        assert_eq!(c.landing(), &route("/a"));

        c.landing_path = Some(route("/a/intro"));
        assert_eq!(c.landing(), &route("/a/intro"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = NavTree::new(vec![chapter("a", "/a", &[]), chapter("a", "/b", &[])]).unwrap_err();
        assert!(matches!(err, NavTreeError::DuplicateId(id) if id.as_str() == "a"));
    }

    #[test]
    fn test_empty_id_rejected() {
        let err = NavTree::new(vec![chapter("a", "/a", &[]), chapter("", "/b", &[])]).unwrap_err();
        assert!(matches!(err, NavTreeError::EmptyId { index: 1 }));
    }

    #[test]
    fn test_shadowed_base_path_rejected() {
        let err = NavTree::new(vec![
            chapter("outer", "/physics", &[]),
            chapter("inner", "/physics/measurements", &[]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            NavTreeError::ShadowedBasePath { ref earlier, ref later, .. }
                if earlier.as_str() == "outer" && later.as_str() == "inner"
        ));
    }

    #[test]
    fn test_nested_base_path_declared_first_is_allowed() {
        let tree = NavTree::new(vec![
            chapter("inner", "/physics/measurements", &[]),
            chapter("outer", "/physics", &[]),
        ])
        .unwrap();

        assert_eq!(
            tree.chapter_containing(&route("/physics/measurements/x"))
                .map(|c| c.id.as_str()),
            Some("inner")
        );
        assert_eq!(
            tree.chapter_containing(&route("/physics/waves"))
                .map(|c| c.id.as_str()),
            Some("outer")
        );
    }

    #[test]
    fn test_sibling_prefix_is_not_shadowing() {
        assert!(NavTree::new(vec![chapter("a", "/ab", &[]), chapter("b", "/abc", &[])]).is_ok());
    }

    #[test]
    fn test_chapter_containing() {
        let tree = physics_tree();
        let found = tree.chapter_containing(&route("/physics/measurements/errors_and_uncertainties"));
        assert_eq!(found.map(|c| c.id.as_str()), Some("measurements"));
        assert!(tree.chapter_containing(&route("/about")).is_none());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
[[chapter]]
id = "measurements"
title = "1. Quantities and Measurements"
base_path = "/physics/measurements"
landing_path = "/physics/measurements/learning_outcomes"

[[chapter.entry]]
title = "1.1 Physical Quantities and Prefixes"
path = "/physics/measurements/physical_quantities_prefixes"

[[chapter.entry]]
title = "1.2 Errors and Uncertainties"
path = "/physics/measurements/errors_and_uncertainties"

[[chapter]]
id = "Forces and Moments"
title = "2. Forces and Moments"
base_path = "/physics/forces_and_moments"
"#;
        let tree = NavTree::from_toml(toml).unwrap();

        assert_eq!(tree.len(), 2);
        let first = &tree.chapters()[0];
        assert_eq!(first.entries.len(), 2);
        assert_eq!(first.entries[1].title, "1.2 Errors and Uncertainties");
        assert_eq!(first.landing().as_str(), "/physics/measurements/learning_outcomes");
        assert_eq!(tree.chapters()[1].id.as_str(), "Forces and Moments");
        assert!(tree.chapters()[1].entries.is_empty());
    }

    #[test]
    fn test_from_toml_rejects_invalid_route() {
        let toml = r#"
[[chapter]]
id = "a"
title = "A"
base_path = "physics"
"#;
        assert!(matches!(NavTree::from_toml(toml), Err(NavTreeError::Parse(_))));
    }

    #[test]
    fn test_from_toml_empty_is_empty_tree() {
        let tree = NavTree::from_toml("").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_linked_routes_dedupes_in_order() {
        let mut c = chapter("a", "/a", &["/a/one", "/a/two"]);
        c.landing_path = Some(route("/a/one"));
        let tree = NavTree::new(vec![c, chapter("b", "/b", &[])]).unwrap();

        let routes: Vec<_> = tree.linked_routes().into_iter().map(Route::as_str).collect();
        assert_eq!(routes, vec!["/a/one", "/a/two", "/b"]);
    }
}
