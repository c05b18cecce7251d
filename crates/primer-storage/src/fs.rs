//! Filesystem document source.
//!
//! Lessons live under a content root. A route `/a/b` resolves to the first
//! existing file of:
//!
//! 1. `a/b.mdx`
//! 2. `a/b.md`
//! 3. `a/b/index.mdx`
//! 4. `a/b/index.md`
//! 5. `a/b/content.mdx`
//!
//! The root route resolves to `index.mdx` or `index.md`.

use std::fs;
use std::path::{Path, PathBuf};

use primer_nav::Route;

use crate::source::{Document, DocumentSource, ResolveError};

/// Lesson extensions, in lookup order.
const EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Document source backed by a content directory.
#[derive(Clone, Debug)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    /// Create a source reading from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate files for `route`, in lookup order.
    ///
    /// Route segments never contain `.` or `..`, so every candidate stays
    /// inside the content root.
    #[must_use]
    pub fn candidates(&self, route: &Route) -> Vec<PathBuf> {
        let mut dir = self.root.clone();
        dir.extend(route.segments());

        if route.is_root() {
            return EXTENSIONS
                .iter()
                .map(|ext| dir.join(format!("index.{ext}")))
                .collect();
        }

        let mut candidates: Vec<PathBuf> = EXTENSIONS
            .iter()
            .map(|ext| {
                let mut file = dir.clone().into_os_string();
                file.push(".");
                file.push(ext);
                PathBuf::from(file)
            })
            .collect();
        candidates.extend(EXTENSIONS.iter().map(|ext| dir.join(format!("index.{ext}"))));
        candidates.push(dir.join("content.mdx"));
        candidates
    }

    /// First existing candidate file for `route`.
    #[must_use]
    pub fn locate(&self, route: &Route) -> Option<PathBuf> {
        self.candidates(route).into_iter().find(|p| p.is_file())
    }
}

impl DocumentSource for FsSource {
    fn resolve(&self, route: &Route) -> Result<Document, ResolveError> {
        let Some(path) = self.locate(route) else {
            tracing::debug!(route = %route, root = %self.root.display(), "No document found");
            return Err(ResolveError::NotFound(route.clone()));
        };

        let source = fs::read_to_string(&path).map_err(|source| ResolveError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::trace!(route = %route, path = %path.display(), "Resolved document");

        Ok(Document::new(route.clone(), source))
    }

    fn exists(&self, route: &Route) -> bool {
        self.locate(route).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn route(s: &str) -> Route {
        Route::parse(s).unwrap()
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_fs_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FsSource>();
    }

    #[test]
    fn test_candidates_order() {
        let source = FsSource::new("/content");
        let names: Vec<_> = source
            .candidates(&route("/physics/measurements"))
            .into_iter()
            .map(|p| p.strip_prefix("/content").unwrap().display().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "physics/measurements.mdx",
                "physics/measurements.md",
                "physics/measurements/index.mdx",
                "physics/measurements/index.md",
                "physics/measurements/content.mdx",
            ]
        );
    }

    #[test]
    fn test_candidates_for_root() {
        let source = FsSource::new("/content");
        assert_eq!(
            source.candidates(&Route::root()),
            vec![
                PathBuf::from("/content/index.mdx"),
                PathBuf::from("/content/index.md")
            ]
        );
    }

    #[test]
    fn test_resolve_flat_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "about.md", "# About");

        let doc = FsSource::new(dir.path()).resolve(&route("/about")).unwrap();

        assert_eq!(doc.route, route("/about"));
        assert_eq!(doc.source, "# About");
    }

    #[test]
    fn test_resolve_content_mdx_layout() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "physics/measurements/errors_and_uncertainties/content.mdx",
            "# Errors",
        );

        let doc = FsSource::new(dir.path())
            .resolve(&route("/physics/measurements/errors_and_uncertainties"))
            .unwrap();

        assert_eq!(doc.source, "# Errors");
    }

    #[test]
    fn test_dotted_segment_keeps_full_name() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes/v1.2.md", "dotted");

        let doc = FsSource::new(dir.path()).resolve(&route("/notes/v1.2")).unwrap();

        assert_eq!(doc.source, "dotted");
    }

    #[test]
    fn test_mdx_preferred_over_md() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.md", "md");
        write(dir.path(), "a.mdx", "mdx");
        write(dir.path(), "a/index.mdx", "index");

        let doc = FsSource::new(dir.path()).resolve(&route("/a")).unwrap();

        assert_eq!(doc.source, "mdx");
    }

    #[test]
    fn test_resolve_root_index() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.md", "home");

        let doc = FsSource::new(dir.path()).resolve(&Route::root()).unwrap();

        assert_eq!(doc.source, "home");
    }

    #[test]
    fn test_directory_is_not_a_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a.mdx")).unwrap();

        let source = FsSource::new(dir.path());

        assert!(!source.exists(&route("/a")));
        assert!(source.resolve(&route("/a")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsSource::new(dir.path())
            .resolve(&route("/physics/nope"))
            .unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(r) if r == route("/physics/nope")));
    }

    #[test]
    fn test_missing_root_dir() {
        let source = FsSource::new("/nonexistent/primer/content");
        assert!(!source.exists(&Route::root()));
    }
}
