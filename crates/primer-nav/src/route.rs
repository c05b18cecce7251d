//! Route values.
//!
//! A [`Route`] is the logical address of a page. Routes are normalized on
//! construction so that comparisons between them are plain string
//! comparisons:
//!
//! - always a leading `/`
//! - no trailing `/` (except the root route `/`)
//! - repeated slashes collapsed
//! - query string and fragment stripped
//!
//! `.` and `..` segments are rejected, which keeps a route safe to map onto
//! a content directory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a valid route.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Route does not start with `/`.
    #[error("route must start with '/': {0:?}")]
    MissingLeadingSlash(String),
    /// Route contains a `.` or `..` segment.
    #[error("route contains a relative segment: {0:?}")]
    RelativeSegment(String),
}

/// Normalized route path.
///
/// # Example
///
/// ```
/// use primer_nav::Route;
///
/// let route = Route::parse("/physics//measurements/?tab=1").unwrap();
/// assert_eq!(route.as_str(), "/physics/measurements");
///
/// let chapter = Route::parse("/physics").unwrap();
/// assert!(route.starts_with(&chapter));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route(String);

impl Route {
    /// The root route `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Parse and normalize a route.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let path = raw.find(['?', '#']).map_or(raw, |idx| &raw[..idx]);

        if !path.starts_with('/') {
            return Err(RouteError::MissingLeadingSlash(raw.to_owned()));
        }

        let mut normalized = String::with_capacity(path.len());
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." {
                return Err(RouteError::RelativeSegment(raw.to_owned()));
            }
            normalized.push('/');
            normalized.push_str(segment);
        }

        if normalized.is_empty() {
            normalized.push('/');
        }

        Ok(Self(normalized))
    }

    /// Route as a string slice (with leading slash).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the root route `/`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, in order. Empty for the root route.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Route without the leading slash (`""` for root).
    #[must_use]
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Segment-aware prefix test.
    ///
    /// `/a/b` starts with `/a/b` and `/a`, but `/a/bc` does not start with
    /// `/a/b`. Every route starts with `/`.
    #[must_use]
    pub fn starts_with(&self, prefix: &Route) -> bool {
        if prefix.is_root() || self.0 == prefix.0 {
            return true;
        }
        self.0.starts_with(&prefix.0) && self.0.as_bytes().get(prefix.0.len()) == Some(&b'/')
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Route {
    type Error = RouteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.0
    }
}

impl AsRef<str> for Route {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(s: &str) -> Route {
        Route::parse(s).unwrap()
    }

    #[test]
    fn test_parse_normalizes_slashes() {
        assert_eq!(route("/a//b/").as_str(), "/a/b");
        assert_eq!(route("/").as_str(), "/");
        assert_eq!(route("//").as_str(), "/");
    }

    #[test]
    fn test_parse_strips_query_and_fragment() {
        assert_eq!(route("/a/b?x=1").as_str(), "/a/b");
        assert_eq!(route("/a/b#section").as_str(), "/a/b");
        assert_eq!(route("/?x").as_str(), "/");
    }

    #[test]
    fn test_parse_rejects_relative() {
        assert_eq!(
            Route::parse("physics"),
            Err(RouteError::MissingLeadingSlash("physics".to_owned()))
        );
        assert!(matches!(
            Route::parse("/a/../etc"),
            Err(RouteError::RelativeSegment(_))
        ));
        assert!(matches!(
            Route::parse("/a/./b"),
            Err(RouteError::RelativeSegment(_))
        ));
    }

    #[test]
    fn test_starts_with_is_segment_aware() {
        let base = route("/physics/measurements");
        assert!(route("/physics/measurements").starts_with(&base));
        assert!(route("/physics/measurements/errors").starts_with(&base));
        assert!(!route("/physics/measurementsx").starts_with(&base));
        assert!(!route("/physics").starts_with(&base));
    }

    #[test]
    fn test_everything_starts_with_root() {
        assert!(route("/about").starts_with(&Route::root()));
        assert!(Route::root().starts_with(&Route::root()));
    }

    #[test]
    fn test_segments_and_relative() {
        let r = route("/physics/measurements");
        assert_eq!(r.segments().collect::<Vec<_>>(), vec!["physics", "measurements"]);
        assert_eq!(r.relative(), "physics/measurements");
        assert_eq!(Route::root().segments().count(), 0);
        assert_eq!(Route::root().relative(), "");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let json = serde_json::to_string(&route("/a/b")).unwrap();
        assert_eq!(json, r#""/a/b""#);

        let bad: Result<Route, _> = serde_json::from_str(r#""a/b""#);
        assert!(bad.is_err());
    }
}
