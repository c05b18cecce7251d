//! Shared helpers for HTML generation.

use std::collections::HashMap;

use pulldown_cmark::HeadingLevel;

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert heading text to a URL fragment.
///
/// Lowercases, keeps alphanumerics, and joins words with `-`.
/// Returns `"section"` when nothing is left.
#[must_use]
pub(crate) fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        "section".to_owned()
    } else {
        slug
    }
}

/// Hands out unique heading ids within one page.
#[derive(Debug, Default)]
pub(crate) struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    /// Unique id for `text`: `slug`, then `slug-1`, `slug-2`, ...
    pub(crate) fn unique(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let count = self.seen.entry(slug.clone()).or_insert(0);
        let id = if *count == 0 {
            slug
        } else {
            format!("{slug}-{count}")
        };
        *count += 1;
        id
    }
}

/// Convert heading level enum to number (1-6).
#[must_use]
pub(crate) fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Physical Quantities"), "physical-quantities");
        assert_eq!(slugify("1.2 Errors & Uncertainties"), "12-errors-uncertainties");
        assert_eq!(slugify("  SI_units  "), "si-units");
        assert_eq!(slugify("???"), "section");
    }

    #[test]
    fn test_slug_counter_disambiguates() {
        let mut counter = SlugCounter::default();
        assert_eq!(counter.unique("Example"), "example");
        assert_eq!(counter.unique("Example"), "example-1");
        assert_eq!(counter.unique("example"), "example-2");
        assert_eq!(counter.unique("Other"), "other");
    }
}
