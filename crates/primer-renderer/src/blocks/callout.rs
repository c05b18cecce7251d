//! Callout boxes.

use std::fmt::Write;
use std::str::FromStr;

use crate::registry::{BlockError, BlockInput, BlockRenderer};
use crate::util::escape_html;

/// Teaching intent of a callout. Selects its styling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalloutKind {
    #[default]
    Definition,
    Exam,
    Tips,
    Advanced,
}

impl CalloutKind {
    /// CSS modifier: `callout-{name}`.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Exam => "exam",
            Self::Tips => "tips",
            Self::Advanced => "advanced",
        }
    }
}

impl FromStr for CalloutKind {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "definition" => Ok(Self::Definition),
            "exam" => Ok(Self::Exam),
            "tips" => Ok(Self::Tips),
            "advanced" => Ok(Self::Advanced),
            other => Err(BlockError::new(format!(
                "unknown callout type {other:?} (expected definition, exam, tips or advanced)"
            ))),
        }
    }
}

/// Callout box.
///
/// Attributes: `type` (default `definition`), `title`, and
/// `backgroundColor`, which replaces the type's background.
#[derive(Clone, Copy, Debug, Default)]
pub struct Callout;

impl BlockRenderer for Callout {
    fn render(&self, input: &BlockInput<'_>) -> Result<String, BlockError> {
        let kind = input
            .attrs
            .text("type")
            .map_or(Ok(CalloutKind::default()), str::parse)?;

        let mut html = format!(r#"<div class="callout callout-{}""#, kind.name());
        if let Some(color) = input.attrs.text("backgroundColor") {
            if !is_safe_color(color) {
                return Err(BlockError::new(format!("invalid backgroundColor {color:?}")));
            }
            write!(html, r#" style="background-color: {color}""#).unwrap();
        }
        html.push('>');

        if let Some(title) = input.attrs.text("title").filter(|t| !t.is_empty()) {
            write!(html, r#"<div class="callout-title">{}</div>"#, escape_html(title)).unwrap();
        }
        write!(html, r#"<div class="callout-body">{}</div></div>"#, input.children_html).unwrap();

        Ok(html)
    }
}

/// Colors are limited to names, hex and functional notation.
fn is_safe_color(color: &str) -> bool {
    !color.trim().is_empty()
        && color
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '#' | '(' | ')' | ',' | '.' | '%' | ' ' | '-'))
}
