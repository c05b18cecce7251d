//! Page composition.
//!
//! Turns an authored document and a [`BlockRegistry`] into a page:
//!
//! 1. [`parse`] splits the document into markdown segments and components.
//! 2. Markdown segments render to HTML, math spans expand to MathML.
//! 3. Components compose their children first, then call the registered
//!    renderer; unknown names render a placeholder.
//! 4. Fragments concatenate in source order.
//!
//! Nothing aborts composition. Every contained failure is listed in
//! [`ComposedPage::diagnostics`].

use std::fmt::Write;

use crate::diagnostic::Diagnostic;
use crate::html::{HtmlRenderer, TocEntry};
use crate::parse::{Block, CustomBlock, parse};
use crate::registry::{BlockInput, BlockRegistry};
use crate::util::escape_html;

/// A composed page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ComposedPage {
    /// Page body HTML.
    pub html: String,
    /// Text of the first H1.
    pub title: Option<String>,
    /// H2-H6 headings in order.
    pub toc: Vec<TocEntry>,
    /// Contained failures, ordered by line.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compose `source` with the renderers in `registry`.
///
/// # Example
///
/// ```
/// use primer_renderer::{BlockRegistry, compose};
///
/// let page = compose("# Units\n\n<Quiz />\n", &BlockRegistry::new());
/// assert_eq!(page.title.as_deref(), Some("Units"));
/// assert!(page.html.contains("Unregistered block"));
/// assert_eq!(page.diagnostics.len(), 1);
/// ```
#[must_use]
pub fn compose(source: &str, registry: &BlockRegistry) -> ComposedPage {
    let parsed = parse(source);
    let mut composer = Composer {
        registry,
        renderer: HtmlRenderer::new(),
        diagnostics: parsed.diagnostics,
    };

    let html = composer.blocks(&parsed.blocks);

    let summary = composer.renderer.finish();
    let mut diagnostics = composer.diagnostics;
    diagnostics.extend(summary.diagnostics);
    diagnostics.sort_by_key(Diagnostic::line);

    for diagnostic in &diagnostics {
        tracing::debug!(%diagnostic, "Composition diagnostic");
    }

    ComposedPage {
        html,
        title: summary.title,
        toc: summary.toc,
        diagnostics,
    }
}

struct Composer<'r> {
    registry: &'r BlockRegistry,
    renderer: HtmlRenderer,
    diagnostics: Vec<Diagnostic>,
}

impl Composer<'_> {
    fn blocks(&mut self, blocks: &[Block]) -> String {
        let mut html = String::new();
        for block in blocks {
            match block {
                Block::Markdown(segment) => {
                    html.push_str(&self.renderer.render_segment(&segment.text, segment.line));
                }
                Block::Custom(custom) => html.push_str(&self.custom(custom)),
            }
        }
        html
    }

    fn custom(&mut self, block: &CustomBlock) -> String {
        let children_html = self.blocks(&block.children);

        let Some(renderer) = self.registry.get(&block.name) else {
            self.diagnostics.push(Diagnostic::UnregisteredBlockType {
                line: block.line,
                name: block.name.clone(),
            });
            return unregistered_placeholder(&block.name, &children_html);
        };

        let input = BlockInput {
            name: &block.name,
            attrs: &block.attrs,
            children_html: &children_html,
            children_source: &block.body,
            line: block.line,
        };
        match renderer.render(&input) {
            Ok(html) => html,
            Err(err) => {
                let message = err.to_string();
                let fragment = error_fragment(&block.name, &message, &children_html);
                self.diagnostics.push(Diagnostic::BlockRenderFailed {
                    line: block.line,
                    name: block.name.clone(),
                    message,
                });
                fragment
            }
        }
    }
}

/// Visible stand-in for a component with no renderer. Keeps the children.
fn unregistered_placeholder(name: &str, children_html: &str) -> String {
    let name = escape_html(name);
    let mut html = String::new();
    write!(
        html,
        r#"<div class="block-unregistered" data-block="{name}"><p class="block-unregistered-label">Unregistered block: <code>{name}</code></p>{children_html}</div>"#
    )
    .unwrap();
    html
}

/// Stand-in for a component whose renderer failed. Keeps the children.
fn error_fragment(name: &str, message: &str, children_html: &str) -> String {
    format!(
        r#"<div class="block-error" data-block="{name}"><p class="block-error-label"><code>{name}</code> could not be rendered: {message}</p>{children_html}</div>"#,
        name = escape_html(name),
        message = escape_html(message)
    )
}
