//! Block structure parsing.
//!
//! Splits an authored document into markdown segments and component blocks.
//! A component is a capitalized tag alone on its line:
//!
//! ```text
//! <Callout type="exam" title="Units">
//! Always state the **SI unit**.
//! </Callout>
//!
//! <BaseUnitTable />
//!
//! <Callout title="One line">Short note.</Callout>
//! ```
//!
//! Lowercase tags are plain HTML and stay in the markdown. Lines inside
//! fenced code blocks are never tags. Structural errors are reported as
//! [`Diagnostic`]s and repaired: a block left open is closed where its parent
//! closes or at end of input, and a stray closing tag stays as text.

use crate::attrs::{BlockAttrs, matching_brace};
use crate::diagnostic::Diagnostic;
use crate::fence::FenceTracker;

/// A run of plain markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Markdown text, newline-terminated lines.
    pub text: String,
    /// Line of the first text line (1-based).
    pub line: usize,
}

/// A component block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomBlock {
    /// Tag name, e.g. `Callout`.
    pub name: String,
    /// Parsed attributes.
    pub attrs: BlockAttrs,
    /// Child blocks, in source order.
    pub children: Vec<Block>,
    /// Raw source between the opening and closing tags.
    pub body: String,
    /// Line of the opening tag (1-based).
    pub line: usize,
}

/// One top-level unit of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Plain markdown.
    Markdown(Segment),
    /// Component with children.
    Custom(CustomBlock),
}

/// Result of [`parse`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Blocks in source order.
    pub blocks: Vec<Block>,
    /// Structural problems found while parsing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a document into blocks.
#[must_use]
pub fn parse(source: &str) -> ParsedDocument {
    let lines: Vec<&str> = source.lines().collect();
    let mut fence = FenceTracker::new();
    let mut stack = vec![Frame::root()];
    let mut diagnostics = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;
        let was_in_fence = fence.in_fence();
        if fence.update(line) || was_in_fence {
            top(&mut stack).push_line(line, lineno);
            continue;
        }

        match parse_tag_line(line) {
            None => top(&mut stack).push_line(line, lineno),
            Some(TagLine::Open { name, attrs }) => {
                top(&mut stack).flush();
                stack.push(Frame::new(name, attrs, lineno, idx + 1));
            }
            Some(TagLine::SelfClosing { name, attrs }) => {
                let frame = top(&mut stack);
                frame.flush();
                frame.blocks.push(Block::Custom(CustomBlock {
                    name: name.to_owned(),
                    attrs,
                    children: Vec::new(),
                    body: String::new(),
                    line: lineno,
                }));
            }
            Some(TagLine::Inline {
                name,
                attrs,
                content,
            }) => {
                let frame = top(&mut stack);
                frame.flush();
                let children = if content.is_empty() {
                    Vec::new()
                } else {
                    vec![Block::Markdown(Segment {
                        text: format!("{content}\n"),
                        line: lineno,
                    })]
                };
                frame.blocks.push(Block::Custom(CustomBlock {
                    name: name.to_owned(),
                    attrs,
                    children,
                    body: content.to_owned(),
                    line: lineno,
                }));
            }
            Some(TagLine::Close { name }) => {
                let open = stack.iter().skip(1).rposition(|f| f.name == name);
                if let Some(pos) = open.map(|p| p + 1) {
                    while stack.len() > pos + 1 {
                        close_top(&mut stack, &lines, idx, &mut diagnostics, true);
                    }
                    close_top(&mut stack, &lines, idx, &mut diagnostics, false);
                } else {
                    diagnostics.push(Diagnostic::UnexpectedClosingTag {
                        line: lineno,
                        name: name.to_owned(),
                    });
                    top(&mut stack).push_line(line, lineno);
                }
            }
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack, &lines, lines.len(), &mut diagnostics, true);
    }

    let mut root = stack.pop().unwrap_or_else(Frame::root);
    root.flush();
    ParsedDocument {
        blocks: root.blocks,
        diagnostics,
    }
}

/// Open component during parsing. The bottom frame is the document itself.
#[derive(Debug)]
struct Frame {
    name: String,
    attrs: BlockAttrs,
    line: usize,
    body_start: usize,
    blocks: Vec<Block>,
    text: String,
    text_line: usize,
}

impl Frame {
    fn root() -> Self {
        Self::new("", BlockAttrs::default(), 0, 0)
    }

    fn new(name: &str, attrs: BlockAttrs, line: usize, body_start: usize) -> Self {
        Self {
            name: name.to_owned(),
            attrs,
            line,
            body_start,
            blocks: Vec::new(),
            text: String::new(),
            text_line: 0,
        }
    }

    fn push_line(&mut self, line: &str, lineno: usize) {
        if self.text.is_empty() {
            self.text_line = lineno;
        }
        self.text.push_str(line);
        self.text.push('\n');
    }

    fn flush(&mut self) {
        let text = std::mem::take(&mut self.text);
        if !text.trim().is_empty() {
            self.blocks.push(Block::Markdown(Segment {
                text,
                line: self.text_line,
            }));
        }
    }
}

fn top(stack: &mut [Frame]) -> &mut Frame {
    let last = stack.len() - 1;
    &mut stack[last]
}

/// Pop the innermost frame and attach it to its parent.
///
/// `end` is the index of the first line after the block body.
fn close_top(
    stack: &mut Vec<Frame>,
    lines: &[&str],
    end: usize,
    diagnostics: &mut Vec<Diagnostic>,
    unclosed: bool,
) {
    let Some(mut frame) = stack.pop() else {
        return;
    };
    if unclosed {
        diagnostics.push(Diagnostic::UnclosedBlock {
            line: frame.line,
            name: frame.name.clone(),
        });
    }
    frame.flush();

    let body = lines
        .get(frame.body_start..end)
        .map(|body| body.join("\n"))
        .unwrap_or_default();
    let block = Block::Custom(CustomBlock {
        name: frame.name,
        attrs: frame.attrs,
        children: frame.blocks,
        body,
        line: frame.line,
    });

    if let Some(parent) = stack.last_mut() {
        parent.blocks.push(block);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum TagLine<'a> {
    Open {
        name: &'a str,
        attrs: BlockAttrs,
    },
    SelfClosing {
        name: &'a str,
        attrs: BlockAttrs,
    },
    Inline {
        name: &'a str,
        attrs: BlockAttrs,
        content: &'a str,
    },
    Close {
        name: &'a str,
    },
}

/// Recognize a line holding a single component tag.
fn parse_tag_line(line: &str) -> Option<TagLine<'_>> {
    let rest = line.trim().strip_prefix('<')?;

    if let Some(close) = rest.strip_prefix('/') {
        let name = close.strip_suffix('>')?.trim();
        return is_component_name(name).then_some(TagLine::Close { name });
    }

    let name_len = rest
        .find(|c: char| !is_name_char(c))
        .unwrap_or(rest.len());
    let name = &rest[..name_len];
    if !is_component_name(name) {
        return None;
    }

    let after_name = &rest[name_len..];
    if !after_name.starts_with(|c: char| c.is_whitespace() || c == '/' || c == '>') {
        return None;
    }

    let end = tag_end(after_name)?;
    let inner = after_name[..end].trim_end();
    let tail = after_name[end + 1..].trim();

    if let Some(attr_src) = inner.strip_suffix('/') {
        return tail.is_empty().then(|| TagLine::SelfClosing {
            name,
            attrs: BlockAttrs::parse(attr_src),
        });
    }

    let attrs = BlockAttrs::parse(inner);
    if tail.is_empty() {
        return Some(TagLine::Open { name, attrs });
    }

    let content = tail.strip_suffix('>')?.trim_end().strip_suffix(name)?;
    let content = content.trim_end().strip_suffix("</")?;
    Some(TagLine::Inline {
        name,
        attrs,
        content: content.trim(),
    })
}

/// Index of the `>` ending an opening tag, skipping quoted and braced values.
fn tag_end(s: &str) -> Option<usize> {
    let mut skip_until = 0;
    for (i, c) in s.char_indices() {
        if i < skip_until {
            continue;
        }
        match c {
            '"' | '\'' => skip_until = i + 1 + s[i + 1..].find(c)? + 1,
            '{' => skip_until = i + matching_brace(&s[i..])? + 1,
            '>' => return Some(i),
            _ => {}
        }
    }
    None
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.')
}

fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) && name.chars().all(is_name_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn custom(block: &Block) -> &CustomBlock {
        match block {
            Block::Custom(c) => c,
            Block::Markdown(s) => panic!("expected component, got markdown {s:?}"),
        }
    }

    fn markdown(block: &Block) -> &Segment {
        match block {
            Block::Markdown(s) => s,
            Block::Custom(c) => panic!("expected markdown, got <{}>", c.name),
        }
    }

    #[test]
    fn test_tag_line_forms() {
        assert_eq!(
            parse_tag_line("<Callout>"),
            Some(TagLine::Open {
                name: "Callout",
                attrs: BlockAttrs::default()
            })
        );
        assert_eq!(
            parse_tag_line("  </Callout>  "),
            Some(TagLine::Close { name: "Callout" })
        );
        assert!(matches!(
            parse_tag_line("<BaseUnitTable/>"),
            Some(TagLine::SelfClosing { name: "BaseUnitTable", .. })
        ));
        assert!(matches!(
            parse_tag_line(r#"<Callout title="a > b" />"#),
            Some(TagLine::SelfClosing { name: "Callout", attrs }) if attrs.text("title") == Some("a > b")
        ));
        assert!(matches!(
            parse_tag_line("<Callout>Short</Callout>"),
            Some(TagLine::Inline { name: "Callout", content: "Short", .. })
        ));
    }

    #[test]
    fn test_non_component_lines() {
        assert_eq!(parse_tag_line("<div>"), None);
        assert_eq!(parse_tag_line("</div>"), None);
        assert_eq!(parse_tag_line("a <Callout>"), None);
        assert_eq!(parse_tag_line("<Callout"), None);
        assert_eq!(parse_tag_line("<Callout+x>"), None);
        assert_eq!(parse_tag_line("<Callout>text</Other>"), None);
        assert_eq!(parse_tag_line("<Callout /> trailing"), None);
    }

    #[test]
    fn test_markdown_only() {
        let doc = parse("# Title\n\nSome text.\n");
        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(markdown(&doc.blocks[0]).text, "# Title\n\nSome text.\n");
        assert_eq!(markdown(&doc.blocks[0]).line, 1);
    }

    #[test]
    fn test_blocks_in_source_order() {
        let source = "Intro\n\n<Callout type=\"exam\">\nInside\n</Callout>\n\nOutro\n";
        let doc = parse(source);

        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.blocks.len(), 3);
        assert_eq!(markdown(&doc.blocks[0]).text, "Intro\n\n");

        let callout = custom(&doc.blocks[1]);
        assert_eq!(callout.name, "Callout");
        assert_eq!(callout.attrs.text("type"), Some("exam"));
        assert_eq!(callout.line, 3);
        assert_eq!(callout.body, "Inside");
        assert_eq!(callout.children.len(), 1);
        assert_eq!(markdown(&callout.children[0]).line, 4);

        let outro = markdown(&doc.blocks[2]);
        assert_eq!(outro.text, "\nOutro\n");
        assert_eq!(outro.line, 6);
    }

    #[test]
    fn test_nested_components() {
        let source = "<Callout>\n<BaseUnitTable>\n| a |\n|---|\n| 1 |\n</BaseUnitTable>\n</Callout>\n";
        let doc = parse(source);

        assert!(doc.diagnostics.is_empty());
        let outer = custom(&doc.blocks[0]);
        assert_eq!(outer.children.len(), 1);
        let inner = custom(&outer.children[0]);
        assert_eq!(inner.name, "BaseUnitTable");
        assert_eq!(inner.body, "| a |\n|---|\n| 1 |");
        assert_eq!(
            outer.body,
            "<BaseUnitTable>\n| a |\n|---|\n| 1 |\n</BaseUnitTable>"
        );
    }

    #[test]
    fn test_tags_inside_fence_are_text() {
        let source = "```mdx\n<Callout>\n```\n";
        let doc = parse(source);

        assert!(doc.diagnostics.is_empty());
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(markdown(&doc.blocks[0]).text, source);
    }

    #[test]
    fn test_unclosed_block_closes_at_end() {
        let doc = parse("<Callout>\nbody\n");

        assert_eq!(
            doc.diagnostics,
            vec![Diagnostic::UnclosedBlock {
                line: 1,
                name: "Callout".to_owned()
            }]
        );
        let callout = custom(&doc.blocks[0]);
        assert_eq!(callout.body, "body");
    }

    #[test]
    fn test_unclosed_inner_block_closes_with_parent() {
        let doc = parse("<Callout>\n<BaseUnitTable>\nx\n</Callout>\nafter\n");

        assert_eq!(
            doc.diagnostics,
            vec![Diagnostic::UnclosedBlock {
                line: 2,
                name: "BaseUnitTable".to_owned()
            }]
        );
        assert_eq!(doc.blocks.len(), 2);
        let outer = custom(&doc.blocks[0]);
        assert_eq!(custom(&outer.children[0]).name, "BaseUnitTable");
        assert_eq!(markdown(&doc.blocks[1]).text, "after\n");
    }

    #[test]
    fn test_stray_closing_tag_kept_as_text() {
        let doc = parse("text\n</Callout>\n");

        assert_eq!(
            doc.diagnostics,
            vec![Diagnostic::UnexpectedClosingTag {
                line: 2,
                name: "Callout".to_owned()
            }]
        );
        assert_eq!(markdown(&doc.blocks[0]).text, "text\n</Callout>\n");
    }

    #[test]
    fn test_self_closing_and_inline() {
        let doc = parse("<PracticeMCQ_Homogenity />\n<Callout title=\"Tip\">Remember units.</Callout>\n");

        assert_eq!(doc.blocks.len(), 2);
        let mcq = custom(&doc.blocks[0]);
        assert_eq!(mcq.name, "PracticeMCQ_Homogenity");
        assert!(mcq.children.is_empty());

        let callout = custom(&doc.blocks[1]);
        assert_eq!(callout.body, "Remember units.");
        assert_eq!(markdown(&callout.children[0]).text, "Remember units.\n");
    }
}
