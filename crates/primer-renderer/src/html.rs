//! Markdown segments to HTML.
//!
//! One [`HtmlRenderer`] renders every markdown segment of a page, in source
//! order, so heading ids stay unique and the first H1 becomes the page title
//! no matter which segment it is in.

use std::fmt::Write;

use pulldown_cmark::{Alignment, BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::diagnostic::Diagnostic;
use crate::math::{MathFragment, MathMode, braces_balanced, expand};
use crate::util::{SlugCounter, escape_html, heading_level_to_num};

/// Table of contents entry (H2-H6).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TocEntry {
    /// Heading level (2-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor id.
    pub id: String,
}

/// Parser options for lesson markdown: GFM plus `$` math.
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
        | Options::ENABLE_MATH
}

#[derive(Debug)]
struct HeadingState {
    level: u8,
    text: String,
    html: String,
}

#[derive(Debug)]
struct CodeState {
    lang: Option<String>,
    content: String,
}

#[derive(Debug)]
struct ImageState {
    src: String,
    title: String,
    alt: String,
}

#[derive(Debug, Default)]
struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell: usize,
}

impl TableState {
    fn alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Plain text between other events.
#[derive(Debug, Default)]
struct PendingText {
    text: String,
    /// Offsets in `text` of dollars written as `\$`.
    escaped: Vec<usize>,
    /// Document line of the first character.
    line: usize,
}

impl PendingText {
    fn push(&mut self, chunk: &str, escaped_dollar: bool, line: usize) {
        if self.text.is_empty() {
            self.line = line;
        }
        if escaped_dollar {
            self.escaped.push(self.text.len());
        }
        self.text.push_str(chunk);
    }
}

/// Event-driven markdown renderer shared by all segments of a page.
#[derive(Debug, Default)]
pub(crate) struct HtmlRenderer {
    output: String,
    heading: Option<HeadingState>,
    code: Option<CodeState>,
    image: Option<ImageState>,
    pending: PendingText,
    table: TableState,
    alert_stack: Vec<bool>,
    slugs: SlugCounter,
    title: Option<String>,
    toc: Vec<TocEntry>,
    diagnostics: Vec<Diagnostic>,
}

/// Page-level results collected across segments.
#[derive(Debug)]
pub(crate) struct HtmlSummary {
    pub(crate) title: Option<String>,
    pub(crate) toc: Vec<TocEntry>,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl HtmlRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Render one segment. `first_line` is the document line of its first
    /// line, used to place math diagnostics.
    pub(crate) fn render_segment(&mut self, text: &str, first_line: usize) -> String {
        for (event, range) in Parser::new_ext(text, parser_options()).into_offset_iter() {
            let line = line_at(text, range.start, first_line);
            let plain = self.code.is_none() && self.image.is_none();
            match event {
                Event::Text(chunk) if plain => {
                    let escaped = chunk.starts_with('$') && is_escaped(text, range.start);
                    self.pending.push(&chunk, escaped, line);
                }
                Event::SoftBreak if plain => self.pending.push("\n", false, line),
                Event::InlineMath(tex) => {
                    self.flush_text();
                    self.math(&tex, MathMode::Inline, line);
                }
                Event::DisplayMath(tex) => {
                    self.flush_text();
                    self.math(&tex, MathMode::Display, line);
                }
                other => {
                    self.flush_text();
                    self.event(other);
                }
            }
        }
        self.flush_text();
        std::mem::take(&mut self.output)
    }

    pub(crate) fn finish(self) -> HtmlSummary {
        HtmlSummary {
            title: self.title,
            toc: self.toc,
            diagnostics: self.diagnostics,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.push_inline(&html),
            Event::SoftBreak => {
                if let Some(code) = &mut self.code {
                    code.content.push('\n');
                } else {
                    self.push_inline("\n");
                }
            }
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => {
                self.output.push_str(if checked {
                    r#"<input type="checkbox" checked disabled>"#
                } else {
                    r#"<input type="checkbox" disabled>"#
                });
            }
            Event::InlineMath(tex) => self.math(&tex, MathMode::Inline, 0),
            Event::DisplayMath(tex) => self.math(&tex, MathMode::Display, 0),
            Event::FootnoteReference(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                self.heading = Some(HeadingState {
                    level: heading_level_to_num(level),
                    text: String::new(),
                    html: String::new(),
                });
            }
            Tag::BlockQuote(kind) => {
                self.alert_stack.push(kind.is_some());
                match kind {
                    Some(kind) => {
                        let (class, title) = alert_label(kind);
                        write!(
                            self.output,
                            r#"<div class="alert alert-{class}"><div class="alert-title">{title}</div><div class="alert-content">"#
                        )
                        .unwrap();
                    }
                    None => self.output.push_str("<blockquote>"),
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeState {
                    lang,
                    content: String::new(),
                });
            }
            Tag::List(Some(1)) => self.output.push_str("<ol>"),
            Tag::List(Some(start)) => write!(self.output, r#"<ol start="{start}">"#).unwrap(),
            Tag::List(None) => self.output.push_str("<ul>"),
            Tag::Item => self.output.push_str("<li>"),
            Tag::Table(alignments) => {
                self.table = TableState {
                    alignments,
                    ..TableState::default()
                };
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.in_head = true;
                self.table.cell = 0;
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.cell = 0;
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let tag = if self.table.in_head { "th" } else { "td" };
                let align = self.table.alignment_style();
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = format!(r#"<a href="{}""#, escape_html(&dest_url));
                if !title.is_empty() {
                    write!(link, r#" title="{}""#, escape_html(&title)).unwrap();
                }
                link.push('>');
                self.push_inline(&link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(ImageState {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    alt: String::new(),
                });
            }
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => self.end_heading(),
            TagEnd::BlockQuote(_) => {
                if self.alert_stack.pop().unwrap_or(false) {
                    self.output.push_str("</div></div>");
                } else {
                    self.output.push_str("</blockquote>");
                }
            }
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    match code.lang {
                        Some(lang) => write!(
                            self.output,
                            r#"<pre><code class="language-{}">{}</code></pre>"#,
                            escape_html(&lang),
                            escape_html(&code.content)
                        )
                        .unwrap(),
                        None => write!(
                            self.output,
                            "<pre><code>{}</code></pre>",
                            escape_html(&code.content)
                        )
                        .unwrap(),
                    }
                }
            }
            TagEnd::List(ordered) => self.output.push_str(if ordered { "</ol>" } else { "</ul>" }),
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.table.in_head = false;
                self.output.push_str("</tr></thead><tbody>");
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output
                    .push_str(if self.table.in_head { "</th>" } else { "</td>" });
                self.table.cell += 1;
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    let mut tag = format!(r#"<img src="{}""#, escape_html(&image.src));
                    if !image.title.is_empty() {
                        write!(tag, r#" title="{}""#, escape_html(&image.title)).unwrap();
                    }
                    write!(tag, r#" alt="{}">"#, escape_html(&image.alt)).unwrap();
                    self.push_inline(&tag);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
        }
    }

    fn end_heading(&mut self) {
        let Some(heading) = self.heading.take() else {
            return;
        };
        let text = heading.text.trim().to_owned();
        let id = self.slugs.unique(&text);

        if heading.level == 1 {
            if self.title.is_none() {
                self.title = Some(text);
            }
        } else {
            self.toc.push(TocEntry {
                level: heading.level,
                title: text,
                id: id.clone(),
            });
        }

        write!(
            self.output,
            r#"<h{level} id="{id}">{html}</h{level}>"#,
            level = heading.level,
            html = heading.html.trim()
        )
        .unwrap();
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = &mut self.code {
            code.content.push_str(text);
        } else if let Some(image) = &mut self.image {
            image.alt.push_str(text);
        } else if let Some(heading) = &mut self.heading {
            heading.text.push_str(text);
            heading.html.push_str(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    /// Write collected text. Math spans the parser left as text are expanded
    /// so they surface as errors.
    fn flush_text(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for piece in split_math(&pending.text, &pending.escaped) {
            match piece {
                TextPiece::Plain(text) => self.text(text),
                TextPiece::Math { tex, mode, offset } => {
                    let line = line_at(&pending.text, offset, pending.line);
                    self.math(tex, mode, line);
                }
            }
        }
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(heading) = &mut self.heading {
            heading.text.push_str(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn math(&mut self, tex: &str, mode: MathMode, line: usize) {
        if let Some(image) = &mut self.image {
            image.alt.push_str(tex);
            return;
        }

        let fragment = expand(tex, mode);
        if let MathFragment::Malformed { tex, message, .. } = &fragment {
            self.diagnostics.push(Diagnostic::MalformedMathSpan {
                line,
                tex: tex.clone(),
                message: message.clone(),
            });
        }
        if let Some(heading) = &mut self.heading {
            heading.text.push_str(tex);
        }
        self.push_inline(&fragment.to_html());
    }

    /// Append inline HTML to the open heading, or to the output.
    fn push_inline(&mut self, html: &str) {
        if self.image.is_some() {
            return;
        }
        match &mut self.heading {
            Some(heading) => heading.html.push_str(html),
            None => self.output.push_str(html),
        }
    }
}

fn alert_label(kind: BlockQuoteKind) -> (&'static str, &'static str) {
    match kind {
        BlockQuoteKind::Note => ("note", "Note"),
        BlockQuoteKind::Tip => ("tip", "Tip"),
        BlockQuoteKind::Important => ("important", "Important"),
        BlockQuoteKind::Warning => ("warning", "Warning"),
        BlockQuoteKind::Caution => ("caution", "Caution"),
    }
}

/// True if the `$` at `offset` was written as `\$`. The parser drops the
/// backslash, so it precedes the text range or opens it.
fn is_escaped(source: &str, offset: usize) -> bool {
    let Some((before, after)) = source.split_at_checked(offset) else {
        return false;
    };
    let backslashes = before.bytes().rev().take_while(|&b| b == b'\\').count();
    backslashes % 2 == 1 || after.starts_with("\\$")
}

#[derive(Debug, PartialEq, Eq)]
enum TextPiece<'a> {
    Plain(&'a str),
    Math {
        tex: &'a str,
        mode: MathMode,
        offset: usize,
    },
}

/// Split text into plain runs and `$…$`/`$$…$$` spans with unbalanced
/// braces. The markdown parser only recognizes balanced spans, so these
/// arrive as text.
fn split_math<'a>(text: &'a str, escaped: &[usize]) -> Vec<TextPiece<'a>> {
    let bytes = text.as_bytes();
    let is_dollar = |i: usize| bytes.get(i) == Some(&b'$') && !escaped.contains(&i);

    let mut pieces = Vec::new();
    let mut plain = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !is_dollar(i) {
            i += 1;
            continue;
        }
        let (mode, width) = if is_dollar(i + 1) {
            (MathMode::Display, 2)
        } else {
            (MathMode::Inline, 1)
        };
        let start = i + width;
        let close = match mode {
            MathMode::Display => (start..bytes.len()).find(|&j| is_dollar(j) && is_dollar(j + 1)),
            MathMode::Inline if bytes.get(start).is_none_or(u8::is_ascii_whitespace) => None,
            MathMode::Inline => (start + 1..bytes.len()).find(|&j| {
                is_dollar(j)
                    && !bytes[j - 1].is_ascii_whitespace()
                    && !bytes
                        .get(j + 1)
                        .is_some_and(|&b| b.is_ascii_digit() || b == b'$')
            }),
        };
        match close {
            Some(end) if !braces_balanced(&text[start..end]) => {
                if plain < i {
                    pieces.push(TextPiece::Plain(&text[plain..i]));
                }
                pieces.push(TextPiece::Math {
                    tex: &text[start..end],
                    mode,
                    offset: i,
                });
                i = end + width;
                plain = i;
            }
            _ => i = start,
        }
    }
    if plain < text.len() {
        pieces.push(TextPiece::Plain(&text[plain..]));
    }
    pieces
}

/// Document line of byte `offset` within a segment starting at `first_line`.
fn line_at(text: &str, offset: usize, first_line: usize) -> usize {
    let newlines = text
        .as_bytes()
        .get(..offset)
        .map_or(0, |before| before.iter().filter(|&&b| b == b'\n').count());
    first_line + newlines
}

/// Render a single line of markdown without the paragraph wrapper.
///
/// Used for short inline content such as answer options.
pub(crate) fn render_inline(text: &str) -> String {
    let html = HtmlRenderer::new().render_segment(text, 0);
    let trimmed = html.trim();
    trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .unwrap_or(trimmed)
        .to_owned()
}
