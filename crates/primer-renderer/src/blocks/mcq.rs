//! Practice multiple-choice questions.
//!
//! ```text
//! <PracticeMCQ_Homogenity question="Which equation is homogeneous?">
//! - [ ] $v = u + at^2$
//! - [x] $s = ut + \frac{1}{2}at^2$
//! - [ ] $v^2 = u + 2as$
//! </PracticeMCQ_Homogenity>
//! ```
//!
//! Options are the task-list items of the body; checked items are correct.
//! Other body lines form the question when there is no `question` attribute.

use std::fmt::Write;

use crate::html::render_inline;
use crate::parse::{Block, parse};
use crate::registry::{BlockError, BlockInput, BlockRenderer};
use crate::util::{escape_html, slugify};

/// Practice question renderer.
#[derive(Clone, Copy, Debug, Default)]
pub struct PracticeMcq;

#[derive(Debug, PartialEq, Eq)]
struct Question<'a> {
    prompt: String,
    options: Vec<(bool, &'a str)>,
}

impl BlockRenderer for PracticeMcq {
    fn render(&self, input: &BlockInput<'_>) -> Result<String, BlockError> {
        if let Some(name) = nested_component(input.children_source) {
            return Err(BlockError::new(format!(
                "<{name}> cannot be used inside a practice question"
            )));
        }

        let question = parse_question(input.children_source, input.attrs.text("question"));

        if question.options.is_empty() {
            return Err(BlockError::new("practice question has no options"));
        }
        if !question.options.iter().any(|(correct, _)| *correct) {
            return Err(BlockError::new("no option is marked correct"));
        }

        let group = format!("{}-{}", slugify(input.name), input.line);
        let mut html = format!(
            r#"<form class="practice-mcq" data-block="{}">"#,
            escape_html(input.name)
        );
        if !question.prompt.is_empty() {
            write!(
                html,
                r#"<div class="practice-mcq-question">{}</div>"#,
                render_inline(&question.prompt)
            )
            .unwrap();
        }
        html.push_str(r#"<ul class="practice-mcq-options">"#);
        for (index, (correct, text)) in question.options.iter().enumerate() {
            write!(
                html,
                r#"<li><label><input type="radio" name="{group}" value="{index}" data-correct="{correct}"> {}</label></li>"#,
                render_inline(text)
            )
            .unwrap();
        }
        html.push_str(r#"</ul><p class="practice-mcq-feedback" hidden></p></form>"#);

        Ok(html)
    }
}

fn parse_question<'a>(source: &'a str, question_attr: Option<&str>) -> Question<'a> {
    let mut prompt_lines = Vec::new();
    let mut options = Vec::new();

    for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match parse_option(line) {
            Some(option) => options.push(option),
            None => prompt_lines.push(line),
        }
    }

    let prompt = question_attr.map_or_else(|| prompt_lines.join(" "), str::to_owned);
    Question { prompt, options }
}

/// Name of the first component tag in the body. Options and prompt are
/// inline text, so a nested component has nowhere to go.
fn nested_component(source: &str) -> Option<String> {
    parse(source).blocks.into_iter().find_map(|block| match block {
        Block::Custom(custom) => Some(custom.name),
        Block::Markdown(_) => None,
    })
}

/// `- [x] text` / `* [ ] text` to `(checked, text)`.
fn parse_option(line: &str) -> Option<(bool, &str)> {
    let item = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))?
        .trim_start();
    let (checked, text) = if let Some(text) = item.strip_prefix("[ ]") {
        (false, text)
    } else if let Some(text) = item
        .strip_prefix("[x]")
        .or_else(|| item.strip_prefix("[X]"))
    {
        (true, text)
    } else {
        return None;
    };
    Some((checked, text.trim()))
}
