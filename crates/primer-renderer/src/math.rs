//! TeX math to MathML.
//!
//! Each math span converts independently. A span that fails to convert
//! becomes an error fragment showing the original TeX; it never affects
//! neighbouring spans.

use std::fmt::Write;

use latex2mathml::{DisplayStyle, latex_to_mathml};

use crate::util::escape_html;

/// Inline (`$…$`) or display (`$$…$$`) math.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MathMode {
    Inline,
    Display,
}

impl From<MathMode> for DisplayStyle {
    fn from(mode: MathMode) -> Self {
        match mode {
            MathMode::Inline => Self::Inline,
            MathMode::Display => Self::Block,
        }
    }
}

/// Result of expanding one math span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MathFragment {
    /// Converted MathML.
    Rendered { mode: MathMode, mathml: String },
    /// Span that could not be converted.
    Malformed {
        mode: MathMode,
        tex: String,
        message: String,
    },
}

impl MathFragment {
    /// True for [`MathFragment::Malformed`].
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// HTML for the fragment.
    ///
    /// Display math uses a block-styled `span` so it stays valid inside the
    /// paragraph the markdown parser puts it in.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Rendered { mode, mathml } => {
                write!(out, r#"<span class="math {}">{mathml}</span>"#, mode_class(*mode)).unwrap();
            }
            Self::Malformed { mode, tex, message } => {
                write!(
                    out,
                    r#"<span class="math {} math-error" title="{}"><code>{}</code></span>"#,
                    mode_class(*mode),
                    escape_html(message),
                    escape_html(tex)
                )
                .unwrap();
            }
        }
        out
    }
}

fn mode_class(mode: MathMode) -> &'static str {
    match mode {
        MathMode::Inline => "math-inline",
        MathMode::Display => "math-display",
    }
}

/// Convert a TeX span to MathML.
#[must_use]
pub fn expand(tex: &str, mode: MathMode) -> MathFragment {
    let result = check_structure(tex).and_then(|()| {
        latex_to_mathml(tex.trim(), mode.into()).map_err(|e| e.to_string())
    });

    match result {
        Ok(mathml) => MathFragment::Rendered { mode, mathml },
        Err(message) => {
            tracing::debug!(tex, %message, "Malformed math span");
            MathFragment::Malformed {
                mode,
                tex: tex.to_owned(),
                message,
            }
        }
    }
}

/// True if every unescaped `{` has a matching `}`.
pub(crate) fn braces_balanced(tex: &str) -> bool {
    brace_error(tex).is_none()
}

fn brace_error(tex: &str) -> Option<&'static str> {
    let mut depth = 0i32;
    let mut chars = tex.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return Some("unexpected '}'");
                }
            }
            _ => {}
        }
    }
    (depth > 0).then_some("missing '}'")
}

/// Reject spans the converter would render silently wrong: empty input,
/// unbalanced braces and mismatched environments.
fn check_structure(tex: &str) -> Result<(), String> {
    if tex.trim().is_empty() {
        return Err("empty math span".to_owned());
    }

    if let Some(message) = brace_error(tex) {
        return Err(message.to_owned());
    }

    let mut environments = Vec::new();
    let mut rest = tex;
    while let Some(pos) = rest.find('\\') {
        rest = &rest[pos + 1..];
        let (is_begin, after) = if let Some(after) = rest.strip_prefix("begin{") {
            (true, after)
        } else if let Some(after) = rest.strip_prefix("end{") {
            (false, after)
        } else {
            continue;
        };
        let Some(close) = after.find('}') else {
            break;
        };
        let name = &after[..close];
        if is_begin {
            environments.push(name);
        } else if environments.pop() != Some(name) {
            return Err(format!("unmatched \\end{{{name}}}"));
        }
    }
    if let Some(open) = environments.pop() {
        return Err(format!("missing \\end{{{open}}}"));
    }

    Ok(())
}
