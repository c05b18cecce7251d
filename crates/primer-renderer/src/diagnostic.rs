//! Contained composition failures.
//!
//! A diagnostic never aborts composition: the offending span or block is
//! replaced by a visible fragment and the rest of the page renders as usual.

/// A per-block failure recorded while composing a page.
///
/// Line numbers are 1-based and refer to the authored document.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// Math span that could not be converted.
    #[error("line {line}: malformed math `{tex}`: {message}")]
    MalformedMathSpan {
        line: usize,
        tex: String,
        message: String,
    },
    /// Component tag with no renderer in the registry.
    #[error("line {line}: no renderer registered for <{name}>")]
    UnregisteredBlockType { line: usize, name: String },
    /// Registered renderer rejected its input.
    #[error("line {line}: <{name}> failed to render: {message}")]
    BlockRenderFailed {
        line: usize,
        name: String,
        message: String,
    },
    /// Opening tag with no matching closing tag.
    #[error("line {line}: <{name}> is never closed")]
    UnclosedBlock { line: usize, name: String },
    /// Closing tag that matches no open component.
    #[error("line {line}: unexpected </{name}>")]
    UnexpectedClosingTag { line: usize, name: String },
}

impl Diagnostic {
    /// Line the diagnostic refers to.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedMathSpan { line, .. }
            | Self::UnregisteredBlockType { line, .. }
            | Self::BlockRenderFailed { line, .. }
            | Self::UnclosedBlock { line, .. }
            | Self::UnexpectedClosingTag { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diag = Diagnostic::UnregisteredBlockType {
            line: 12,
            name: "PracticeMCQ_Homogenity".to_owned(),
        };
        assert_eq!(
            diag.to_string(),
            "line 12: no renderer registered for <PracticeMCQ_Homogenity>"
        );
        assert_eq!(diag.line(), 12);
    }
}
