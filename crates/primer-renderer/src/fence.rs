//! Code fence tracking for component tag parsing.
//!
//! Component tags inside fenced code blocks are literal text, so the block
//! parser asks the tracker before treating a line as a tag.

/// Tracks code fence state during line-by-line processing.
///
/// Fences use three or more backticks or tildes. A fence closes on a line
/// of the same character, at least as long as the opening run, with nothing
/// but whitespace after it.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// True while inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let Some((ch, len, rest)) = fence_run(line.trim_start()) else {
            return false;
        };

        match self.open {
            Some((open_ch, open_len)) => {
                let closes = ch == open_ch && len >= open_len && rest.trim().is_empty();
                if closes {
                    self.open = None;
                }
                closes
            }
            None => {
                self.open = Some((ch, len));
                true
            }
        }
    }
}

/// Leading run of three or more fence characters: `(char, length, rest)`.
fn fence_run(trimmed: &str) -> Option<(char, usize, &str)> {
    let first = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == first).count();
    (len >= 3).then(|| (first, len, &trimmed[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backtick_fence() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```tex"));
        assert!(tracker.in_fence());
        assert!(!tracker.update("<Callout>"));
        assert!(tracker.in_fence());
        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tilde_fence_with_indent() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("  ~~~"));
        assert!(tracker.update("   ~~~~  "));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_shorter_or_different_fence_does_not_close() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(!tracker.update("~~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_closing_fence_with_info_string_does_not_close() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("```rust"));
        assert!(tracker.in_fence());
    }

    #[test]
    fn test_regular_lines() {
        let mut tracker = FenceTracker::new();

        assert!(!tracker.update("``inline``"));
        assert!(!tracker.update("<BaseUnitTable>"));
        assert!(!tracker.in_fence());
    }
}
