//! Unit table wrapper.

use crate::registry::{BlockError, BlockInput, BlockRenderer};

/// Wraps a table in `div.table-wrapper` and marks it `physics-table`.
///
/// When the children contain no `<table>` (raw rows), they are wrapped in one.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitTable;

impl BlockRenderer for UnitTable {
    fn render(&self, input: &BlockInput<'_>) -> Result<String, BlockError> {
        let table = if input.children_html.contains("<table>") {
            input
                .children_html
                .replacen("<table>", r#"<table class="physics-table">"#, 1)
        } else {
            format!(r#"<table class="physics-table">{}</table>"#, input.children_html)
        };
        Ok(format!(r#"<div class="table-wrapper">{table}</div>"#))
    }
}
