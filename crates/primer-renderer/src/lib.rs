//! Lesson composition for Primer.
//!
//! Lessons are markdown with `$…$`/`$$…$$` math and MDX-style component
//! tags. [`compose`] turns a lesson and a [`BlockRegistry`] into a
//! [`ComposedPage`].
//!
//! # Architecture
//!
//! - [`parse`]: block structure (markdown segments and components)
//! - [`expand`]: TeX to MathML, one span at a time
//! - [`BlockRegistry`] / [`BlockRenderer`]: component name to renderer
//! - [`BuiltinBlock`]: unit tables, callouts and practice questions
//!
//! Failures never abort composition; they are reported as [`Diagnostic`]s.
//!
//! # Example
//!
//! ```
//! use primer_renderer::{builtin_registry, compose};
//!
//! let lesson = "# Errors\n\n<Callout type=\"exam\">\nQuote $\\pm 0.1$ cm.\n</Callout>\n";
//! let page = compose(lesson, &builtin_registry());
//!
//! assert_eq!(page.title.as_deref(), Some("Errors"));
//! assert!(page.html.contains("callout-exam"));
//! assert!(page.diagnostics.is_empty());
//! ```

mod attrs;
mod blocks;
mod compose;
mod diagnostic;
mod fence;
mod html;
mod math;
mod parse;
mod registry;
mod util;

pub use attrs::{AttrValue, BlockAttrs};
pub use blocks::{
    BuiltinBlock, Callout, CalloutKind, PracticeMcq, UnitTable, UnknownBlockKind, builtin_registry,
};
pub use compose::{ComposedPage, compose};
pub use diagnostic::Diagnostic;
pub use html::TocEntry;
pub use math::{MathFragment, MathMode, expand};
pub use parse::{Block, CustomBlock, ParsedDocument, Segment, parse};
pub use registry::{BlockError, BlockInput, BlockRegistry, BlockRenderer};
pub use util::escape_html;
