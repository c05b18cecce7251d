//! Built-in block renderers.
//!
//! | Kind           | Default name    | Output                                         |
//! |----------------|-----------------|------------------------------------------------|
//! | `unit-table`   | `BaseUnitTable` | `div.table-wrapper > table.physics-table`      |
//! | `callout`      | `Callout`       | semantic callout box (`type`, `title`)         |
//! | `practice-mcq` | `PracticeMCQ`   | radio-button practice question                 |
//!
//! Sites bind additional names to a kind (e.g. `PracticeMCQ_Homogenity` to
//! `practice-mcq`) through [`BuiltinBlock::renderer`].

mod callout;
mod mcq;
mod unit_table;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use callout::{Callout, CalloutKind};
pub use mcq::PracticeMcq;
pub use unit_table::UnitTable;

use crate::registry::{BlockRegistry, BlockRenderer};

/// Kinds of built-in renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinBlock {
    UnitTable,
    Callout,
    PracticeMcq,
}

impl BuiltinBlock {
    /// All built-in kinds.
    pub const ALL: [Self; 3] = [Self::UnitTable, Self::Callout, Self::PracticeMcq];

    /// Kind identifier used in configuration.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Self::UnitTable => "unit-table",
            Self::Callout => "callout",
            Self::PracticeMcq => "practice-mcq",
        }
    }

    /// Component name the kind is registered under by default.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Self::UnitTable => "BaseUnitTable",
            Self::Callout => "Callout",
            Self::PracticeMcq => "PracticeMCQ",
        }
    }

    /// A renderer for this kind.
    #[must_use]
    pub fn renderer(self) -> Arc<dyn BlockRenderer> {
        match self {
            Self::UnitTable => Arc::new(UnitTable),
            Self::Callout => Arc::new(Callout),
            Self::PracticeMcq => Arc::new(PracticeMcq),
        }
    }
}

impl fmt::Display for BuiltinBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Error for an unknown built-in kind.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown block kind {0:?} (expected one of: unit-table, callout, practice-mcq)")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BuiltinBlock {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.kind() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_owned()))
    }
}

/// Registry with every built-in kind under its default name.
#[must_use]
pub fn builtin_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();
    for block in BuiltinBlock::ALL {
        registry.insert_shared(block.default_name(), block.renderer());
    }
    registry
}
