//! Navigation for Primer.
//!
//! This crate provides:
//! - [`NavTree`]: the validated, static chapter tree
//! - [`AccordionState`] with [`reconcile`] and [`toggle`]: which chapter is expanded
//! - [`RouteObserver`] and [`sidebar_view`]: route binding and link highlighting
//!
//! # Example
//!
//! ```
//! use primer_nav::{NavTree, Route, reconcile, sidebar_view, toggle};
//!
//! let tree = NavTree::from_toml(r#"
//! [[chapter]]
//! id = "measurements"
//! title = "1. Quantities and Measurements"
//! base_path = "/physics/measurements"
//!
//! [[chapter.entry]]
//! title = "1.2 Errors and Uncertainties"
//! path = "/physics/measurements/errors_and_uncertainties"
//! "#).unwrap();
//!
//! let route = Route::parse("/physics/measurements/errors_and_uncertainties").unwrap();
//! let state = reconcile(&tree, &route);
//! assert_eq!(state.expanded().map(|id| id.as_str()), Some("measurements"));
//!
//! let view = sidebar_view(&tree, &state, Some(&route), false);
//! assert!(view.chapters[0].entries[0].active);
//!
//! let collapsed = toggle(&tree, &state, &"measurements".into());
//! assert_eq!(collapsed.expanded(), None);
//! ```

mod accordion;
mod binding;
mod route;
mod tree;

pub use accordion::{AccordionController, AccordionState, reconcile, toggle};
pub use binding::{
    ChapterView, EntryView, RouteNotifier, RouteObserver, SidebarView, is_active, route_channel,
    sidebar_view,
};
pub use route::{Route, RouteError};
pub use tree::{Chapter, ChapterId, NavTree, NavTreeError, SubEntry};
