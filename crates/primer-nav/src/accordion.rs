//! Accordion state for the navigation sidebar.
//!
//! At most one chapter is expanded at a time. The state is a single optional
//! chapter id, so "two chapters expanded" cannot be represented.
//!
//! Two inputs change the state:
//!
//! - [`reconcile`]: a navigation event. The chapter containing the new route
//!   is expanded, or nothing when no chapter contains it.
//! - [`toggle`]: a user click on a chapter header. Collapses that chapter if
//!   it is the expanded one, otherwise expands it.
//!
//! Reconciliation is the source of truth on navigation events; toggles are
//! authoritative between them.

use std::sync::Arc;

use serde::Serialize;

use crate::route::Route;
use crate::tree::{ChapterId, NavTree};

/// Which chapter, if any, is expanded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccordionState {
    expanded: Option<ChapterId>,
}

impl AccordionState {
    /// State with every chapter collapsed.
    #[must_use]
    pub const fn collapsed() -> Self {
        Self { expanded: None }
    }

    /// Id of the expanded chapter.
    #[must_use]
    pub fn expanded(&self) -> Option<&ChapterId> {
        self.expanded.as_ref()
    }

    /// True if `id` is the expanded chapter.
    #[must_use]
    pub fn is_expanded(&self, id: &ChapterId) -> bool {
        self.expanded.as_ref() == Some(id)
    }
}

/// Derive the accordion state from a route.
///
/// Pure and idempotent: the first chapter whose base path contains `route`
/// is expanded; no match collapses everything.
#[must_use]
pub fn reconcile(tree: &NavTree, route: &Route) -> AccordionState {
    AccordionState {
        expanded: tree.chapter_containing(route).map(|c| c.id.clone()),
    }
}

/// Apply a user toggle on chapter `id`.
///
/// Ids that are not in the tree leave the state unchanged.
#[must_use]
pub fn toggle(tree: &NavTree, state: &AccordionState, id: &ChapterId) -> AccordionState {
    if state.is_expanded(id) {
        AccordionState::collapsed()
    } else if tree.chapter(id).is_some() {
        AccordionState {
            expanded: Some(id.clone()),
        }
    } else {
        state.clone()
    }
}

/// Sole writer of an [`AccordionState`].
///
/// Holds the read-only tree and the state; it never stores the route.
#[derive(Clone, Debug)]
pub struct AccordionController {
    tree: Arc<NavTree>,
    state: AccordionState,
}

impl AccordionController {
    /// Create a controller with everything collapsed.
    #[must_use]
    pub fn new(tree: Arc<NavTree>) -> Self {
        Self {
            tree,
            state: AccordionState::collapsed(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &AccordionState {
        &self.state
    }

    /// Navigation tree the controller reconciles against.
    #[must_use]
    pub fn tree(&self) -> &Arc<NavTree> {
        &self.tree
    }

    /// Reconcile against a new route.
    pub fn on_route(&mut self, route: &Route) -> &AccordionState {
        self.state = reconcile(&self.tree, route);
        tracing::trace!(route = %route, expanded = ?self.state.expanded, "Reconciled accordion");
        &self.state
    }

    /// Toggle a chapter.
    pub fn toggle(&mut self, id: &ChapterId) -> &AccordionState {
        self.state = toggle(&self.tree, &self.state, id);
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::{physics_tree, route};
    use pretty_assertions::assert_eq;

    fn measurements() -> ChapterId {
        ChapterId::new("measurements")
    }

    #[test]
    fn test_reconcile_expands_matching_chapter() {
        let tree = physics_tree();
        let state = reconcile(&tree, &route("/physics/measurements/errors_and_uncertainties"));
        assert_eq!(state.expanded(), Some(&measurements()));
    }

    #[test]
    fn test_reconcile_unmatched_route_collapses() {
        let tree = physics_tree();
        assert_eq!(reconcile(&tree, &route("/about")), AccordionState::collapsed());
    }

    #[test]
    fn test_reconcile_string_prefix_is_not_containment() {
        // "/physics/measurementsx" starts with the chapter's base path as a
        // string, but not segment by segment.
        let tree = physics_tree();
        assert_eq!(
            reconcile(&tree, &route("/physics/measurementsx")),
            AccordionState::collapsed()
        );
        assert_eq!(
            reconcile(&tree, &route("/physics/measurements_extra/page")),
            AccordionState::collapsed()
        );
    }

    #[test]
    fn test_reconcile_base_path_itself_matches() {
        let tree = physics_tree();
        let state = reconcile(&tree, &route("/physics/forces_and_moments"));
        assert_eq!(state.expanded().map(ChapterId::as_str), Some("Forces and Moments"));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let tree = physics_tree();
        let r = route("/physics/measurements/physical_quantities_prefixes");
        assert_eq!(reconcile(&tree, &r), reconcile(&tree, &r));
    }

    #[test]
    fn test_toggle_collapses_expanded_chapter() {
        let tree = physics_tree();
        let expanded = reconcile(&tree, &route("/physics/measurements"));

        let collapsed = toggle(&tree, &expanded, &measurements());
        assert_eq!(collapsed.expanded(), None);

        let again = toggle(&tree, &collapsed, &measurements());
        assert_eq!(again.expanded(), Some(&measurements()));
    }

    #[test]
    fn test_toggle_twice_is_identity() {
        let tree = physics_tree();
        let forces = ChapterId::new("Forces and Moments");
        for start in [
            AccordionState::collapsed(),
            reconcile(&tree, &route("/physics/measurements")),
            reconcile(&tree, &route("/physics/forces_and_moments/type_of_forces")),
        ] {
            for id in [measurements(), forces.clone()] {
                let twice = toggle(&tree, &toggle(&tree, &start, &id), &id);
                if start.expanded().is_none() || start.is_expanded(&id) {
                    assert_eq!(twice, start);
                } else {
                    // Toggling a different chapter replaces the expanded one;
                    // the second toggle collapses it.
                    assert_eq!(twice, AccordionState::collapsed());
                }
            }
        }
    }

    #[test]
    fn test_toggle_other_chapter_switches() {
        let tree = physics_tree();
        let forces = ChapterId::new("Forces and Moments");
        let state = reconcile(&tree, &route("/physics/measurements"));

        let switched = toggle(&tree, &state, &forces);
        assert!(switched.is_expanded(&forces));
        assert!(!switched.is_expanded(&measurements()));
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let tree = physics_tree();
        let state = reconcile(&tree, &route("/physics/measurements"));
        assert_eq!(toggle(&tree, &state, &ChapterId::new("nope")), state);
    }

    #[test]
    fn test_expanded_id_always_in_tree() {
        let tree = physics_tree();
        let mut controller = AccordionController::new(Arc::new(tree.clone()));
        let routes = [
            "/",
            "/physics/measurements/errors_and_uncertainties",
            "/about",
            "/physics/forces_and_moments",
            "/physics/forces_and_moments/type_of_forces/deep/nesting",
            "/physics",
        ];

        for r in routes {
            let state = controller.on_route(&route(r));
            if let Some(id) = state.expanded() {
                assert!(tree.chapter(id).is_some());
            }
            let state = controller.toggle(&ChapterId::new("ghost"));
            if let Some(id) = state.expanded() {
                assert!(tree.chapter(id).is_some());
            }
        }
    }

    #[test]
    fn test_controller_route_overrides_prior_toggle() {
        let mut controller = AccordionController::new(Arc::new(physics_tree()));
        controller.on_route(&route("/physics/measurements/errors_and_uncertainties"));
        controller.toggle(&measurements());
        assert_eq!(controller.state().expanded(), None);

        // A later navigation event re-derives the state from the route.
        controller.on_route(&route("/physics/measurements/errors_and_uncertainties"));
        assert_eq!(controller.state().expanded(), Some(&measurements()));
    }
}
