//! Route binding.
//!
//! Connects the current route to the sidebar:
//!
//! - [`RouteNotifier`] / [`RouteObserver`]: the route-change stream, with a
//!   synchronous accessor for the current route.
//! - [`is_active`]: exact-path link highlighting.
//! - [`sidebar_view`]: projection of tree, accordion state and route into
//!   the data the sidebar renders.
//!
//! Chapter containment is a prefix match (see
//! [`NavTree::chapter_containing`]); link activity is an exact match. A
//! route can be inside an expanded chapter without any of its links being
//! active.

use serde::Serialize;
use tokio::sync::watch;

use crate::accordion::AccordionState;
use crate::route::Route;
use crate::tree::{ChapterId, NavTree, SubEntry};

/// True iff the entry's path equals `route` exactly.
#[must_use]
pub fn is_active(entry: &SubEntry, route: &Route) -> bool {
    entry.path == *route
}

/// Sidebar link state for a sub-entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryView {
    /// Display text.
    pub title: String,
    /// Link target.
    pub path: Route,
    /// True if this link is the current page.
    pub active: bool,
}

/// Sidebar state for a chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChapterView {
    /// Chapter id (toggle key).
    pub id: ChapterId,
    /// Display title.
    pub title: String,
    /// Target of the chapter label.
    pub href: Route,
    /// True if this chapter's entries are shown.
    pub expanded: bool,
    /// Sub-entries in display order.
    pub entries: Vec<EntryView>,
}

/// Everything the sidebar needs to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    /// Sidebar collapsed to its narrow rail.
    pub collapsed: bool,
    /// Chapters in display order.
    pub chapters: Vec<ChapterView>,
}

/// Project the navigation tree into a [`SidebarView`].
///
/// `route` is `None` before the first navigation event; no link is active then.
#[must_use]
pub fn sidebar_view(
    tree: &NavTree,
    state: &AccordionState,
    route: Option<&Route>,
    collapsed: bool,
) -> SidebarView {
    let chapters = tree
        .chapters()
        .iter()
        .map(|chapter| ChapterView {
            id: chapter.id.clone(),
            title: chapter.title.clone(),
            href: chapter.landing().clone(),
            expanded: state.is_expanded(&chapter.id),
            entries: chapter
                .entries
                .iter()
                .map(|entry| EntryView {
                    title: entry.title.clone(),
                    path: entry.path.clone(),
                    active: route.is_some_and(|r| is_active(entry, r)),
                })
                .collect(),
        })
        .collect();

    SidebarView {
        collapsed,
        chapters,
    }
}

/// Publishing side of the route stream.
#[derive(Debug)]
pub struct RouteNotifier {
    tx: watch::Sender<Route>,
}

/// Consuming side of the route stream.
///
/// The first call to [`changed`](Self::changed) yields the initial route, so
/// consumers handle the initial load like any other navigation.
#[derive(Clone, Debug)]
pub struct RouteObserver {
    rx: watch::Receiver<Route>,
}

/// Create a route stream starting at `initial`.
#[must_use]
pub fn route_channel(initial: Route) -> (RouteNotifier, RouteObserver) {
    let (tx, mut rx) = watch::channel(initial);
    rx.mark_changed();
    (RouteNotifier { tx }, RouteObserver { rx })
}

impl RouteNotifier {
    /// Publish a navigation event.
    ///
    /// Observers are notified even when the route is unchanged: navigating to
    /// the current page is still a navigation event.
    pub fn navigate(&self, route: Route) {
        tracing::debug!(route = %route, "Navigation event");
        self.tx.send_replace(route);
    }

    /// Current route.
    #[must_use]
    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    /// Create another observer of this stream.
    ///
    /// The new observer starts with the current route marked as unseen.
    #[must_use]
    pub fn subscribe(&self) -> RouteObserver {
        let mut rx = self.tx.subscribe();
        rx.mark_changed();
        RouteObserver { rx }
    }
}

impl RouteObserver {
    /// Current route, without waiting.
    #[must_use]
    pub fn current(&self) -> Route {
        self.rx.borrow().clone()
    }

    /// Wait for the next navigation event.
    ///
    /// Returns `None` once the notifier is dropped.
    pub async fn changed(&mut self) -> Option<Route> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
