//! Navigation session.
//!
//! A [`Session`] is one reader's view of the site: the current route, the
//! accordion state, the sidebar rail flag and the content pane. Events are
//! applied strictly in arrival order.
//!
//! Resolving a document can be slow, so navigation hands out a
//! [`ResolveTicket`]. A resolution is applied only if its ticket belongs to
//! the latest navigation; anything older is a [`StaleResolution`] and is
//! dropped.

use std::sync::Arc;

use primer_nav::{
    AccordionController, AccordionState, ChapterId, Route, RouteObserver, SidebarView,
    sidebar_view,
};
use primer_renderer::ComposedPage;
use primer_storage::ResolveError;
use serde::Serialize;
use tokio::task::JoinSet;

use crate::site::Site;

/// Tag for an in-flight resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveTicket {
    route: Route,
    generation: u64,
}

impl ResolveTicket {
    /// Route being resolved.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Navigation generation the ticket was issued for.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Input to [`Session::apply`].
#[derive(Debug)]
pub enum SessionEvent {
    /// The route changed (including the initial load).
    Navigate(Route),
    /// The user clicked a chapter header.
    Toggle(ChapterId),
    /// The user clicked the sidebar collapse handle.
    ToggleSidebar,
    /// A document resolution finished.
    Resolved(ResolveTicket, Result<ComposedPage, ResolveError>),
}

/// A resolution that arrived after a newer navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stale resolution for {route} (generation {generation}, current {current})")]
pub struct StaleResolution {
    /// Route of the discarded resolution.
    pub route: Route,
    /// Generation of the discarded ticket.
    pub generation: u64,
    /// Generation of the latest navigation.
    pub current: u64,
}

/// What the content pane shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContentPane {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the document.
    Loading { route: Route },
    /// Composed page.
    Ready { route: Route, page: ComposedPage },
    /// No document for the route.
    NotFound { route: Route },
    /// The document exists but could not be read.
    Failed { route: Route, message: String },
}

impl ContentPane {
    /// Pane for a finished resolution.
    #[must_use]
    pub fn from_result(route: Route, result: Result<ComposedPage, ResolveError>) -> Self {
        match result {
            Ok(page) => Self::Ready { route, page },
            Err(err) if err.is_not_found() => Self::NotFound { route },
            Err(err) => Self::Failed {
                route,
                message: err.to_string(),
            },
        }
    }

    /// Route the pane belongs to.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Idle => None,
            Self::Loading { route }
            | Self::Ready { route, .. }
            | Self::NotFound { route }
            | Self::Failed { route, .. } => Some(route),
        }
    }
}

/// One reader's navigation session.
#[derive(Debug)]
pub struct Session {
    site: Arc<Site>,
    accordion: AccordionController,
    route: Option<Route>,
    sidebar_collapsed: bool,
    pane: ContentPane,
    generation: u64,
}

impl Session {
    /// Start a session with nothing loaded and every chapter collapsed.
    #[must_use]
    pub fn new(site: Arc<Site>) -> Self {
        let accordion = AccordionController::new(Arc::clone(site.tree()));
        Self {
            site,
            accordion,
            route: None,
            sidebar_collapsed: false,
            pane: ContentPane::Idle,
            generation: 0,
        }
    }

    /// Apply one event. Returns the ticket issued for a navigation.
    ///
    /// Stale resolutions are logged and dropped.
    pub fn apply(&mut self, event: SessionEvent) -> Option<ResolveTicket> {
        match event {
            SessionEvent::Navigate(route) => return Some(self.navigate(route)),
            SessionEvent::Toggle(id) => {
                self.toggle(&id);
            }
            SessionEvent::ToggleSidebar => {
                self.toggle_sidebar();
            }
            SessionEvent::Resolved(ticket, result) => {
                if let Err(stale) = self.resolved(ticket, result) {
                    tracing::debug!(
                        route = %stale.route,
                        generation = stale.generation,
                        current = stale.current,
                        "Discarded stale resolution"
                    );
                }
            }
        }
        None
    }

    /// Navigate to `route`: reconcile the accordion and start loading.
    pub fn navigate(&mut self, route: Route) -> ResolveTicket {
        self.generation += 1;
        self.accordion.on_route(&route);
        self.pane = ContentPane::Loading {
            route: route.clone(),
        };
        self.route = Some(route.clone());
        ResolveTicket {
            route,
            generation: self.generation,
        }
    }

    /// Toggle a chapter header.
    pub fn toggle(&mut self, id: &ChapterId) -> &AccordionState {
        self.accordion.toggle(id)
    }

    /// Toggle the sidebar rail. Returns the new collapsed flag.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }

    /// Apply a finished resolution.
    ///
    /// # Errors
    ///
    /// Returns [`StaleResolution`] when `ticket` is not from the latest
    /// navigation. The pane is left untouched.
    pub fn resolved(
        &mut self,
        ticket: ResolveTicket,
        result: Result<ComposedPage, ResolveError>,
    ) -> Result<&ContentPane, StaleResolution> {
        if ticket.generation != self.generation || self.route.as_ref() != Some(&ticket.route) {
            return Err(StaleResolution {
                route: ticket.route,
                generation: ticket.generation,
                current: self.generation,
            });
        }
        self.pane = ContentPane::from_result(ticket.route, result);
        Ok(&self.pane)
    }

    /// Follow a route stream until it ends, resolving documents on the
    /// blocking pool.
    ///
    /// Returns once the notifier is dropped and every in-flight resolution
    /// has been applied or discarded.
    pub async fn follow(&mut self, mut observer: RouteObserver) {
        let mut tasks = JoinSet::new();
        let mut open = true;

        loop {
            tokio::select! {
                changed = observer.changed(), if open => match changed {
                    Some(route) => {
                        let ticket = self.navigate(route);
                        let site = Arc::clone(&self.site);
                        tasks.spawn_blocking(move || {
                            let result = site.render(&ticket.route);
                            (ticket, result)
                        });
                    }
                    None => open = false,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => match joined {
                    Ok((ticket, result)) => {
                        self.apply(SessionEvent::Resolved(ticket, result));
                    }
                    Err(err) => tracing::warn!(error = %err, "Resolution task failed"),
                },
                else => break,
            }
        }
    }

    /// Current sidebar.
    #[must_use]
    pub fn sidebar(&self) -> SidebarView {
        sidebar_view(
            self.site.tree(),
            self.accordion.state(),
            self.route.as_ref(),
            self.sidebar_collapsed,
        )
    }

    /// Accordion state.
    #[must_use]
    pub fn accordion(&self) -> &AccordionState {
        self.accordion.state()
    }

    /// Content pane.
    #[must_use]
    pub fn pane(&self) -> &ContentPane {
        &self.pane
    }

    /// Latest route, `None` before the first navigation.
    #[must_use]
    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Site the session reads from.
    #[must_use]
    pub fn site(&self) -> &Arc<Site> {
        &self.site
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteConfig;
    use crate::site::fixtures::{route, site};
    use primer_nav::route_channel;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(Arc::new(site(SiteConfig::default())))
    }

    fn measurements() -> ChapterId {
        ChapterId::new("measurements")
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = session();
        assert_eq!(session.pane(), &ContentPane::Idle);
        assert_eq!(session.route(), None);
        assert_eq!(session.accordion().expanded(), None);
    }

    #[test]
    fn test_navigate_then_resolve() {
        let mut session = session();
        let current = route("/physics/measurements/errors_and_uncertainties");

        let ticket = session.navigate(current.clone());
        assert_eq!(
            session.pane(),
            &ContentPane::Loading {
                route: current.clone()
            }
        );
        assert_eq!(session.accordion().expanded(), Some(&measurements()));

        let result = session.site().render(ticket.route());
        let pane = session.resolved(ticket, result).unwrap();
        assert!(matches!(
            pane,
            ContentPane::Ready { page, .. } if page.title.as_deref() == Some("Errors and Uncertainties")
        ));
    }

    #[test]
    fn test_stale_resolution_discarded() {
        let mut session = session();
        let first = session.navigate(route("/physics/measurements/errors_and_uncertainties"));
        let second = session.navigate(route("/physics/forces_and_moments/type_of_forces"));

        let stale = session
            .resolved(first, Ok(ComposedPage::default()))
            .unwrap_err();
        assert_eq!(stale.generation, 1);
        assert_eq!(stale.current, 2);
        assert_eq!(
            session.pane(),
            &ContentPane::Loading {
                route: route("/physics/forces_and_moments/type_of_forces")
            }
        );

        let result = session.site().render(second.route());
        session.resolved(second, result).unwrap();
        assert_eq!(
            session.pane(),
            &ContentPane::NotFound {
                route: route("/physics/forces_and_moments/type_of_forces")
            }
        );
    }

    #[test]
    fn test_renavigating_same_route_invalidates_old_ticket() {
        let mut session = session();
        let first = session.navigate(route("/"));
        let _second = session.navigate(route("/"));
        assert!(session.resolved(first, Ok(ComposedPage::default())).is_err());
    }

    #[test]
    fn test_apply_events_in_order() {
        let mut session = session();

        // Toggle before the navigation is superseded by its reconciliation.
        session.apply(SessionEvent::Toggle(ChapterId::new("Forces and Moments")));
        let ticket = session
            .apply(SessionEvent::Navigate(route("/physics/measurements")))
            .unwrap();
        assert_eq!(session.accordion().expanded(), Some(&measurements()));

        // Toggle after it is authoritative.
        session.apply(SessionEvent::Toggle(measurements()));
        assert_eq!(session.accordion().expanded(), None);

        session.apply(SessionEvent::Resolved(ticket, Ok(ComposedPage::default())));
        assert_eq!(session.accordion().expanded(), None);
        assert!(matches!(session.pane(), ContentPane::Ready { .. }));
    }

    #[test]
    fn test_toggle_sidebar() {
        let mut session = session();
        assert!(session.toggle_sidebar());
        assert!(session.sidebar().collapsed);
        assert!(!session.toggle_sidebar());
    }

    #[test]
    fn test_sidebar_follows_session() {
        let mut session = session();
        session.navigate(route("/physics/measurements/physical_quantities_prefixes"));

        let view = session.sidebar();
        assert!(view.chapters[0].expanded);
        assert!(view.chapters[0].entries[0].active);
        assert!(!view.chapters[0].entries[1].active);
    }

    #[test]
    fn test_pane_serialization() {
        let pane = ContentPane::NotFound {
            route: route("/missing"),
        };
        let json = serde_json::to_value(&pane).unwrap();
        assert_eq!(json["state"], "not_found");
        assert_eq!(json["route"], "/missing");
    }

    #[tokio::test]
    async fn test_follow_resolves_initial_route() {
        let mut session = session();
        let (notifier, observer) =
            route_channel(route("/physics/measurements/errors_and_uncertainties"));
        drop(notifier);

        session.follow(observer).await;

        assert!(matches!(session.pane(), ContentPane::Ready { .. }));
        assert_eq!(session.accordion().expanded(), Some(&measurements()));
    }

    #[tokio::test]
    async fn test_follow_reports_missing_content() {
        let mut session = session();
        let (notifier, observer) = route_channel(route("/physics/forces_and_moments"));
        drop(notifier);

        session.follow(observer).await;

        assert_eq!(
            session.pane(),
            &ContentPane::NotFound {
                route: route("/physics/forces_and_moments")
            }
        );
        assert_eq!(
            session.accordion().expanded().map(ChapterId::as_str),
            Some("Forces and Moments")
        );
    }
}
