use super::{Endpoint, NavigationState, Navigator};
use crate::engine::{GeometryEngine, PathFinder};
use crate::geometry::GeoCoord;
use crate::model::Route;

type RouteObserver = Box<dyn FnMut(Option<&Route>)>;

/// A navigator plus the one current state, replaced wholesale on every
/// selection. Observers hear about each change of route.
pub struct NavigationSession<G, P: PathFinder> {
    navigator: Navigator<G, P>,
    state: NavigationState,
    observers: Vec<RouteObserver>,
}

impl<G: GeometryEngine, P: PathFinder> NavigationSession<G, P> {
    /// Starts at the given endpoints (snapped) and computes the first route.
    #[must_use]
    pub fn new(navigator: Navigator<G, P>, origin: GeoCoord, destination: GeoCoord) -> Self {
        let initial = navigator.initial_state(origin, destination);
        let state = navigator.recompute(&initial);
        Self {
            navigator,
            state,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator<G, P> {
        &self.navigator
    }

    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    #[must_use]
    pub fn current_route(&self) -> Option<&Route> {
        self.state.route.as_ref()
    }

    /// Registers `callback`, invoked with the new route whenever it changes.
    pub fn on_route_change(&mut self, callback: impl FnMut(Option<&Route>) + 'static) {
        self.observers.push(Box::new(callback));
    }

    pub fn select_origin(&mut self, coord: GeoCoord) -> &NavigationState {
        let next = self.navigator.select_origin(&self.state, coord);
        self.replace(next)
    }

    pub fn select_destination(&mut self, coord: GeoCoord) -> &NavigationState {
        let next = self.navigator.select_destination(&self.state, coord);
        self.replace(next)
    }

    /// Selects a booth's door as `endpoint`; unchanged state when the booth
    /// has no door.
    pub fn select_booth(&mut self, booth_id: &str, endpoint: Endpoint) -> &NavigationState {
        match self.navigator.select_booth(&self.state, booth_id, endpoint) {
            Some(next) => self.replace(next),
            None => &self.state,
        }
    }

    fn replace(&mut self, next: NavigationState) -> &NavigationState {
        let changed = next.route != self.state.route;
        self.state = next;
        if changed {
            let route = self.state.route.as_ref();
            for observer in &mut self.observers {
                observer(route);
            }
        }
        &self.state
    }
}
