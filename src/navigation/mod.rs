//! Origin/destination selection over one immutable floor-plan snapshot.

mod session;

pub use session::NavigationSession;

use tracing::debug;

use crate::engine::{GeometryEngine, PathFinder};
use crate::geometry::GeoCoord;
use crate::model::{Booth, DoorPoint, Route, WalkwayNetwork};
use crate::operations::{PlanRoute, SnapToDoor};
use crate::pipeline::{Derived, PipelineOptions};

/// Which end of the route a selection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Origin,
    Destination,
}

/// Current selection and the route between it.
///
/// `route` is `None` until a route has been computed; a computation that
/// finds nothing yields `Some(Route::NoRoute)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationState {
    pub origin: GeoCoord,
    pub destination: GeoCoord,
    pub route: Option<Route>,
}

impl NavigationState {
    #[must_use]
    pub fn new(origin: GeoCoord, destination: GeoCoord) -> Self {
        Self {
            origin,
            destination,
            route: None,
        }
    }
}

/// A floor plan ready for routing: booths, walkways, everything derived
/// from them and the prebuilt walkway graph.
///
/// Changing the floor plan means building a new `Navigator`.
pub struct Navigator<G, P: PathFinder> {
    engine: G,
    finder: P,
    booths: Vec<Booth>,
    network: WalkwayNetwork,
    derived: Derived,
    graph: P::Graph,
}

impl<G: GeometryEngine, P: PathFinder> Navigator<G, P> {
    /// Runs the full derivation and builds the walkway graph.
    #[must_use]
    pub fn new(
        engine: G,
        finder: P,
        booths: Vec<Booth>,
        network: WalkwayNetwork,
        options: &PipelineOptions,
    ) -> Self {
        let derived = Derived::compute(&engine, &booths, &network, options);
        let graph = finder.build_graph(&network, options.merge_tolerance);
        Self {
            engine,
            finder,
            booths,
            network,
            derived,
            graph,
        }
    }

    #[must_use]
    pub fn booths(&self) -> &[Booth] {
        &self.booths
    }

    #[must_use]
    pub fn network(&self) -> &WalkwayNetwork {
        &self.network
    }

    #[must_use]
    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// Snaps `coord` to a door; unchanged when there are no doors.
    #[must_use]
    pub fn snap(&self, coord: GeoCoord) -> GeoCoord {
        SnapToDoor::new(&self.booths, &self.derived.doors).snap(&self.engine, coord)
    }

    /// A fresh state with both endpoints snapped and no route yet.
    #[must_use]
    pub fn initial_state(&self, origin: GeoCoord, destination: GeoCoord) -> NavigationState {
        NavigationState::new(self.snap(origin), self.snap(destination))
    }

    /// Moves the origin to the door nearest `coord` and replans.
    #[must_use]
    pub fn select_origin(&self, state: &NavigationState, coord: GeoCoord) -> NavigationState {
        self.select(state, Endpoint::Origin, self.snap(coord))
    }

    /// Moves the destination to the door nearest `coord` and replans.
    #[must_use]
    pub fn select_destination(&self, state: &NavigationState, coord: GeoCoord) -> NavigationState {
        self.select(state, Endpoint::Destination, self.snap(coord))
    }

    /// Selects a booth by id, as a search result would, using its door.
    ///
    /// Returns `None` when the booth has no door.
    #[must_use]
    pub fn select_booth(
        &self,
        state: &NavigationState,
        booth_id: &str,
        endpoint: Endpoint,
    ) -> Option<NavigationState> {
        let door = self.derived.doors.for_booth_id(booth_id)?;
        Some(self.select(state, endpoint, door.coord))
    }

    /// First booth whose label is exactly `label`.
    #[must_use]
    pub fn find_booth_by_label(&self, label: &str) -> Option<&Booth> {
        self.booths
            .iter()
            .find(|b| b.label.as_deref() == Some(label))
    }

    /// Doors whose booth label contains `term`, ignoring case. An empty
    /// term matches every labelled door.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&DoorPoint> {
        let needle = term.to_lowercase();
        self.derived
            .doors
            .iter()
            .filter(|d| {
                d.label
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Plans between the state's endpoints as they are.
    #[must_use]
    pub fn recompute(&self, state: &NavigationState) -> NavigationState {
        let route = PlanRoute::new(&self.finder, &self.graph, &self.network).execute(
            &self.engine,
            state.origin,
            state.destination,
        );
        NavigationState {
            origin: state.origin,
            destination: state.destination,
            route: Some(route),
        }
    }

    fn select(&self, state: &NavigationState, endpoint: Endpoint, coord: GeoCoord) -> NavigationState {
        debug!(?endpoint, %coord, "endpoint selected");
        let next = match endpoint {
            Endpoint::Origin => NavigationState::new(coord, state.destination),
            Endpoint::Destination => NavigationState::new(state.origin, coord),
        };
        self.recompute(&next)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::{PlanarGeometry, WalkwayGraphFinder};
    use crate::geometry::GeoPolygon;

    const STEP: f64 = 1e-5;

    fn c(x: f64, y: f64) -> GeoCoord {
        GeoCoord::new(-79.3595 + x * STEP, 43.8128 + y * STEP)
    }

    fn square(id: &str, label: &str, x0: f64) -> Booth {
        Booth::new(
            id,
            Some(label.to_owned()),
            GeoPolygon::new(vec![c(x0, 1.0), c(x0 + 2.0, 1.0), c(x0 + 2.0, 3.0), c(x0, 3.0)]),
        )
    }

    /// Three booths in a row above a corridor; each booth's bottom-left
    /// corner is a corridor vertex.
    fn navigator() -> Navigator<PlanarGeometry, WalkwayGraphFinder> {
        let booths = vec![
            square("1", "Fish", 0.0),
            square("2", "Fruit", 4.0),
            square("3", "Flowers", 8.0),
        ];
        let corridor = vec![
            c(0.0, 1.0),
            c(2.0, 0.0),
            c(4.0, 1.0),
            c(6.0, 0.0),
            c(8.0, 1.0),
        ];
        Navigator::new(
            PlanarGeometry::new(),
            WalkwayGraphFinder,
            booths,
            WalkwayNetwork::new(vec![corridor]),
            &PipelineOptions::default(),
        )
    }

    #[test]
    fn initial_state_has_no_route_yet() {
        let nav = navigator();
        let state = nav.initial_state(c(1.0, 2.0), c(9.0, 2.0));
        assert!(state.route.is_none());
        assert_eq!(state.origin, c(0.0, 1.0));
        assert_eq!(state.destination, c(8.0, 1.0));
    }

    #[test]
    fn selecting_destination_replans() {
        let nav = navigator();
        let state = nav.initial_state(c(1.0, 2.0), c(1.0, 2.0));
        let next = nav.select_destination(&state, c(5.0, 2.0));
        assert_eq!(next.destination, c(4.0, 1.0));
        let route = next.route.unwrap();
        assert_eq!(route.coords().unwrap(), &[c(0.0, 1.0), c(2.0, 0.0), c(4.0, 1.0)]);
        // The input state is untouched.
        assert!(state.route.is_none());
    }

    #[test]
    fn same_booth_both_ends_is_no_route() {
        let nav = navigator();
        let state = nav.initial_state(c(1.0, 2.0), c(1.0, 2.0));
        let next = nav.select_origin(&state, c(1.5, 2.5));
        assert_eq!(next.route, Some(Route::NoRoute));
    }

    #[test]
    fn select_booth_uses_its_door() {
        let nav = navigator();
        let state = nav.initial_state(c(1.0, 2.0), c(1.0, 2.0));
        let next = nav.select_booth(&state, "3", Endpoint::Destination).unwrap();
        assert_eq!(next.destination, c(8.0, 1.0));
        assert_eq!(next.route.unwrap().coords().unwrap().len(), 5);
        assert!(nav.select_booth(&state, "missing", Endpoint::Origin).is_none());
    }

    #[test]
    fn label_lookup_and_search() {
        let nav = navigator();
        assert_eq!(nav.find_booth_by_label("Fruit").unwrap().id, "2");
        assert!(nav.find_booth_by_label("fruit").is_none());
        let hits: Vec<_> = nav.search("fl").iter().map(|d| d.booth_id.clone()).collect();
        assert_eq!(hits, ["3"]);
        assert_eq!(nav.search("").len(), 3);
    }
}
