use tracing::debug;

use crate::engine::{GeometryEngine, PathFinder};
use crate::geometry::GeoCoord;
use crate::model::{Route, WalkwayNetwork};

/// Default vertex merge tolerance in degrees.
pub const DEFAULT_MERGE_TOLERANCE: f64 = 1e-7;

/// Walks from one point to another over a prebuilt walkway graph.
///
/// Both endpoints are first moved to their nearest walkway vertex. The
/// raw path is then gated: fewer than three coordinates means the two
/// endpoints collapsed onto the same or adjacent vertices and there is
/// nothing worth drawing.
pub struct PlanRoute<'a, P: PathFinder> {
    finder: &'a P,
    graph: &'a P::Graph,
    network: &'a WalkwayNetwork,
}

impl<'a, P: PathFinder> PlanRoute<'a, P> {
    #[must_use]
    pub fn new(finder: &'a P, graph: &'a P::Graph, network: &'a WalkwayNetwork) -> Self {
        Self {
            finder,
            graph,
            network,
        }
    }

    /// Never fails; every failure mode is [`Route::NoRoute`].
    #[must_use]
    pub fn execute(
        &self,
        engine: &impl GeometryEngine,
        origin: GeoCoord,
        destination: GeoCoord,
    ) -> Route {
        let vertices = self.network.vertex_set();
        let (Some(start), Some(end)) = (
            engine
                .nearest_point(origin, vertices)
                .and_then(|i| vertices.get(i)),
            engine
                .nearest_point(destination, vertices)
                .and_then(|i| vertices.get(i)),
        ) else {
            debug!("empty walkway network");
            return Route::NoRoute;
        };

        let route = Route::gated(self.finder.shortest_path(self.graph, start, end));
        debug!(%start, %end, found = route.is_path(), "route planned");
        route
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::{PlanarGeometry, WalkwayGraphFinder};
    use crate::georef::GeoBounds;

    const STEP: f64 = 1e-5;

    fn c(x: f64, y: f64) -> GeoCoord {
        GeoCoord::new(-79.3595 + x * STEP, 43.8128 + y * STEP)
    }

    fn plan(network: &WalkwayNetwork, from: GeoCoord, to: GeoCoord) -> Route {
        let finder = WalkwayGraphFinder;
        let graph = finder.build_graph(network, DEFAULT_MERGE_TOLERANCE);
        PlanRoute::new(&finder, &graph, network).execute(&PlanarGeometry::new(), from, to)
    }

    #[test]
    fn same_vertex_is_no_route() {
        let net = WalkwayNetwork::new(vec![vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]]);
        assert_eq!(plan(&net, c(0.0, 0.1), c(0.1, 0.0)), Route::NoRoute);
    }

    #[test]
    fn adjacent_vertices_are_no_route() {
        let net = WalkwayNetwork::new(vec![vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]]);
        assert_eq!(plan(&net, c(0.0, 0.0), c(1.0, 0.0)), Route::NoRoute);
    }

    #[test]
    fn intermediate_vertex_gives_a_path() {
        let net = WalkwayNetwork::new(vec![vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]]);
        let route = plan(&net, c(-0.3, 0.2), c(2.4, -0.1));
        assert_eq!(route.coords().unwrap(), &[c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]);
    }

    #[test]
    fn empty_network_is_no_route() {
        assert_eq!(plan(&WalkwayNetwork::default(), c(0.0, 0.0), c(5.0, 0.0)), Route::NoRoute);
    }

    #[test]
    fn disconnected_is_no_route() {
        let net = WalkwayNetwork::new(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)],
            vec![c(10.0, 0.0), c(11.0, 0.0), c(12.0, 0.0)],
        ]);
        assert_eq!(plan(&net, c(0.0, 0.0), c(12.0, 0.0)), Route::NoRoute);
    }

    #[test]
    fn endpoints_beyond_the_market_box_are_planned() {
        let bounds = GeoBounds::default();
        let (from, to) = (c(-2000.0, 0.0), c(2000.0, 0.0));
        assert!(!bounds.contains(from) && !bounds.contains(to));

        let net = WalkwayNetwork::new(vec![vec![c(0.0, 0.0), c(1.0, 0.0), c(2.0, 0.0)]]);
        assert!(plan(&net, from, to).is_path());

        let split = WalkwayNetwork::new(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0)],
            vec![c(5.0, 0.0), c(6.0, 0.0)],
        ]);
        assert_eq!(plan(&split, from, to), Route::NoRoute);
    }
}
