//! Capability interfaces the navigation core is written against.
//!
//! Preprocessing, door inference and routing only see these traits, so any
//! geometry or graph engine that honours the contracts can be swapped in.

mod planar;
mod point_set;
mod walkway_graph;

pub use planar::PlanarGeometry;
pub use point_set::PointSet;
pub use walkway_graph::{WalkwayGraph, WalkwayGraphFinder};

use crate::error::Result;
use crate::geometry::{GeoCoord, GeoPolygon};
use crate::model::WalkwayNetwork;

/// Polygon buffering, containment and nearest-point search.
///
/// Buffer distances are metres on the ground; positive grows, negative
/// shrinks.
pub trait GeometryEngine {
    /// Buffers a polygon by `distance_m`.
    ///
    /// # Errors
    ///
    /// Returns an error when the polygon is degenerate or the buffer
    /// collapses it.
    fn buffer_polygon(&self, polygon: &GeoPolygon, distance_m: f64) -> Result<GeoPolygon>;

    /// Buffers a line by `distance_m` on both sides. A closed line yields a
    /// ribbon polygon with a hole.
    ///
    /// # Errors
    ///
    /// Returns an error when the line is degenerate or `distance_m` is not
    /// positive.
    fn buffer_line(&self, line: &[GeoCoord], distance_m: f64) -> Result<GeoPolygon>;

    /// Point-in-polygon; points on the boundary count as inside.
    fn contains(&self, polygon: &GeoPolygon, point: GeoCoord) -> bool;

    /// Index into `set` of the point nearest to `point`.
    fn nearest_point(&self, point: GeoCoord, set: &PointSet) -> Option<usize>;

    /// The polygon's outer boundary as a closed line.
    fn boundary(&self, polygon: &GeoPolygon) -> Vec<GeoCoord> {
        polygon.boundary_line()
    }
}

/// Shortest paths over a walkway line network.
pub trait PathFinder {
    type Graph;

    /// Builds the routable graph; vertices closer than `tolerance` (degrees)
    /// become one node.
    fn build_graph(&self, network: &WalkwayNetwork, tolerance: f64) -> Self::Graph;

    /// Ordered vertex coordinates from `start` to `end`, or `None` when
    /// either is not a node or they are disconnected.
    fn shortest_path(
        &self,
        graph: &Self::Graph,
        start: GeoCoord,
        end: GeoCoord,
    ) -> Option<Vec<GeoCoord>>;
}
