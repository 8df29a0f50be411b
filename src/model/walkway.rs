use crate::engine::PointSet;
use crate::geometry::GeoCoord;

/// The walkable line network of the market.
///
/// Immutable once built: a changed network is a new value.
#[derive(Debug, Clone, Default)]
pub struct WalkwayNetwork {
    lines: Vec<Vec<GeoCoord>>,
    vertices: PointSet,
}

impl WalkwayNetwork {
    /// Builds the network; the vertex sequence is every line's vertices,
    /// line by line, in input order (shared vertices appear once per line).
    #[must_use]
    pub fn new(lines: Vec<Vec<GeoCoord>>) -> Self {
        let flat = lines.iter().flatten().copied().collect();
        Self {
            lines,
            vertices: PointSet::new(flat),
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<GeoCoord>] {
        &self.lines
    }

    /// All walkway points in stable order.
    #[must_use]
    pub fn vertices(&self) -> &[GeoCoord] {
        self.vertices.coords()
    }

    /// The walkway points with their nearest-neighbour index.
    #[must_use]
    pub fn vertex_set(&self) -> &PointSet {
        &self.vertices
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
