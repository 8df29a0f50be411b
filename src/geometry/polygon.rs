use super::coord::GeoCoord;

/// A simple polygon in geographic coordinates.
///
/// Rings are stored open: the closing vertex that GeoJSON repeats is
/// dropped on construction and added back by [`GeoPolygon::to_rings`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    pub exterior: Vec<GeoCoord>,
    pub holes: Vec<Vec<GeoCoord>>,
}

impl GeoPolygon {
    /// Creates a polygon without holes.
    #[must_use]
    pub fn new(exterior: Vec<GeoCoord>) -> Self {
        Self {
            exterior: open_ring(exterior),
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    #[must_use]
    pub fn with_holes(exterior: Vec<GeoCoord>, holes: Vec<Vec<GeoCoord>>) -> Self {
        Self {
            exterior: open_ring(exterior),
            holes: holes.into_iter().map(open_ring).collect(),
        }
    }

    /// Returns all rings as closed GeoJSON position lists, exterior first.
    #[must_use]
    pub fn to_rings(&self) -> Vec<Vec<Vec<f64>>> {
        std::iter::once(&self.exterior)
            .chain(self.holes.iter())
            .map(|ring| closed_positions(ring))
            .collect()
    }

    /// The exterior ring as a closed line: the polygon's boundary.
    #[must_use]
    pub fn boundary_line(&self) -> Vec<GeoCoord> {
        let mut line = self.exterior.clone();
        if let Some(&first) = self.exterior.first() {
            line.push(first);
        }
        line
    }
}

fn open_ring(mut ring: Vec<GeoCoord>) -> Vec<GeoCoord> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

fn closed_positions(ring: &[GeoCoord]) -> Vec<Vec<f64>> {
    let mut out: Vec<Vec<f64>> = ring.iter().map(|c| c.to_position()).collect();
    if let Some(&first) = ring.first() {
        out.push(first.to_position());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<GeoCoord> {
        vec![
            GeoCoord::new(0.0, 0.0),
            GeoCoord::new(1.0, 0.0),
            GeoCoord::new(1.0, 1.0),
            GeoCoord::new(0.0, 1.0),
            GeoCoord::new(0.0, 0.0),
        ]
    }

    #[test]
    fn closing_vertex_is_dropped_and_restored() {
        let poly = GeoPolygon::new(square());
        assert_eq!(poly.exterior.len(), 4);
        let rings = poly.to_rings();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 5);
        assert_eq!(rings[0][0], rings[0][4]);
    }

    #[test]
    fn boundary_line_is_closed() {
        let line = GeoPolygon::new(square()).boundary_line();
        assert_eq!(line.len(), 5);
        assert_eq!(line.first(), line.last());
    }
}
