use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::geometry::{GeoCoord, EARTH_RADIUS_M};

type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Distances within this many metres are a tie.
const TIE_M: f64 = 1e-9;

/// An ordered set of geographic points with a nearest-neighbour index.
///
/// Order is the insertion order and is what ties are broken on: when two
/// points are equally near, the one that came first wins.
#[derive(Debug, Clone)]
pub struct PointSet {
    coords: Vec<GeoCoord>,
    tree: RTree<IndexedPoint>,
}

impl PointSet {
    /// Indexes `coords`, keeping their order.
    #[must_use]
    pub fn new(coords: Vec<GeoCoord>) -> Self {
        let entries = coords
            .iter()
            .enumerate()
            .map(|(i, c)| IndexedPoint::new([c.lng, c.lat], i))
            .collect();
        Self {
            coords,
            tree: RTree::bulk_load(entries),
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[GeoCoord] {
        &self.coords
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<GeoCoord> {
        self.coords.get(index).copied()
    }

    /// Index of the point nearest to `query` by great-circle distance.
    ///
    /// The tree is walked in degree-space order and stops once no remaining
    /// point can beat the best distance found.
    #[must_use]
    pub fn nearest(&self, query: GeoCoord) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (entry, d2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&[query.lng, query.lat])
        {
            if let Some((_, best_m)) = best {
                if ground_lower_bound_m(query, d2.sqrt()) > best_m + TIE_M {
                    break;
                }
            }
            let index = entry.data;
            let metres = query.haversine_m(&self.coords[index]);
            let better = match best {
                None => true,
                Some((i, b)) => metres < b - TIE_M || (metres <= b + TIE_M && index < i),
            };
            if better {
                best = Some((index, metres));
            }
        }
        best.map(|(i, _)| i)
    }
}

/// Metres that a point `deg` degrees from `query` in the plane is at least
/// away on the ground. Halved to stay below the haversine distance.
fn ground_lower_bound_m(query: GeoCoord, deg: f64) -> f64 {
    let lat = (query.lat.abs() + deg).min(90.0);
    0.5 * EARTH_RADIUS_M * deg.to_radians() * lat.to_radians().cos()
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn nearest_on_empty_is_none() {
        assert!(PointSet::default().nearest(GeoCoord::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn nearest_picks_closest() {
        let set = PointSet::new(vec![
            GeoCoord::new(0.0, 0.0),
            GeoCoord::new(1.0, 0.0),
            GeoCoord::new(2.0, 0.0),
        ]);
        assert_eq!(set.nearest(GeoCoord::new(1.8, 0.1)), Some(2));
        assert_eq!(set.nearest(GeoCoord::new(0.9, -0.3)), Some(1));
    }

    #[test]
    fn ties_go_to_earliest_point() {
        let set = PointSet::new(vec![
            GeoCoord::new(2.0, 0.0),
            GeoCoord::new(0.0, 0.0),
            GeoCoord::new(2.0, 0.0),
        ]);
        assert_eq!(set.nearest(GeoCoord::new(1.0, 0.0)), Some(0));
        assert_eq!(set.nearest(GeoCoord::new(2.0, 0.0)), Some(0));
    }

    #[test]
    fn nearest_is_measured_on_the_ground() {
        // At 60°N a degree of longitude is half a degree of latitude on the
        // ground: the point further away in degrees is nearer in metres.
        let set = PointSet::new(vec![GeoCoord::new(0.0, 60.6), GeoCoord::new(0.9, 60.0)]);
        assert_eq!(set.nearest(GeoCoord::new(0.0, 60.0)), Some(1));
    }
}
