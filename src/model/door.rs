use std::collections::HashMap;

use crate::engine::PointSet;
use crate::geometry::GeoCoord;

/// The walkway vertex through which a booth is entered.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorPoint {
    pub coord: GeoCoord,
    /// Position of the booth in the booth list the door was inferred from.
    pub booth: usize,
    pub booth_id: String,
    pub label: Option<String>,
}

/// Door points in booth order, at most one per booth.
///
/// Doors are keyed by booth position, not by id: ids come from the source
/// data and are not guaranteed unique.
#[derive(Debug, Clone, Default)]
pub struct DoorSet {
    doors: Vec<DoorPoint>,
    by_booth: HashMap<usize, usize>,
    points: PointSet,
}

impl DoorSet {
    /// Collects doors; a repeated booth position keeps its first door.
    #[must_use]
    pub fn new(doors: Vec<DoorPoint>) -> Self {
        let mut by_booth = HashMap::with_capacity(doors.len());
        let mut kept = Vec::with_capacity(doors.len());
        for door in doors {
            if by_booth.contains_key(&door.booth) {
                continue;
            }
            by_booth.insert(door.booth, kept.len());
            kept.push(door);
        }
        let points = PointSet::new(kept.iter().map(|d| d.coord).collect());
        Self {
            doors: kept,
            by_booth,
            points,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DoorPoint> {
        self.doors.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doors.is_empty()
    }

    /// Door of the booth at position `booth`.
    #[must_use]
    pub fn for_booth(&self, booth: usize) -> Option<&DoorPoint> {
        self.by_booth.get(&booth).map(|&i| &self.doors[i])
    }

    /// Door of the first booth with id `booth_id`.
    #[must_use]
    pub fn for_booth_id(&self, booth_id: &str) -> Option<&DoorPoint> {
        self.doors.iter().find(|d| d.booth_id == booth_id)
    }

    /// The door nearest to `coord` on the ground; the earliest door wins
    /// ties.
    #[must_use]
    pub fn nearest(&self, coord: GeoCoord) -> Option<&DoorPoint> {
        self.points.nearest(coord).map(|i| &self.doors[i])
    }
}

impl PartialEq for DoorSet {
    fn eq(&self, other: &Self) -> bool {
        self.doors == other.doors
    }
}
