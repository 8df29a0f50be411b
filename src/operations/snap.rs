use crate::engine::GeometryEngine;
use crate::geometry::GeoCoord;
use crate::model::{Booth, DoorPoint, DoorSet};

/// Resolves an arbitrary map coordinate to a door.
///
/// The first booth containing the coordinate decides: its own door when it
/// has one. Otherwise, and for coordinates outside every booth, the
/// nearest door of the whole set is used.
#[derive(Debug, Clone, Copy)]
pub struct SnapToDoor<'a> {
    booths: &'a [Booth],
    doors: &'a DoorSet,
}

impl<'a> SnapToDoor<'a> {
    #[must_use]
    pub fn new(booths: &'a [Booth], doors: &'a DoorSet) -> Self {
        Self { booths, doors }
    }

    /// Returns `None` only when the door set is empty.
    #[must_use]
    pub fn execute(&self, engine: &impl GeometryEngine, coord: GeoCoord) -> Option<&'a DoorPoint> {
        let own = self
            .booths
            .iter()
            .position(|b| engine.contains(&b.polygon, coord))
            .and_then(|i| self.doors.for_booth(i));
        own.or_else(|| self.doors.nearest(coord))
    }

    /// The snapped coordinate, or `coord` unchanged when there is no door.
    #[must_use]
    pub fn snap(&self, engine: &impl GeometryEngine, coord: GeoCoord) -> GeoCoord {
        self.execute(engine, coord).map_or(coord, |d| d.coord)
    }
}
