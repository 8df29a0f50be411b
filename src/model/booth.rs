use crate::geometry::GeoPolygon;

/// A single stall or room of the floor plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Booth {
    pub id: String,
    pub label: Option<String>,
    pub polygon: GeoPolygon,
}

impl Booth {
    #[must_use]
    pub fn new(id: impl Into<String>, label: Option<String>, polygon: GeoPolygon) -> Self {
        Self {
            id: id.into(),
            label,
            polygon,
        }
    }
}

/// A passthrough display polygon (market entrances).
#[derive(Debug, Clone, PartialEq)]
pub struct Entrance {
    pub label: Option<String>,
    pub polygon: GeoPolygon,
}
