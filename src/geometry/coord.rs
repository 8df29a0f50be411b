use std::fmt;
use std::str::FromStr;

use geo::{Distance, Haversine};
use serde::{Deserialize, Serialize};

use crate::math::Point2;

/// A WGS84 coordinate in degrees, longitude first (GeoJSON order).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lng: f64,
    pub lat: f64,
}

impl GeoCoord {
    /// Creates a new geographic coordinate.
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Great-circle distance in metres.
    #[must_use]
    pub fn haversine_m(&self, other: &GeoCoord) -> f64 {
        Haversine::distance(geo::Point::from(*self), geo::Point::from(*other))
    }

    /// `[lng, lat]` as a GeoJSON position.
    #[must_use]
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }

    /// Reads a GeoJSON position; extra ordinates (altitude) are ignored.
    #[must_use]
    pub fn from_position(position: &[f64]) -> Option<Self> {
        match position {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(Self::new(*lng, *lat)),
            _ => None,
        }
    }
}

impl From<GeoCoord> for geo::Coord {
    fn from(c: GeoCoord) -> Self {
        geo::Coord { x: c.lng, y: c.lat }
    }
}

impl From<GeoCoord> for geo::Point {
    fn from(c: GeoCoord) -> Self {
        geo::Point::new(c.lng, c.lat)
    }
}

impl fmt::Display for GeoCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Parses `"lng,lat"`.
impl FromStr for GeoCoord {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (lng, lat) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LNG,LAT, got {s:?}"))?;
        let lng: f64 = lng.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
        let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
        Ok(Self::new(lng, lat))
    }
}

/// A point in floor-plan drawing space (arbitrary planar units, y down).
///
/// There is deliberately no conversion to [`GeoCoord`] other than
/// [`crate::georef::GeoTransform`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawingCoord {
    pub x: f64,
    pub y: f64,
}

impl DrawingCoord {
    /// Creates a new drawing-space coordinate.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the coordinate as a math point.
    #[must_use]
    pub fn to_point(self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}
