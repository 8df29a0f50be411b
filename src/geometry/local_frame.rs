use super::coord::GeoCoord;
use super::EARTH_RADIUS_M;
use crate::error::{GeometryError, Result};
use crate::math::Point2;

/// Equirectangular tangent plane in metres, anchored at one coordinate.
///
/// Offsets of a few decimetres around a booth are applied here and mapped
/// back; distortion over a market hall is far below the offset sizes.
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    anchor: GeoCoord,
    metres_per_deg_lng: f64,
    metres_per_deg_lat: f64,
}

impl LocalFrame {
    /// Creates a frame anchored at `anchor`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` at the poles, where the
    /// east-west scale vanishes.
    pub fn anchored_at(anchor: GeoCoord) -> Result<Self> {
        let metres_per_deg_lat = EARTH_RADIUS_M.to_radians();
        let metres_per_deg_lng = metres_per_deg_lat * anchor.lat.to_radians().cos();
        if !metres_per_deg_lng.is_finite() || metres_per_deg_lng.abs() < 1e-6 {
            return Err(GeometryError::Degenerate(format!(
                "no local frame at latitude {}",
                anchor.lat
            ))
            .into());
        }
        Ok(Self {
            anchor,
            metres_per_deg_lng,
            metres_per_deg_lat,
        })
    }

    /// Projects a geographic coordinate into the plane.
    #[must_use]
    pub fn to_local(&self, c: GeoCoord) -> Point2 {
        Point2::new(
            (c.lng - self.anchor.lng) * self.metres_per_deg_lng,
            (c.lat - self.anchor.lat) * self.metres_per_deg_lat,
        )
    }

    /// Maps a plane point back to geographic coordinates.
    #[must_use]
    pub fn to_geo(&self, p: &Point2) -> GeoCoord {
        GeoCoord::new(
            self.anchor.lng + p.x / self.metres_per_deg_lng,
            self.anchor.lat + p.y / self.metres_per_deg_lat,
        )
    }

    #[must_use]
    pub fn project(&self, ring: &[GeoCoord]) -> Vec<Point2> {
        ring.iter().map(|&c| self.to_local(c)).collect()
    }

    #[must_use]
    pub fn unproject(&self, ring: &[Point2]) -> Vec<GeoCoord> {
        ring.iter().map(|p| self.to_geo(p)).collect()
    }
}
