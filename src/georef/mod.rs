//! Georeferencing between floor-plan drawing space and WGS84.
//!
//! The drawing is first mapped onto Web Mercator (EPSG:3857) metres by a
//! fixed affine transform, then unprojected to longitude/latitude. This is
//! the only place where [`DrawingCoord`] and [`GeoCoord`] meet.

use std::f64::consts::PI;

use serde::Deserialize;

use crate::error::{GeometryError, Result};
use crate::geometry::{DrawingCoord, GeoCoord};
use crate::math::{Matrix2, Vector2};

/// Half the Web Mercator world width in metres.
pub const MERCATOR_HALF_EXTENT: f64 = 20_037_508.34;

/// Affine calibration of the floor plan against Web Mercator.
///
/// `merc_x = top_left_x + x * x_resolution + y * x_rotation`
/// `merc_y = top_left_y + x * y_rotation + y * y_resolution`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub top_left_x: f64,
    pub top_left_y: f64,
    pub x_resolution: f64,
    pub y_resolution: f64,
    pub x_rotation: f64,
    pub y_rotation: f64,
}

impl Default for TransformParams {
    /// Freehand georeferencer fit of the market floor plan, with rotation.
    fn default() -> Self {
        Self {
            top_left_x: -8_834_328.944_332_929,
            top_left_y: 5_436_567.117_633_28,
            x_resolution: 0.063_178_143_130_8,
            y_resolution: -0.063_178_143_131_2,
            x_rotation: 0.019_168_322_233_9,
            y_rotation: 0.019_168_322_233_9,
        }
    }
}

/// Extent of the floor plan in drawing units, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DrawingBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for DrawingBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 2220.0,
            min_y: 0.0,
            max_y: 1680.0,
        }
    }
}

impl DrawingBounds {
    #[must_use]
    pub fn contains(&self, c: DrawingCoord) -> bool {
        c.x >= self.min_x && c.x <= self.max_x && c.y >= self.min_y && c.y <= self.max_y
    }
}

/// Geographic box the market map is limited to.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeoBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self {
            min_lng: -79.360_032_27,
            min_lat: 43.812_500_21,
            max_lng: -79.358_552_8,
            max_lat: 43.813_410_058,
        }
    }
}

impl GeoBounds {
    #[must_use]
    pub fn contains(&self, c: GeoCoord) -> bool {
        (self.min_lng..=self.max_lng).contains(&c.lng)
            && (self.min_lat..=self.max_lat).contains(&c.lat)
    }
}

/// Bidirectional drawing ↔ geographic transform.
#[derive(Debug, Clone, Copy)]
pub struct GeoTransform {
    origin: Vector2,
    linear: Matrix2,
    inverse: Matrix2,
    bounds: DrawingBounds,
}

impl GeoTransform {
    /// Builds the transform from calibration constants.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the linear part is singular.
    pub fn new(params: TransformParams, bounds: DrawingBounds) -> Result<Self> {
        let linear = Matrix2::new(
            params.x_resolution,
            params.x_rotation,
            params.y_rotation,
            params.y_resolution,
        );
        let inverse = linear.try_inverse().ok_or_else(|| {
            GeometryError::Degenerate("affine transform is not invertible".to_owned())
        })?;
        Ok(Self {
            origin: Vector2::new(params.top_left_x, params.top_left_y),
            linear,
            inverse,
            bounds,
        })
    }

    /// The market floor plan calibration.
    ///
    /// # Errors
    ///
    /// Never fails for the built-in constants; kept fallible for symmetry
    /// with [`GeoTransform::new`].
    pub fn market_default() -> Result<Self> {
        Self::new(TransformParams::default(), DrawingBounds::default())
    }

    /// Drawing space → WGS84.
    #[must_use]
    pub fn to_geo(&self, c: DrawingCoord) -> GeoCoord {
        let merc = self.origin + self.linear * Vector2::new(c.x, c.y);
        mercator_to_wgs84(merc)
    }

    /// WGS84 → drawing space.
    #[must_use]
    pub fn to_drawing(&self, c: GeoCoord) -> DrawingCoord {
        let local = self.inverse * (wgs84_to_mercator(c) - self.origin);
        DrawingCoord::new(local.x, local.y)
    }

    /// Whether `c` lies within the known floor-plan extent.
    #[must_use]
    pub fn is_within_bounds(&self, c: DrawingCoord) -> bool {
        self.bounds.contains(c)
    }

    /// Converts a drawing-space ring, rejecting any vertex outside the extent.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::OutOfBounds` for the first offending vertex.
    pub fn ring_to_geo(&self, ring: &[DrawingCoord]) -> Result<Vec<GeoCoord>> {
        ring.iter()
            .map(|&c| {
                if self.is_within_bounds(c) {
                    Ok(self.to_geo(c))
                } else {
                    Err(GeometryError::OutOfBounds { x: c.x, y: c.y }.into())
                }
            })
            .collect()
    }
}

/// Spherical Web Mercator metres → longitude/latitude.
fn mercator_to_wgs84(merc: Vector2) -> GeoCoord {
    let lng = merc.x / MERCATOR_HALF_EXTENT * 180.0;
    let m = merc.y / MERCATOR_HALF_EXTENT * 180.0;
    let lat = (2.0 * (m * PI / 180.0).exp().atan() - PI / 2.0).to_degrees();
    GeoCoord::new(lng, lat)
}

/// Longitude/latitude → spherical Web Mercator metres.
fn wgs84_to_mercator(c: GeoCoord) -> Vector2 {
    let x = c.lng * MERCATOR_HALF_EXTENT / 180.0;
    let m = ((90.0 + c.lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    Vector2::new(x, m * MERCATOR_HALF_EXTENT / 180.0)
}
