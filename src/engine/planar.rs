use tracing::trace;

use super::{GeometryEngine, PointSet};
use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::{GeoCoord, GeoPolygon, LocalFrame};
use crate::math::polygon_2d::{dedup_ring, point_in_ring, point_on_ring_boundary, signed_area_2d};
use crate::math::{Point2, TOLERANCE};
use crate::operations::offset::PolylineOffset2D;

/// Vertices closer than this (metres) are merged before offsetting.
const DEDUP_TOL_M: f64 = 1e-9;

/// Points this close (degrees) to an edge count as on the boundary.
const BOUNDARY_TOL_DEG: f64 = 1e-12;

/// Default geometry engine: offsets in a per-polygon local metric frame,
/// containment in planar degree space, nearest-point on the ground.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanarGeometry;

impl PlanarGeometry {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl GeometryEngine for PlanarGeometry {
    fn buffer_polygon(&self, polygon: &GeoPolygon, distance_m: f64) -> Result<GeoPolygon> {
        let frame = frame_for(&polygon.exterior)?;
        let exterior = local_ring(&frame, &polygon.exterior);
        let grown = offset_ring(&exterior, distance_m)?;

        let holes = polygon
            .holes
            .iter()
            .filter_map(|hole| {
                let ring = local_ring(&frame, hole);
                match offset_ring(&ring, -distance_m) {
                    Ok(r) => Some(frame.unproject(&r)),
                    Err(err) => {
                        trace!(%err, "hole vanished under buffer");
                        None
                    }
                }
            })
            .collect();

        Ok(GeoPolygon::with_holes(frame.unproject(&grown), holes))
    }

    fn buffer_line(&self, line: &[GeoCoord], distance_m: f64) -> Result<GeoPolygon> {
        if distance_m.is_nan() || distance_m <= 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "line buffer width must be positive, got {distance_m}"
            ))
            .into());
        }
        let frame = frame_for(line)?;

        let closed = line.len() >= 4 && line.first() == line.last();
        if closed {
            let ring = local_ring(&frame, line);
            let outer = offset_ring(&ring, distance_m)?;
            let holes = match offset_ring(&ring, -distance_m) {
                Ok(inner) => vec![frame.unproject(&inner)],
                Err(err) => {
                    trace!(%err, "ribbon interior collapsed, filling");
                    Vec::new()
                }
            };
            return Ok(GeoPolygon::with_holes(frame.unproject(&outer), holes));
        }

        let mut pts = frame.project(line);
        pts.dedup_by(|a, b| (*a - *b).norm() <= DEDUP_TOL_M);
        let outline = PolylineOffset2D::new(pts, distance_m, false).execute()?;
        Ok(GeoPolygon::new(frame.unproject(&outline)))
    }

    fn contains(&self, polygon: &GeoPolygon, point: GeoCoord) -> bool {
        let pt = plane_point(point);
        let tol = BOUNDARY_TOL_DEG;
        let exterior: Vec<Point2> = polygon.exterior.iter().copied().map(plane_point).collect();
        if !point_in_ring(&pt, &exterior, tol) {
            return false;
        }
        !polygon.holes.iter().any(|hole| {
            let ring: Vec<Point2> = hole.iter().copied().map(plane_point).collect();
            point_in_ring(&pt, &ring, 0.0) && !point_on_ring_boundary(&pt, &ring, tol)
        })
    }

    fn nearest_point(&self, point: GeoCoord, set: &PointSet) -> Option<usize> {
        set.nearest(point)
    }
}

fn plane_point(c: GeoCoord) -> Point2 {
    Point2::new(c.lng, c.lat)
}

fn frame_for(ring: &[GeoCoord]) -> Result<LocalFrame> {
    let anchor = ring
        .first()
        .ok_or_else(|| GeometryError::Degenerate("empty ring".to_owned()))?;
    LocalFrame::anchored_at(*anchor)
}

fn local_ring(frame: &LocalFrame, ring: &[GeoCoord]) -> Vec<Point2> {
    dedup_ring(&frame.project(ring), DEDUP_TOL_M)
}

/// Grows the region enclosed by `ring` by `grow` metres (negative shrinks),
/// whatever the ring's winding.
fn offset_ring(ring: &[Point2], grow: f64) -> Result<Vec<Point2>> {
    if ring.len() < 3 {
        return Err(GeometryError::Degenerate(format!(
            "ring has {} distinct vertices",
            ring.len()
        ))
        .into());
    }
    let area = signed_area_2d(ring);
    if area.abs() < TOLERANCE {
        return Err(GeometryError::Degenerate("ring encloses no area".to_owned()).into());
    }
    PolylineOffset2D::new(ring.to_vec(), -grow * area.signum(), true).execute()
}
