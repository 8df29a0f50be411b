use super::distance_2d::point_to_segment_dist;
use super::{Point2, Vector2, TOLERANCE};
use crate::error::{OperationError, Result};

/// Computes the signed area of a ring (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Rotates a closed ring so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || (pt.x - b.x).abs() < TOLERANCE && pt.y < b.y {
            best = i;
        }
    }
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Computes the normalized direction from point `a` to point `b`.
///
/// # Errors
///
/// Returns `OperationError::InvalidInput` if the segment has zero length.
pub fn segment_direction(a: &Point2, b: &Point2) -> Result<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return Err(OperationError::InvalidInput(format!(
            "zero-length segment between ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        ))
        .into());
    }
    Ok(d / len)
}

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Whether `pt` lies within `tol` of any edge of the closed ring.
#[must_use]
pub fn point_on_ring_boundary(pt: &Point2, ring: &[Point2], tol: f64) -> bool {
    let n = ring.len();
    (0..n).any(|i| {
        let a = &ring[i];
        let b = &ring[(i + 1) % n];
        point_to_segment_dist(pt.x, pt.y, a.x, a.y, b.x, b.y) <= tol
    })
}

/// Even-odd ray casting test against a single ring.
///
/// Points within `boundary_tol` of any edge count as inside.
#[must_use]
pub fn point_in_ring(pt: &Point2, ring: &[Point2], boundary_tol: f64) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    if point_on_ring_boundary(pt, ring, boundary_tol) {
        return true;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = &ring[j];
        let b = &ring[i];
        if (b.y > pt.y) != (a.y > pt.y) {
            let x_cross = (a.x - b.x) * (pt.y - b.y) / (a.y - b.y) + b.x;
            if pt.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Drops consecutive duplicate vertices, including a repeated closing vertex.
#[must_use]
pub fn dedup_ring(points: &[Point2], tol: f64) -> Vec<Point2> {
    let tol_sq = tol * tol;
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &pt in points {
        if let Some(last) = out.last() {
            if (pt - *last).norm_squared() <= tol_sq {
                continue;
            }
        }
        out.push(pt);
    }
    while out.len() > 1 {
        let first = out[0];
        match out.last() {
            Some(last) if (first - *last).norm_squared() <= tol_sq => {
                out.pop();
            }
            _ => break,
        }
    }
    out
}
