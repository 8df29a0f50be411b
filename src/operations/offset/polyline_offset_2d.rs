use crate::error::{OperationError, Result};
use crate::math::intersect_2d::{line_line_intersect_2d, point_at, segment_segment_intersect_2d};
use crate::math::polygon_2d::{
    left_normal, rotate_to_canonical_start, segment_direction, signed_area_2d,
};
use crate::math::{Point2, Vector2, TOLERANCE};

/// When `cos(angle between consecutive segments) < this`, use a flat cap
/// instead of a miter join. Only for near-180° reversals (> ~169°).
const FLAT_CAP_COS: f64 = -0.98;

/// Maximum miter distance as a multiple of `|distance|`. Longer miters are
/// replaced by a bevel (two points).
const MITER_LIMIT: f64 = 4.0;

/// Offsets a 2D polyline by a given distance with self-intersection trimming.
///
/// Works in a planar metric frame; geographic rings are projected through
/// [`crate::geometry::LocalFrame`] before reaching this operation.
///
/// # Algorithm
///
/// 1. Offset each segment perpendicular to its direction.
/// 2. Build the raw offset polyline by intersecting consecutive offset
///    lines. Near-antiparallel segments get a flat cap instead of a
///    divergent miter.
/// 3. Walk the raw polyline, detect self-intersections, remove loops.
///
/// # Sign Convention
///
/// - Positive distance: left offset (relative to walking direction)
/// - Negative distance: right offset
///
/// For a counter-clockwise ring, left is inward.
#[derive(Debug)]
pub struct PolylineOffset2D {
    points: Vec<Point2>,
    distance: f64,
    closed: bool,
}

impl PolylineOffset2D {
    /// Creates a new polyline offset operation.
    #[must_use]
    pub fn new(points: Vec<Point2>, distance: f64, closed: bool) -> Self {
        Self {
            points,
            distance,
            closed,
        }
    }

    /// Executes the offset operation.
    ///
    /// For **closed** polylines, produces an inset/outset ring.
    /// For **open** polylines, produces a closed ring tracing both sides of
    /// the path with flat caps at the endpoints (a line buffer). Both signs
    /// of `distance` produce the same outline for open input.
    ///
    /// # Errors
    ///
    /// - `OperationError::InvalidInput` if fewer than 2 points are provided
    ///   or a segment has zero length
    /// - `OperationError::Failed` if the offset collapses
    pub fn execute(&self) -> Result<Vec<Point2>> {
        if self.points.len() < 2 {
            return Err(OperationError::InvalidInput(
                "at least 2 points are required for polyline offset".to_owned(),
            )
            .into());
        }

        if self.distance.abs() < TOLERANCE {
            return Ok(self.points.clone());
        }

        if self.closed {
            self.execute_closed()
        } else {
            self.execute_open()
        }
    }

    fn execute_closed(&self) -> Result<Vec<Point2>> {
        let raw = build_one_side_offset_closed(&self.points, self.distance)?;

        let original_area = signed_area_2d(&self.points);
        let trimmed = trim_closed_loops(&raw, original_area.signum());

        if trimmed.len() < 3 {
            return Err(OperationError::Failed(
                "offset collapsed to fewer than 3 points".to_owned(),
            )
            .into());
        }

        // An inward offset can only shrink the ring; growth or a winding
        // flip means it passed through itself.
        let result_area = signed_area_2d(&trimmed);
        let is_inward = original_area * self.distance > 0.0;
        if is_inward
            && original_area.abs() > TOLERANCE
            && (result_area.abs() > original_area.abs() || result_area * original_area <= 0.0)
        {
            return Err(OperationError::Failed(
                "offset collapsed (passed through center)".to_owned(),
            )
            .into());
        }

        Ok(trimmed)
    }

    fn execute_open(&self) -> Result<Vec<Point2>> {
        let d = self.distance.abs();

        let forward = build_one_side_offset(&self.points, d)?;
        let reversed_input: Vec<Point2> = self.points.iter().copied().rev().collect();
        let backward = build_one_side_offset(&reversed_input, d)?;

        // Reversals make the backward side retrace flat caps already emitted
        // by the forward side.
        let dup_tol_sq = TOLERANCE * TOLERANCE * 1e8;
        let filtered_backward = backward
            .into_iter()
            .filter(|bp| !forward.iter().any(|fp| (bp - fp).norm_squared() < dup_tol_sq));

        let mut combined = forward.clone();
        combined.extend(filtered_backward);

        if combined.len() < 3 {
            return Err(OperationError::Failed(
                "offset collapsed to fewer than 3 points".to_owned(),
            )
            .into());
        }

        let winding = signed_area_2d(&combined).signum();
        let sign = if winding.abs() < 0.5 { 1.0 } else { winding };
        let trimmed = trim_closed_loops(&combined, sign);

        if trimmed.len() < 3 {
            return Err(OperationError::Failed(
                "offset collapsed to fewer than 3 points".to_owned(),
            )
            .into());
        }

        Ok(rotate_to_canonical_start(&trimmed))
    }
}

/// Offsets every segment of `points`; `wrap` adds the closing segment.
fn offset_segments(
    points: &[Point2],
    distance: f64,
    wrap: bool,
) -> Result<(Vec<(Point2, Point2)>, Vec<Vector2>)> {
    let n = points.len();
    let segment_count = if wrap { n } else { n - 1 };
    let mut segments = Vec::with_capacity(segment_count);
    let mut directions = Vec::with_capacity(segment_count);

    for i in 0..segment_count {
        let j = (i + 1) % n;
        let dir = segment_direction(&points[i], &points[j])?;
        let offset = left_normal(dir) * distance;
        segments.push((points[i] + offset, points[j] + offset));
        directions.push(dir);
    }

    if segments.is_empty() {
        return Err(OperationError::Failed("no valid segments to offset".to_owned()).into());
    }
    Ok((segments, directions))
}

/// One-sided offset of an open polyline.
fn build_one_side_offset(points: &[Point2], distance: f64) -> Result<Vec<Point2>> {
    let n = points.len();
    let (segments, directions) = offset_segments(points, distance, false)?;

    let mut raw = Vec::with_capacity(n * 2);
    raw.push(segments[0].0);
    for i in 1..n - 1 {
        push_corner(
            &mut raw,
            &segments[i - 1],
            &segments[i],
            &directions[i - 1],
            &directions[i],
            &points[i],
            distance,
        );
    }
    raw.push(segments[segments.len() - 1].1);
    Ok(raw)
}

/// One-sided offset of a closed ring; corner `i` joins segments `i-1` and `i`.
fn build_one_side_offset_closed(points: &[Point2], distance: f64) -> Result<Vec<Point2>> {
    let (segments, directions) = offset_segments(points, distance, true)?;
    let count = segments.len();

    let mut raw = Vec::with_capacity(count * 2);
    for i in 0..count {
        let prev = if i == 0 { count - 1 } else { i - 1 };
        push_corner(
            &mut raw,
            &segments[prev],
            &segments[i],
            &directions[prev],
            &directions[i],
            &points[i],
            distance,
        );
    }
    Ok(raw)
}

/// Pushes the join between two offset segments.
///
/// Near-antiparallel segments get a flat cap, over-long miters a bevel,
/// everything else a single miter point.
fn push_corner(
    raw: &mut Vec<Point2>,
    seg_prev: &(Point2, Point2),
    seg_next: &(Point2, Point2),
    dir_prev: &Vector2,
    dir_next: &Vector2,
    original_corner: &Point2,
    distance: f64,
) {
    if dir_prev.dot(dir_next) < FLAT_CAP_COS {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
        return;
    }

    let corner = intersect_offset_lines(seg_prev, seg_next, original_corner, distance);
    let limit = MITER_LIMIT * distance.abs();
    if (corner - original_corner).norm_squared() > limit * limit {
        raw.push(seg_prev.1);
        raw.push(seg_next.0);
    } else {
        raw.push(corner);
    }
}

/// Intersects two offset lines; parallel lines fall back to shifting the
/// original corner along the previous normal.
fn intersect_offset_lines(
    seg_prev: &(Point2, Point2),
    seg_next: &(Point2, Point2),
    original_corner: &Point2,
    distance: f64,
) -> Point2 {
    let d_prev = seg_prev.1 - seg_prev.0;
    let d_next = seg_next.1 - seg_next.0;

    if let Some((t, _u)) = line_line_intersect_2d(&seg_prev.1, &d_prev, &seg_next.0, &d_next) {
        point_at(&seg_prev.1, &d_prev, t)
    } else {
        let normal = left_normal(
            d_prev
                .try_normalize(TOLERANCE)
                .unwrap_or(Vector2::new(1.0, 0.0)),
        );
        original_corner + normal * distance
    }
}

fn are_adjacent(i: usize, j: usize, n: usize) -> bool {
    let diff = i.abs_diff(j);
    diff == 1 || diff == n - 1
}

/// First genuine crossing between non-adjacent segments of a closed ring.
///
/// Endpoint-to-endpoint touches are skipped. Returns `(i, j, point)` with
/// `i < j` segment indices.
fn find_first_self_intersection(points: &[Point2]) -> Option<(usize, usize, Point2)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    let eps = TOLERANCE * 100.0;
    for i in 0..n {
        let i_next = (i + 1) % n;
        for j in (i + 2)..n {
            if are_adjacent(i, j, n) {
                continue;
            }
            let j_next = (j + 1) % n;
            if let Some((pt, t, u)) = segment_segment_intersect_2d(
                &points[i],
                &points[i_next],
                &points[j],
                &points[j_next],
            ) {
                let t_at_end = t < eps || t > 1.0 - eps;
                let u_at_end = u < eps || u > 1.0 - eps;
                if t_at_end && u_at_end {
                    continue;
                }
                return Some((i, j, pt));
            }
        }
    }
    None
}

/// Splits a closed ring at the crossing of segments `seg_i < seg_j`.
///
/// - A: `[x, P(i+1), ..., P(j)]`
/// - B: `[x, P(j+1), ..., P(i)]` (wrapping)
fn split_at_intersection(
    points: &[Point2],
    seg_i: usize,
    seg_j: usize,
    intersection: Point2,
) -> (Vec<Point2>, Vec<Point2>) {
    let n = points.len();

    let mut a = Vec::with_capacity(seg_j - seg_i + 1);
    a.push(intersection);
    a.extend_from_slice(&points[(seg_i + 1)..=seg_j]);

    let mut b = Vec::with_capacity(n - (seg_j - seg_i) + 1);
    b.push(intersection);
    let mut idx = (seg_j + 1) % n;
    loop {
        b.push(points[idx]);
        if idx == seg_i {
            break;
        }
        idx = (idx + 1) % n;
    }

    (a, b)
}

/// Removes consecutive duplicates and collinear vertices from a closed ring.
fn clean_polygon(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let deduped = crate::math::polygon_2d::dedup_ring(points, TOLERANCE * 10.0);
    if deduped.len() < 3 {
        return deduped;
    }

    let n = deduped.len();
    let mut cleaned = Vec::with_capacity(n);
    for i in 0..n {
        let prev = deduped[if i == 0 { n - 1 } else { i - 1 }];
        let next = deduped[(i + 1) % n];
        let cross = (deduped[i] - prev).perp(&(next - deduped[i]));
        if cross.abs() >= TOLERANCE {
            cleaned.push(deduped[i]);
        }
    }

    if cleaned.len() < 3 {
        return deduped;
    }
    cleaned
}

/// Recursively removes self-intersection loops from a closed ring.
///
/// At each crossing the ring splits in two; the part whose winding matches
/// `winding_sign` survives (larger area on a tie). Each split strictly
/// reduces the vertex count, so recursion terminates.
fn trim_closed_loops(points: &[Point2], winding_sign: f64) -> Vec<Point2> {
    let pts = clean_polygon(points);

    if pts.len() < 4 {
        return pts;
    }
    match find_first_self_intersection(&pts) {
        None => pts,
        Some((i, j, pt)) => {
            let (a, b) = split_at_intersection(&pts, i, j, pt);
            let trimmed_a = trim_closed_loops(&a, winding_sign);
            let trimmed_b = trim_closed_loops(&b, winding_sign);
            let area_a = signed_area_2d(&trimmed_a);
            let area_b = signed_area_2d(&trimmed_b);
            match (area_a * winding_sign > 0.0, area_b * winding_sign > 0.0) {
                (true, false) => trimmed_a,
                (false, true) => trimmed_b,
                _ => {
                    if area_a.abs() >= area_b.abs() {
                        trimmed_a
                    } else {
                        trimmed_b
                    }
                }
            }
        }
    }
}
