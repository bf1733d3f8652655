//! Seam offset engine
//!
//! Grows (or shrinks) a closed polygon by a signed distance. Every vertex is
//! replaced by the intersection of its two neighboring edges after each edge
//! has been pushed outward by `distance` (a miter joint). Over-long miters at
//! acute corners are replaced by a two-point bevel.

use crate::piece::{pieces_bounds, Piece};
use quiltkit_core::{BoundingBox, Point, Polygon, LENGTH_EPSILON};
use tracing::debug;

/// A miter farther than this multiple of the distance from its vertex becomes a bevel.
pub const MITER_LIMIT: f64 = 10.0;

/// Direction determinants below this are treated as parallel edges.
const PARALLEL_EPSILON: f64 = 1e-10;

/// Offsets `polygon` by `distance`; positive expands outward, zero is the identity.
///
/// Degenerate (zero-length) edges contribute nothing: a run of coincident
/// vertices is offset as a single corner between its distinct neighbors.
pub fn offset_polygon(polygon: &Polygon, distance: f64) -> Polygon {
    if distance == 0.0 || polygon.len() < 3 {
        return polygon.clone();
    }

    let points = distinct_vertices(polygon.points());
    let n = points.len();
    if n < 3 {
        return polygon.clone();
    }

    // outward side depends on winding
    let outward_sign = if polygon.signed_area() >= 0.0 { 1.0 } else { -1.0 };
    let miter_limit = MITER_LIMIT * distance.abs();
    let mut result = Vec::with_capacity(n);

    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let curr = points[i];
        let next = points[(i + 1) % n];

        let (Some(incoming), Some(outgoing)) = (unit(curr - prev), unit(next - curr)) else {
            continue;
        };

        let incoming_normal = outward_normal(incoming, outward_sign);
        let outgoing_normal = outward_normal(outgoing, outward_sign);

        // offset edge endpoints at this vertex
        let incoming_end = curr + incoming_normal * distance;
        let outgoing_start = curr + outgoing_normal * distance;

        let miter = line_intersection(incoming_end, incoming, outgoing_start, outgoing)
            .unwrap_or_else(|| incoming_end.midpoint(&outgoing_start));

        if miter.distance_to(&curr) > miter_limit {
            result.push(incoming_end);
            result.push(outgoing_start);
        } else {
            result.push(miter);
        }
    }

    Polygon::new(result)
}

/// Collapses runs of coincident vertices, including a run wrapping from the
/// last vertex back to the first.
fn distinct_vertices(points: &[Point]) -> Vec<Point> {
    let mut distinct: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        let repeated = distinct
            .last()
            .is_some_and(|last| (p - *last).length() < LENGTH_EPSILON);
        if !repeated {
            distinct.push(p);
        }
    }
    while distinct.len() > 1 && (distinct[distinct.len() - 1] - distinct[0]).length() < LENGTH_EPSILON
    {
        distinct.pop();
    }
    distinct
}

fn unit(v: Point) -> Option<Point> {
    let len = v.length();
    if len < LENGTH_EPSILON {
        None
    } else {
        Some(v * (1.0 / len))
    }
}

/// Right-hand perpendicular for positive signed area, left-hand otherwise.
fn outward_normal(direction: Point, sign: f64) -> Point {
    Point::new(direction.y * sign, -direction.x * sign)
}

/// Intersection of the infinite lines `p + t*u` and `q + s*v`.
fn line_intersection(p: Point, u: Point, q: Point, v: Point) -> Option<Point> {
    let det = u.cross(&v);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (q - p).cross(&v) / det;
    Some(p + u * t)
}

/// Pieces before and after seam allowance.
#[derive(Debug, Clone, PartialEq)]
pub struct CutLayout {
    /// The original pieces, used as stitching reference
    pub sewing_lines: Vec<Piece>,
    /// Offset copies with the same ids and metadata
    pub cut_lines: Vec<Piece>,
    /// Bounds of the cut lines
    pub bounds: BoundingBox,
}

/// Offsets every piece by `allowance`, keeping the originals alongside.
pub fn apply_seam_allowance(pieces: &[Piece], allowance: f64) -> CutLayout {
    let cut_lines: Vec<Piece> = pieces
        .iter()
        .map(|piece| piece.with_polygon(offset_polygon(&piece.polygon, allowance)))
        .collect();
    let bounds = pieces_bounds(&cut_lines);
    debug!(
        pieces = pieces.len(),
        allowance,
        width = bounds.width(),
        height = bounds.height(),
        "Applied seam allowance"
    );
    CutLayout {
        sewing_lines: pieces.to_vec(),
        cut_lines,
        bounds,
    }
}
