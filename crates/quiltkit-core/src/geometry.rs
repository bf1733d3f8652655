//! Polygon primitives
//!
//! Points, closed polygons and axis-aligned bounding boxes. All coordinates
//! are millimeters in screen orientation (y grows downward), which is what
//! the layout generator and the downstream SVG renderer both assume.

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// Absolute per-axis tolerance used when comparing vertices of adjacent pieces.
pub const POINT_TOLERANCE: f64 = 0.01;

/// Edges shorter than this are treated as degenerate.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// A 2D coordinate in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point with the given X and Y coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculates the distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    /// Length of the point interpreted as a vector from the origin.
    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// True when both coordinates differ by less than `tolerance`.
    pub fn approx_eq(&self, other: &Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance && (self.y - other.y).abs() < tolerance
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bbox.include(p);
        }
        Some(bbox)
    }

    /// Grows the box so it contains `p`.
    pub fn include(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// A closed polygon.
///
/// Vertex order encodes both the edges and the winding direction; the last
/// vertex connects implicitly back to the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Wraps a vertex list without validation.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Rejects fewer than three vertices or non-finite coordinates.
    ///
    /// Generated polygons are valid by construction; this guards polygons
    /// read back from files.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.points.len() < 3 {
            return Err(GeometryError::TooFewVertices {
                count: self.points.len(),
            });
        }
        if let Some(index) = self
            .points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(GeometryError::NonFinite { index });
        }
        Ok(())
    }

    /// Rectangle with corners ordered top-left, top-right, bottom-right, bottom-left.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace signed area. Positive when the vertices run counter-clockwise
    /// in a y-up frame (clockwise on screen).
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| self.points[i].cross(&self.points[(i + 1) % n]))
            .sum();
        twice / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }

    /// Number of our vertices that coincide with some vertex of `other`.
    pub fn shared_vertex_count(&self, other: &Polygon, tolerance: f64) -> usize {
        self.points
            .iter()
            .filter(|p| other.points.iter().any(|q| p.approx_eq(q, tolerance)))
            .count()
    }

    /// Edge-adjacency heuristic: two or more shared vertices count as a shared edge.
    ///
    /// This misclassifies polygons that touch at two non-adjacent vertices
    /// without sharing an edge. Color distributions are tuned against it, so
    /// it stays a vertex count rather than a true edge overlap test.
    pub fn is_edge_adjacent(&self, other: &Polygon) -> bool {
        self.shared_vertex_count(other, POINT_TOLERANCE) >= 2
    }

    /// True when `other` holds the same vertices in the same cyclic order,
    /// starting from any vertex.
    pub fn same_ring(&self, other: &Polygon, tolerance: f64) -> bool {
        let n = self.points.len();
        if n != other.points.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        (0..n).any(|shift| {
            (0..n).all(|i| {
                self.points[i].approx_eq(&other.points[(i + shift) % n], tolerance)
            })
        })
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Polygon::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Polygon {
        Polygon::rectangle(0.0, 0.0, size, size)
    }

    #[test]
    fn test_rectangle_corner_order() {
        let rect = Polygon::rectangle(10.0, 20.0, 30.0, 40.0);
        assert_eq!(
            rect.points(),
            &[
                Point::new(10.0, 20.0),
                Point::new(40.0, 20.0),
                Point::new(40.0, 60.0),
                Point::new(10.0, 60.0),
            ]
        );
    }

    #[test]
    fn test_area_is_winding_independent() {
        let rect = square(10.0);
        assert!((rect.signed_area() - 100.0).abs() < 1e-12);

        let mut reversed = rect.clone().into_points();
        reversed.reverse();
        let reversed = Polygon::new(reversed);
        assert!((reversed.signed_area() + 100.0).abs() < 1e-12);
        assert!((reversed.area() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_area() {
        let line = Polygon::new(vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)]);
        assert_eq!(line.signed_area(), 0.0);
    }

    #[test]
    fn test_bounding_box() {
        let tri = Polygon::new(vec![
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
            Point::new(1.0, 7.5),
        ]);
        let bbox = tri.bounding_box().unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 4.0, 7.5));
        assert_eq!(bbox.width(), 6.0);
        assert_eq!(bbox.height(), 8.5);

        assert!(Polygon::default().bounding_box().is_none());
    }

    #[test]
    fn test_bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        let b = BoundingBox::new(-1.0, 0.5, 0.5, 3.0);
        assert_eq!(a.union(&b), BoundingBox::new(-1.0, 0.0, 1.0, 3.0));
    }

    #[test]
    fn test_point_tolerance() {
        let a = Point::new(50.0, 50.0);
        assert!(a.approx_eq(&Point::new(50.005, 49.995), POINT_TOLERANCE));
        assert!(!a.approx_eq(&Point::new(50.02, 50.0), POINT_TOLERANCE));
    }

    #[test]
    fn test_edge_adjacency_heuristic() {
        let left = Polygon::rectangle(0.0, 0.0, 50.0, 50.0);
        let right = Polygon::rectangle(50.0, 0.0, 50.0, 50.0);
        let diagonal = Polygon::rectangle(50.0, 50.0, 50.0, 50.0);
        let far = Polygon::rectangle(200.0, 0.0, 50.0, 50.0);

        assert_eq!(left.shared_vertex_count(&right, POINT_TOLERANCE), 2);
        assert!(left.is_edge_adjacent(&right));
        assert_eq!(left.shared_vertex_count(&diagonal, POINT_TOLERANCE), 1);
        assert!(!left.is_edge_adjacent(&diagonal));
        assert!(!left.is_edge_adjacent(&far));
    }

    #[test]
    fn test_polygon_validation() {
        assert_eq!(
            Polygon::new(vec![Point::new(0.0, 0.0)]).validate(),
            Err(GeometryError::TooFewVertices { count: 1 })
        );
        assert_eq!(
            Polygon::new(vec![
                Point::new(0.0, 0.0),
                Point::new(f64::NAN, 0.0),
                Point::new(1.0, 1.0),
            ])
            .validate(),
            Err(GeometryError::NonFinite { index: 1 })
        );
        assert!(square(1.0).validate().is_ok());
    }

    #[test]
    fn test_same_ring_ignores_rotation() {
        let a = square(10.0);
        let mut rotated = a.clone().into_points();
        rotated.rotate_left(2);
        assert!(a.same_ring(&Polygon::new(rotated), 1e-9));

        let mut reversed = a.clone().into_points();
        reversed.reverse();
        assert!(!a.same_ring(&Polygon::new(reversed), 1e-9));
    }

    #[test]
    fn test_polygon_serializes_as_point_list() {
        let tri = Polygon::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
        ]);
        let json = serde_json::to_string(&tri).unwrap();
        assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":1.0,"y":0.0},{"x":0.0,"y":1.0}]"#);
        let back: Polygon = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tri);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rectangle_area_matches_dimensions(
                x in -500.0f64..500.0,
                y in -500.0f64..500.0,
                w in 0.1f64..500.0,
                h in 0.1f64..500.0,
            ) {
                let rect = Polygon::rectangle(x, y, w, h);
                prop_assert!((rect.area() - w * h).abs() < 1e-6 * (1.0 + w * h));
                let bbox = rect.bounding_box().unwrap();
                prop_assert!((bbox.width() - w).abs() < 1e-9 * (1.0 + x.abs() + w));
                prop_assert!((bbox.height() - h).abs() < 1e-9 * (1.0 + y.abs() + h));
            }
        }
    }
}
