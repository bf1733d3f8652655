//! Piece splitter
//!
//! Divides a rectangular cell into two triangles (diagonal cut) or two
//! quadrilaterals (angled cut). Both halves keep the winding of the source
//! rectangle so area and offset computations stay consistent downstream.

use quiltkit_core::{Point, Polygon};
use rand::Rng;

/// Cut deviation is capped at this share of the 0..1 variation range.
const MAX_DEVIATION_SCALE: f64 = 0.8;

/// Cut points never come closer than this fraction to a vertical edge.
const MIN_CUT_FRACTION: f64 = 0.1;
const MAX_CUT_FRACTION: f64 = 0.9;

/// The two halves of a split cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPieces {
    pub first: Polygon,
    pub second: Polygon,
    pub is_triangle: bool,
}

/// Splits a rectangle given as [top-left, top-right, bottom-right, bottom-left].
///
/// With `angle_variation == 0` the cell is cut along a random diagonal.
/// Otherwise the top and bottom cut points are drawn independently around
/// the center, so the dividing line can lean either way.
pub fn split_rectangle<R: Rng + ?Sized>(
    rect: &Polygon,
    angle_variation: f64,
    rng: &mut R,
) -> SplitPieces {
    let corners = rect.points();
    debug_assert_eq!(corners.len(), 4, "split expects a four-corner rectangle");
    let (tl, tr, br, bl) = (corners[0], corners[1], corners[2], corners[3]);

    if angle_variation == 0.0 {
        let (first, second) = if rng.random_bool(0.5) {
            // top-left to bottom-right
            (vec![tl, tr, br], vec![tl, br, bl])
        } else {
            // top-right to bottom-left
            (vec![tl, tr, bl], vec![tr, br, bl])
        };
        return SplitPieces {
            first: Polygon::new(first),
            second: Polygon::new(second),
            is_triangle: true,
        };
    }

    let max_deviation = angle_variation * MAX_DEVIATION_SCALE;
    let top_fraction = cut_fraction(max_deviation, rng);
    let bottom_fraction = cut_fraction(max_deviation, rng);

    let top_cut = Point::new(tl.x + (tr.x - tl.x) * top_fraction, tl.y);
    let bottom_cut = Point::new(bl.x + (br.x - bl.x) * bottom_fraction, bl.y);

    SplitPieces {
        first: Polygon::new(vec![tl, top_cut, bottom_cut, bl]),
        second: Polygon::new(vec![top_cut, tr, br, bottom_cut]),
        is_triangle: false,
    }
}

fn cut_fraction<R: Rng + ?Sized>(max_deviation: f64, rng: &mut R) -> f64 {
    let jitter = rng.random_range(-0.5..0.5);
    (0.5 + jitter * max_deviation).clamp(MIN_CUT_FRACTION, MAX_CUT_FRACTION)
}
