//! Layout generator
//!
//! Builds the brick-pattern grid: per-row cell widths and per-row heights
//! with bounded random variation, a two-phase horizontal stagger on odd
//! rows, and an optional split per cell. Colors are assigned once every
//! piece exists.

use crate::coloring::assign_colors;
use crate::params::PatternParameters;
use crate::piece::{pieces_bounds, Piece, PiecePosition};
use crate::seam::{apply_seam_allowance, CutLayout};
use crate::split::split_rectangle;
use quiltkit_core::{BoundingBox, Polygon};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Generates `count` sizes around `base` whose sum is exactly `count * base`.
///
/// Each sample is `base * (1 + u * variation)` with `u` uniform in [-1, 1],
/// then the whole set is rescaled to the target total. A variation of zero
/// returns the base size everywhere without drawing from `rng`.
pub fn generate_dimensions<R: Rng + ?Sized>(
    count: usize,
    base: f64,
    variation: f64,
    rng: &mut R,
) -> Vec<f64> {
    if variation == 0.0 {
        return vec![base; count];
    }

    let mut sizes: Vec<f64> = (0..count)
        .map(|_| base * (1.0 + rng.random_range(-1.0..=1.0) * variation))
        .collect();

    let target_total = count as f64 * base;
    let current_total: f64 = sizes.iter().sum();
    let scale = target_total / current_total;
    for size in &mut sizes {
        *size *= scale;
    }
    sizes
}

/// The outcome of one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Pieces in generation order: row-major, split halves in sequence
    pub pieces: Vec<Piece>,
    /// Parameters that produced the pieces, seed included
    pub params: PatternParameters,
    pub bounds: BoundingBox,
}

impl Pattern {
    /// Wraps an already materialized piece list, recomputing the bounds.
    pub fn from_pieces(params: PatternParameters, pieces: Vec<Piece>) -> Self {
        let bounds = pieces_bounds(&pieces);
        Self {
            pieces,
            params,
            bounds,
        }
    }

    pub fn width(&self) -> f64 {
        self.bounds.width()
    }

    pub fn height(&self) -> f64 {
        self.bounds.height()
    }

    pub fn triangle_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_triangle).count()
    }

    /// Number of pieces per color index; uncolored pieces are not counted.
    pub fn color_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for color in self.pieces.iter().filter_map(|p| p.color) {
            *counts.entry(color).or_insert(0) += 1;
        }
        counts
    }

    /// Applies the configured seam allowance to every piece.
    pub fn cut_layout(&self) -> CutLayout {
        apply_seam_allowance(&self.pieces, self.params.seam_allowance)
    }
}

/// Lays out the grid and splits cells, leaving every piece uncolored.
pub fn layout_pieces<R: Rng + ?Sized>(params: &PatternParameters, rng: &mut R) -> Vec<Piece> {
    let base = params.square_size;
    let heights = generate_dimensions(params.rows, base, params.height_variation, rng);

    let mut pieces = Vec::with_capacity(params.cell_count() * 2);
    let mut y = 0.0;

    for (row, &height) in heights.iter().enumerate() {
        let widths = generate_dimensions(params.cols, base, params.width_variation, rng);
        let mut x = (row % 2) as f64 * params.offset_amount * base;
        let mut piece_col = 0;

        for (grid_col, &width) in widths.iter().enumerate() {
            let rect = Polygon::rectangle(x, y, width, height);

            if rng.random_bool(params.split_probability) {
                let split = split_rectangle(&rect, params.split_angle_variation, rng);
                pieces.push(Piece::new(
                    split.first,
                    row,
                    piece_col,
                    grid_col,
                    PiecePosition::Top,
                    split.is_triangle,
                ));
                pieces.push(Piece::new(
                    split.second,
                    row,
                    piece_col + 1,
                    grid_col,
                    PiecePosition::Bottom,
                    split.is_triangle,
                ));
                piece_col += 2;
            } else {
                pieces.push(Piece::new(
                    rect,
                    row,
                    piece_col,
                    grid_col,
                    PiecePosition::Full,
                    false,
                ));
                piece_col += 1;
            }

            x += width;
        }

        y += height;
    }

    pieces
}

/// Runs layout, splitting and color assignment with the given random source.
pub fn generate_pattern<R: Rng + ?Sized>(params: &PatternParameters, rng: &mut R) -> Pattern {
    let mut pieces = layout_pieces(params, rng);
    debug!(
        pieces = pieces.len(),
        rows = params.rows,
        cols = params.cols,
        "Laid out pattern grid"
    );

    assign_colors(&mut pieces, params, rng);

    Pattern::from_pieces(params.clone(), pieces)
}

/// Seeded pattern generator.
///
/// The random source is reseeded from the parameters on every
/// [`generate`](PatternMaker::generate) call, so the same parameters always
/// reproduce the same pattern.
pub struct PatternMaker {
    params: PatternParameters,
    rng: StdRng,
}

impl PatternMaker {
    pub fn new(params: PatternParameters) -> Self {
        let rng = StdRng::seed_from_u64(params.seed);
        Self { params, rng }
    }

    pub fn params(&self) -> &PatternParameters {
        &self.params
    }

    pub fn generate(&mut self) -> Pattern {
        // Reset RNG state for reproducible results
        self.rng = StdRng::seed_from_u64(self.params.seed);

        let pattern = generate_pattern(&self.params, &mut self.rng);
        info!(
            seed = self.params.seed,
            pieces = pattern.pieces.len(),
            triangles = pattern.triangle_count(),
            width = pattern.width(),
            height = pattern.height(),
            "Generated pattern"
        );
        pattern
    }
}
