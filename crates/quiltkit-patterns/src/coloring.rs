//! Adjacency-aware color assignment
//!
//! A single forward pass over the piece list in generation order. Each piece
//! looks at the already colored pieces it shares an edge with and, per
//! neighbor, usually forbids that neighbor's color. The color is then drawn
//! from the remaining candidates by configured weight. Earlier pieces are
//! never revisited.

use crate::params::PatternParameters;
use crate::piece::Piece;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use tracing::{debug, trace};

/// Assigns a color index to every piece in place.
pub fn assign_colors<R: Rng + ?Sized>(
    pieces: &mut [Piece],
    params: &PatternParameters,
    rng: &mut R,
) {
    let num_colors = params.num_colors;
    if num_colors == 0 {
        return;
    }
    let mut fallbacks = 0usize;

    for i in 0..pieces.len() {
        let (colored, rest) = pieces.split_at_mut(i);
        let current = &mut rest[0];
        let choice = choose_color(current, colored, params, rng);
        if choice.fallback {
            fallbacks += 1;
            trace!(piece = %current.id, "All colors forbidden, choosing uniformly");
        }
        current.color = Some(choice.color);
    }

    debug!(
        pieces = pieces.len(),
        colors = num_colors,
        fallbacks,
        "Assigned piece colors"
    );
}

struct ColorChoice {
    color: usize,
    fallback: bool,
}

/// Picks a color for `piece` given the pieces colored before it.
fn choose_color<R: Rng + ?Sized>(
    piece: &Piece,
    colored: &[Piece],
    params: &PatternParameters,
    rng: &mut R,
) -> ColorChoice {
    let num_colors = params.num_colors;
    let forbid_probability = 1.0 - params.same_color_probability;
    let mut forbidden = vec![false; num_colors];

    for neighbor in colored {
        let Some(color) = neighbor.color else {
            continue;
        };
        if !piece.polygon.is_edge_adjacent(&neighbor.polygon) {
            continue;
        }
        // rolled per neighbor pair, never cached
        if rng.random::<f64>() < forbid_probability {
            if let Some(slot) = forbidden.get_mut(color) {
                *slot = true;
            }
        }
    }

    let candidates: Vec<usize> = (0..num_colors).filter(|c| !forbidden[*c]).collect();
    if candidates.is_empty() {
        return ColorChoice {
            color: rng.random_range(0..num_colors),
            fallback: true,
        };
    }
    ColorChoice {
        color: pick_weighted(&candidates, params, rng),
        fallback: false,
    }
}

/// Weighted draw restricted to `candidates`; all-zero weights fall back to uniform.
fn pick_weighted<R: Rng + ?Sized>(
    candidates: &[usize],
    params: &PatternParameters,
    rng: &mut R,
) -> usize {
    let weights = candidates.iter().map(|c| params.color_weight(*c));
    match WeightedIndex::new(weights) {
        Ok(dist) => candidates[dist.sample(rng)],
        Err(_) => candidates[rng.random_range(0..candidates.len())],
    }
}

/// Number of edge-adjacent piece pairs that ended up with the same color.
pub fn adjacent_same_color_pairs(pieces: &[Piece]) -> usize {
    let mut count = 0;
    for (i, a) in pieces.iter().enumerate() {
        for b in &pieces[i + 1..] {
            if a.color.is_some() && a.color == b.color && a.polygon.is_edge_adjacent(&b.polygon)
            {
                count += 1;
            }
        }
    }
    count
}
