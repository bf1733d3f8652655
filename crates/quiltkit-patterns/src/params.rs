//! Pattern generation parameters.
//!
//! `PatternParameters` is immutable for the duration of a generation run.
//! Range checks live in [`PatternParameters::validate`], which callers run
//! before handing the parameters to the generator; the generator itself does
//! not second-guess its input.

use crate::error::{ParameterError, ParameterResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest and largest grid dimension accepted by validation.
pub const MIN_GRID_DIMENSION: usize = 2;
pub const MAX_GRID_DIMENSION: usize = 20;

/// Supported palette sizes.
pub const MIN_COLORS: usize = 2;
pub const MAX_COLORS: usize = 5;

/// Largest seam allowance in millimeters.
pub const MAX_SEAM_ALLOWANCE: f64 = 15.0;

/// Color weights are kept as percentages.
pub const WEIGHT_TOTAL: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternParameters {
    /// Number of grid rows
    pub rows: usize,
    /// Number of grid columns
    pub cols: usize,
    /// Base cell size in mm
    pub square_size: f64,
    /// Horizontal stagger of odd rows, as a fraction of the base size
    pub offset_amount: f64,
    /// Maximum relative deviation of a cell width from the base size
    pub width_variation: f64,
    /// Maximum relative deviation of a row height from the base size
    pub height_variation: f64,
    /// Probability that a cell is split in two
    pub split_probability: f64,
    /// 0 splits along a diagonal, anything above cuts two quadrilaterals
    pub split_angle_variation: f64,
    pub num_colors: usize,
    /// Relative color weights, one per color, summing to 100
    pub color_weights: Vec<f64>,
    /// Probability that a neighbor's color stays allowed
    pub same_color_probability: f64,
    /// Seam allowance in mm
    pub seam_allowance: f64,
    /// Seed for the pattern's random source
    pub seed: u64,
}

impl Default for PatternParameters {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            square_size: 50.0,
            offset_amount: 0.5,
            width_variation: 0.2,
            height_variation: 0.2,
            split_probability: 0.3,
            split_angle_variation: 0.0,
            num_colors: 3,
            color_weights: vec![34.0, 33.0, 33.0],
            same_color_probability: 0.1,
            seam_allowance: 6.35,
            seed: 42,
        }
    }
}

impl PatternParameters {
    /// Returns a copy with a different color count and reconciled weights.
    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.color_weights = reconcile_color_weights(&self.color_weights, num_colors);
        self.num_colors = num_colors;
        self
    }

    /// Returns a copy with a fresh seed from the thread-local generator.
    ///
    /// Seeds stay within `i64` range so they survive a TOML round trip.
    pub fn with_random_seed(mut self) -> Self {
        self.seed = rand::rng().random_range(0..=i64::MAX as u64);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Weight of one color; colors without a configured weight weigh nothing.
    pub fn color_weight(&self, color: usize) -> f64 {
        self.color_weights.get(color).copied().unwrap_or(0.0)
    }

    /// Number of grid cells before splitting.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn validate(&self) -> ParameterResult<()> {
        check_range(
            "rows",
            self.rows as f64,
            MIN_GRID_DIMENSION as f64,
            MAX_GRID_DIMENSION as f64,
        )?;
        check_range(
            "cols",
            self.cols as f64,
            MIN_GRID_DIMENSION as f64,
            MAX_GRID_DIMENSION as f64,
        )?;

        if !(self.square_size.is_finite() && self.square_size > 0.0) {
            return Err(ParameterError::InvalidValue {
                name: "square_size".to_string(),
                reason: format!("must be a positive length, got {}", self.square_size),
            });
        }

        for (name, value) in [
            ("offset_amount", self.offset_amount),
            ("width_variation", self.width_variation),
            ("height_variation", self.height_variation),
            ("split_probability", self.split_probability),
            ("split_angle_variation", self.split_angle_variation),
            ("same_color_probability", self.same_color_probability),
        ] {
            check_range(name, value, 0.0, 1.0)?;
        }

        check_range(
            "num_colors",
            self.num_colors as f64,
            MIN_COLORS as f64,
            MAX_COLORS as f64,
        )?;

        if self.color_weights.len() != self.num_colors {
            return Err(ParameterError::Incompatible(format!(
                "{} colors but {} color weights",
                self.num_colors,
                self.color_weights.len()
            )));
        }

        if let Some(bad) = self
            .color_weights
            .iter()
            .find(|w| !(w.is_finite() && **w >= 0.0))
        {
            return Err(ParameterError::InvalidValue {
                name: "color_weights".to_string(),
                reason: format!("weights must be non-negative, got {}", bad),
            });
        }

        if self.color_weights.iter().sum::<f64>() <= 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "color_weights".to_string(),
                reason: "at least one weight must be positive".to_string(),
            });
        }

        check_range("seam_allowance", self.seam_allowance, 0.0, MAX_SEAM_ALLOWANCE)?;

        Ok(())
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> ParameterResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ParameterError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        })
    }
}

/// Rescales weights so they sum to 100.
///
/// Negative or non-finite weights count as zero. When nothing positive is
/// left the weights are split evenly.
pub fn normalize_weights(weights: &[f64]) -> Vec<f64> {
    if weights.is_empty() {
        return Vec::new();
    }
    let cleaned: Vec<f64> = weights
        .iter()
        .map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 })
        .collect();
    let total: f64 = cleaned.iter().sum();
    if total <= 0.0 {
        let even = WEIGHT_TOTAL / weights.len() as f64;
        return vec![even; weights.len()];
    }
    cleaned.iter().map(|w| w * WEIGHT_TOTAL / total).collect()
}

/// Produces a weight vector for `new_count` colors from an existing one.
///
/// Surviving colors keep their relative weights, dropped colors are removed
/// and new colors enter with the mean weight of the survivors. The result is
/// renormalized to sum to 100.
pub fn reconcile_color_weights(old: &[f64], new_count: usize) -> Vec<f64> {
    if new_count == 0 {
        return Vec::new();
    }
    let kept: Vec<f64> = old.iter().take(new_count).copied().collect();
    let kept = normalize_weights(&kept);
    let fill = if kept.is_empty() {
        WEIGHT_TOTAL / new_count as f64
    } else {
        kept.iter().sum::<f64>() / kept.len() as f64
    };

    let mut weights = kept;
    weights.resize(new_count, fill);
    normalize_weights(&weights)
}
