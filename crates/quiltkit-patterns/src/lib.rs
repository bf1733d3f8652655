//! # QuiltKit Patterns
//!
//! The pattern generation engine: a brick-offset grid of variably sized
//! cells, optionally split into triangles or quadrilaterals, colored so that
//! touching pieces usually differ, and expandable by a seam allowance.
//!
//! ## Pipeline
//!
//! - **Layout**: per-row widths and heights with normalized random variation
//! - **Split**: diagonal or angled cuts of single cells
//! - **Coloring**: one greedy pass with edge-adjacency and weighted colors
//! - **Seam**: miter-joint polygon offset with bevel fallback
//!
//! ## Supporting Infrastructure
//!
//! - **Nesting**: color-grouped requests for a sheet nesting backend
//! - **Pattern files**: versioned JSON bundles of a generated pattern
//!
//! ```no_run
//! use quiltkit_patterns::{PatternMaker, PatternParameters};
//!
//! let mut maker = PatternMaker::new(PatternParameters::default().with_seed(7));
//! let pattern = maker.generate();
//! let cut = pattern.cut_layout();
//! println!("{} pieces, {:.1} x {:.1} mm", cut.cut_lines.len(), cut.bounds.width(), cut.bounds.height());
//! ```

pub mod coloring;
pub mod error;
pub mod layout;
pub mod nesting;
pub mod params;
pub mod pattern_file;
pub mod piece;
pub mod seam;
pub mod split;

pub use coloring::{adjacent_same_color_pairs, assign_colors};
pub use error::{ParameterError, ParameterResult, PatternError, PatternResult};
pub use layout::{generate_dimensions, generate_pattern, layout_pieces, Pattern, PatternMaker};
pub use nesting::{
    CancelToken, ColorGroup, GroupSummary, NestItem, Nester, NestingOutcome, NestingProgress,
    NestingRequest, Placement, SheetSpec, ShelfNester,
};
pub use params::{normalize_weights, reconcile_color_weights, PatternParameters};
pub use pattern_file::{PatternFile, PatternMetadata, FILE_FORMAT_VERSION};
pub use piece::{pieces_bounds, Piece, PiecePosition};
pub use seam::{apply_seam_allowance, offset_polygon, CutLayout, MITER_LIMIT};
pub use split::{split_rectangle, SplitPieces};
