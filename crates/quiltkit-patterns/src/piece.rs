//! Pattern pieces.

use quiltkit_core::{BoundingBox, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a piece sits inside its grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiecePosition {
    /// First half of a split cell
    Top,
    /// Second half of a split cell
    Bottom,
    /// Unsplit cell
    Full,
}

impl fmt::Display for PiecePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// One cut piece of the pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Stable identifier, unique within a pattern
    pub id: String,
    pub polygon: Polygon,
    /// Index into the external palette; `None` until colors are assigned
    pub color: Option<usize>,
    pub is_triangle: bool,
    /// Source grid row
    pub row: usize,
    /// Sequential piece column within the row; a split cell occupies two
    pub col: usize,
    /// Source grid column
    pub grid_col: usize,
    pub position: PiecePosition,
}

impl Piece {
    /// Creates an uncolored piece. The id is derived from row and piece column.
    pub fn new(
        polygon: Polygon,
        row: usize,
        col: usize,
        grid_col: usize,
        position: PiecePosition,
        is_triangle: bool,
    ) -> Self {
        Self {
            id: format!("piece-{}-{}", row, col),
            polygon,
            color: None,
            is_triangle,
            row,
            col,
            grid_col,
            position,
        }
    }

    pub fn is_split(&self) -> bool {
        self.position != PiecePosition::Full
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.polygon.bounding_box()
    }

    /// Copy of this piece with a replaced outline; id and metadata are kept.
    pub fn with_polygon(&self, polygon: Polygon) -> Piece {
        Piece {
            polygon,
            ..self.clone()
        }
    }
}

/// Union bounding box of every vertex of every piece. Empty input yields a zero box.
pub fn pieces_bounds(pieces: &[Piece]) -> BoundingBox {
    BoundingBox::from_points(pieces.iter().flat_map(|p| p.polygon.points())).unwrap_or_default()
}
