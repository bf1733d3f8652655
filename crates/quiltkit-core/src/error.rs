//! Error handling for QuiltKit
//!
//! Provides the geometry validation error and the shared error type used by
//! the settings crate. Pattern generation has its own error type in
//! `quiltkit-patterns`.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a polygon cannot describe a closed shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Polygon has fewer than three vertices
    #[error("Polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// The number of vertices supplied.
        count: usize,
    },

    /// A coordinate is NaN or infinite
    #[error("Non-finite coordinate at vertex {index}")]
    NonFinite {
        /// Index of the offending vertex.
        index: usize,
    },
}

/// Main error type for QuiltKit core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result type alias for QuiltKit core operations
pub type Result<T> = std::result::Result<T, Error>;
