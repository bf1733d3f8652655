//! Error types for the pattern crate.
//!
//! Generation itself never fails; these errors cover parameter validation,
//! reading and writing pattern files, and the nesting interface.

use quiltkit_core::GeometryError;
use std::io;
use thiserror::Error;

/// Errors that can occur around pattern generation.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid parameters were provided.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// A stored piece polygon cannot describe a closed shape.
    #[error("Invalid piece geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// A pattern file declares a format version this build cannot read.
    #[error("Unsupported pattern file version: {0}")]
    UnsupportedVersion(String),

    /// The nesting backend failed.
    #[error("Nesting failed: {0}")]
    Nesting(String),

    /// The operation was stopped through its cancel token.
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Errors related to pattern parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter value is invalid.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue { name: String, reason: String },

    /// Parameters are mutually incompatible.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Result type alias for pattern operations.
pub type PatternResult<T> = Result<T, PatternError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;
