//! # QuiltKit Core
//!
//! Core types and utilities for QuiltKit.
//! Provides the polygon primitives every other crate builds on and the
//! shared error type.

pub mod error;
pub mod geometry;

pub use error::{Error, GeometryError, Result};
pub use geometry::{BoundingBox, Point, Polygon, LENGTH_EPSILON, POINT_TOLERANCE};
