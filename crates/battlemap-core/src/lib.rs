//! # Battlemap Core
//!
//! Core types, errors, and geometry primitives shared by the Battlemap crates.
//! Provides the value types the drawing model is built on (points, bounding
//! rectangles, the world/screen coordinate transform) and the error
//! hierarchy used by the model and the document codec.

pub mod error;
pub mod geometry;
pub mod types;

pub use error::{Error, Result, SerializationError, ShapeError};

pub use geometry::{BoundingRect, CoordinateTransform, Point};

pub use types::{shared, Shared};
