//! # VectorKit Core
//!
//! Core types and utilities for VectorKit: affine transform math,
//! axis-aligned bounds, and the shared error types used by every layer.

pub mod bounds;
pub mod error;
pub mod math;

pub use bounds::Bounds;
pub use error::{EngineError, Result};
pub use math::{Point, Transform, EPSILON};
