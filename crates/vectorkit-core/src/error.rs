//! Error handling for VectorKit.
//!
//! All geometry and scene operations signal failure explicitly; no operation
//! panics or leaves the scene partially mutated. Error types use `thiserror`
//! for ergonomic error handling.

use thiserror::Error;

/// Engine error type.
///
/// Represents the failure modes of scene and geometry operations. Every
/// failure is local to the operation that produced it: either the full
/// operation commits, or nothing does.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The transform cannot be inverted (determinant within epsilon of zero).
    #[error("Degenerate transform: determinant {determinant} is not invertible")]
    DegenerateTransform {
        /// The offending determinant value.
        determinant: f64,
    },

    /// No object with the given id exists in the scene.
    #[error("Object {id} not found in scene")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A path point index is out of range.
    #[error("Path point index {index} out of range (path has {len} points)")]
    InvalidIndex {
        /// The index that was requested.
        index: usize,
        /// The number of addressable points.
        len: usize,
    },
}

/// Result type using `EngineError`.
pub type Result<T> = std::result::Result<T, EngineError>;
