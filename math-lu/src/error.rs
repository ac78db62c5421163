//! Error types for LU factorization.
//!
//! Shape and permutation problems are rejected before the elimination loop
//! starts. A singular pivot is only reported when strict pivoting is
//! requested; the default policy lets inf/NaN propagate through the factors.

use thiserror::Error;

/// Errors that can occur during LU factorization.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LuError {
    /// The matrix has no rows (m must be >= 1).
    #[error("invalid dimension: matrix is {rows}x{cols} (must be at least 1x1)")]
    InvalidDimension {
        /// Number of rows provided
        rows: usize,
        /// Number of columns provided
        cols: usize,
    },

    /// The working matrix is not square.
    #[error("matrix must be square: got {rows}x{cols}")]
    NotSquare {
        /// Number of rows provided
        rows: usize,
        /// Number of columns provided
        cols: usize,
    },

    /// The lower-factor matrix does not have the working matrix's shape.
    #[error("lower factor dimension mismatch: expected {expected}x{expected}, got {rows}x{cols}")]
    DimensionMismatch {
        /// Dimension m of the working matrix
        expected: usize,
        /// Rows of the lower-factor matrix
        rows: usize,
        /// Columns of the lower-factor matrix
        cols: usize,
    },

    /// The permutation has the wrong length.
    #[error("permutation length mismatch: expected {expected}, got {got}")]
    PermutationLength {
        /// Dimension m of the working matrix
        expected: usize,
        /// Length of the permutation provided
        got: usize,
    },

    /// The permutation is not a bijection on [0, m).
    #[error("invalid permutation: entry {value} at position {position} is out of range or repeated")]
    InvalidPermutation {
        /// Position of the first offending entry
        position: usize,
        /// The offending value
        value: usize,
    },

    /// A pivot fell at or below the strict-mode threshold.
    #[error("singular matrix: pivot {pivot:e} at stage {stage} is below threshold {threshold:e}")]
    SingularMatrix {
        /// Elimination stage at which the pivot was selected
        stage: usize,
        /// Magnitude of the selected pivot
        pivot: f64,
        /// Threshold in effect
        threshold: f64,
    },
}

/// A specialized `Result` type for LU operations.
pub type Result<T> = std::result::Result<T, LuError>;

impl LuError {
    /// Returns `true` if strict pivoting rejected the matrix.
    pub fn is_singular(&self) -> bool {
        matches!(self, LuError::SingularMatrix { .. })
    }
}
