//! Dense LU factorization with partial pivoting
//!
//! This crate computes a permutation P, a unit lower triangular L and an
//! upper triangular U such that `P * A = L * U` for a square real matrix A.
//! It is the first step for solving linear systems, computing determinants
//! or inverting matrices; those consumers are not part of this crate.
//!
//! # Features
//!
//! - **In place**: [`lu_pivot_in_place`] overwrites caller-owned `ndarray`
//!   buffers and allocates nothing
//! - **Owned factors**: [`lu_factorize`] returns a [`LuFactorization`] with
//!   dense `lower()`, `upper()` and `permutation_matrix()` accessors
//! - **Pivot policy**: permissive by default (zero pivots give inf/NaN),
//!   opt-in strict mode returning [`LuError::SingularMatrix`]
//! - **Parallel elimination**: rows of a stage are distributed with rayon
//!   (`parallel` feature, on by default)
//! - **Generic Scalar Types**: works with f64 and f32
//!
//! # Example
//!
//! ```
//! use math_audio_lu::{LuConfig, identity_permutation, lu_pivot_in_place};
//! use ndarray::{Array2, array};
//!
//! let mut a = array![[1.0_f64, 1.0, 1.0], [2.0, 1.0, 3.0], [3.0, 1.0, 1.0]];
//! let mut l = Array2::<f64>::zeros((3, 3));
//! let mut p = identity_permutation(3);
//!
//! lu_pivot_in_place(&mut a, &mut l, &mut p, &LuConfig::default()).unwrap();
//! assert_eq!(p[0], 2);
//! assert_eq!(a[[0, 0]], 3.0);
//! ```

pub mod config;
pub mod error;
pub mod export;
pub mod factorize;
pub mod parallel;
pub mod permutation;
pub mod primitives;
pub mod testdata;
pub mod traits;

// Re-export main types
pub use config::{ConfigError, ConfigFormat, LuConfig, PivotPolicy};
pub use error::{LuError, Result};
pub use factorize::{LuFactorization, LuReport, lu_factorize, lu_pivot_in_place};
pub use traits::RealField;

// Re-export building blocks
pub use parallel::is_parallel_available;
pub use permutation::{
    identity_permutation, is_permutation, permutation_matrix, permute_rows, validate_permutation,
    validate_permutation_in_place,
};
pub use primitives::{index_of_largest_magnitude, row_eliminate, row_swap};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
