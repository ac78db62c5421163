//! Test matrices for the factorizer
//!
//! The two demo families reproduce the matrices of the classic LUpivot
//! driver; the remaining generators cover random and singular inputs.

use crate::traits::RealField;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Which demo matrix to synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    /// `A[r][c] = r * c + 1` above the diagonal, `r - c + 1` on and below
    Nonsymmetric,
    /// `A[r][c] = |r - c| + 1`
    Symmetric,
}

/// Demo matrix of dimension m
///
/// On and below the diagonal both kinds use `r - c + 1`. Above it the
/// symmetric kind mirrors that value, the nonsymmetric kind uses `r * c + 1`.
pub fn demo_matrix<T: RealField>(m: usize, kind: DemoKind) -> Array2<T> {
    Array2::from_shape_fn((m, m), |(r, c)| {
        let value = if r < c {
            match kind {
                DemoKind::Symmetric => c - r + 1,
                DemoKind::Nonsymmetric => r * c + 1,
            }
        } else {
            r - c + 1
        };
        T::from_f64_lossy(value as f64)
    })
}

/// Random matrix with entries uniform in [-1, 1), reproducible from `seed`
pub fn random_matrix<T: RealField>(m: usize, seed: u64) -> Array2<T> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array2::from_shape_fn((m, m), |_| T::from_f64_lossy(rng.random_range(-1.0..1.0)))
}

/// Random matrix whose column `column` is identically zero
///
/// # Panics
/// Panics if `column >= m`.
pub fn zero_column_matrix<T: RealField>(m: usize, column: usize, seed: u64) -> Array2<T> {
    let mut a = random_matrix(m, seed);
    a.column_mut(column).fill(T::zero());
    a
}

/// Random rank-deficient matrix: the last row is the sum of the others
pub fn rank_deficient_matrix<T: RealField>(m: usize, seed: u64) -> Array2<T> {
    let mut a = random_matrix::<T>(m, seed);
    if m >= 2 {
        let sum = a.slice(ndarray::s![..m - 1, ..]).sum_axis(ndarray::Axis(0));
        a.row_mut(m - 1).assign(&sum);
    }
    a
}
