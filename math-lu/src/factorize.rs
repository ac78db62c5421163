//! LU factorization with partial pivoting
//!
//! Computes a permutation P, a unit lower triangular L and an upper
//! triangular U with `P * A = L * U`.
//!
//! [`lu_pivot_in_place`] is the primary entry point: the caller owns the
//! working matrix (overwritten with U), the lower-factor matrix (receives the
//! strictly-lower entries of L) and the permutation (starts as the identity).
//! Nothing is reallocated. [`lu_factorize`] wraps it for callers that prefer
//! owned results.
//!
//! The algorithm runs m - 1 elimination stages of ~(2/3)m³ flops in total
//! and needs O(1) memory beyond its arguments.

use crate::config::{LuConfig, PivotPolicy};
use crate::error::{LuError, Result};
use crate::parallel::eliminate_stage_parallel;
use crate::permutation::{
    identity_permutation, permutation_matrix, permute_rows, validate_permutation_in_place,
};
use crate::primitives::{index_of_largest_magnitude, row_eliminate, row_swap};
use crate::traits::RealField;
use ndarray::{Array2, ArrayBase, Data, DataMut, Ix2, s};
use serde::Serialize;

/// Summary of one factorization
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LuReport<T> {
    /// Matrix dimension m
    pub dimension: usize,
    /// Number of elimination stages performed (m - 1)
    pub stages: usize,
    /// Number of row interchanges applied to the permutation
    pub row_swaps: usize,
    /// Smallest |U_ii| on the diagonal of U
    pub smallest_pivot: T,
}

/// Factorize `a` in place so that `P * A = L * U`.
///
/// On return:
/// - `a` holds U on and above the diagonal,
/// - `l` holds L strictly below the diagonal (its unit diagonal is implicit
///   and entries on or above the diagonal are never written),
/// - `p` is reordered so that row i of `P * A` is original row `p[i]`.
///
/// `p` is normally the identity permutation; any other bijection is accepted
/// and composed with the row interchanges.
///
/// With the default [`PivotPolicy::Permissive`] a zero pivot is not an
/// error: the division produces inf/NaN that propagate through L and U.
/// [`PivotPolicy::Strict`] instead returns [`LuError::SingularMatrix`], in
/// which case `a`, `l` and `p` hold a partially eliminated state.
///
/// # Errors
/// Shape and permutation checks run before any entry is modified.
pub fn lu_pivot_in_place<T, Sa, Sl>(
    a: &mut ArrayBase<Sa, Ix2>,
    l: &mut ArrayBase<Sl, Ix2>,
    p: &mut [usize],
    config: &LuConfig,
) -> Result<LuReport<T>>
where
    T: RealField,
    Sa: DataMut<Elem = T>,
    Sl: DataMut<Elem = T>,
{
    let m = validate_inputs(a, l, p)?;
    let threshold = pivot_threshold(a, &config.pivoting);

    log::debug!(
        "LU factorization of {m}x{m} matrix ({:?}, parallel = {}, parallel_min_rows = {})",
        config.pivoting,
        config.parallel,
        config.parallel_min_rows
    );

    let mut row_swaps = 0;

    for i in 0..m - 1 {
        // Pivot search over the rows that are not eliminated yet
        let index = i + index_of_largest_magnitude(&a.slice(s![i.., i]));

        if index > i {
            row_swap(a, i, index);
            row_swap(l, i, index);
            p.swap(i, index);
            row_swaps += 1;
            log::trace!("stage {i}: swapped rows {i} and {index}");
        }

        check_pivot(a[[i, i]], i, threshold)?;

        let rows_below = m - i - 1;
        if config.parallel && rows_below >= config.parallel_min_rows {
            eliminate_stage_parallel(a, l, i);
        } else {
            for j in (i + 1)..m {
                l[[j, i]] = a[[j, i]] / a[[i, i]];
                let multiplier = l[[j, i]];
                row_eliminate(a, multiplier, m - i, j, i, i);
            }
        }
    }

    // The last diagonal entry is never used as a divisor, but a singular
    // matrix can surface only there.
    if threshold.is_some() {
        check_pivot(a[[m - 1, m - 1]], m - 1, threshold)?;
    }

    let smallest_pivot = (0..m)
        .map(|i| a[[i, i]].magnitude())
        .fold(T::infinity(), |acc, v| if v < acc { v } else { acc });

    log::debug!(
        "LU factorization done: {} stages, {row_swaps} row swaps, smallest pivot {:e}",
        m - 1,
        smallest_pivot.to_f64_lossy()
    );

    Ok(LuReport {
        dimension: m,
        stages: m - 1,
        row_swaps,
        smallest_pivot,
    })
}

/// Check shapes and the permutation; returns m
fn validate_inputs<T, Sa, Sl>(
    a: &ArrayBase<Sa, Ix2>,
    l: &ArrayBase<Sl, Ix2>,
    p: &mut [usize],
) -> Result<usize>
where
    Sa: Data<Elem = T>,
    Sl: Data<Elem = T>,
{
    let (rows, cols) = a.dim();
    if rows == 0 || cols == 0 {
        return Err(LuError::InvalidDimension { rows, cols });
    }
    if rows != cols {
        return Err(LuError::NotSquare { rows, cols });
    }
    let m = rows;

    if l.dim() != (m, m) {
        let (l_rows, l_cols) = l.dim();
        return Err(LuError::DimensionMismatch {
            expected: m,
            rows: l_rows,
            cols: l_cols,
        });
    }
    if p.len() != m {
        return Err(LuError::PermutationLength {
            expected: m,
            got: p.len(),
        });
    }
    validate_permutation_in_place(p)?;

    Ok(m)
}

/// Pivot threshold for strict mode, `None` when permissive
fn pivot_threshold<T, S>(a: &ArrayBase<S, Ix2>, policy: &PivotPolicy) -> Option<T>
where
    T: RealField,
    S: Data<Elem = T>,
{
    match *policy {
        PivotPolicy::Permissive => None,
        PivotPolicy::Strict {
            tolerance: Some(tol),
        } => Some(T::from_f64_lossy(tol)),
        PivotPolicy::Strict { tolerance: None } => {
            let scale = a
                .iter()
                .map(|v| v.magnitude())
                .fold(T::zero(), |acc, v| if v > acc { v } else { acc });
            let m = T::from_usize(a.nrows()).unwrap_or_else(T::max_value);
            Some(T::epsilon() * m * scale)
        }
    }
}

#[inline]
fn check_pivot<T: RealField>(pivot: T, stage: usize, threshold: Option<T>) -> Result<()> {
    let magnitude = pivot.magnitude();
    match threshold {
        // `!(x > t)` also rejects NaN pivots
        Some(t) if !(magnitude > t) => Err(LuError::SingularMatrix {
            stage,
            pivot: magnitude.to_f64_lossy(),
            threshold: t.to_f64_lossy(),
        }),
        Some(_) => Ok(()),
        None => {
            if magnitude == T::zero() {
                log::warn!("zero pivot at stage {stage}: matrix is singular to working precision");
            }
            Ok(())
        }
    }
}

/// Owned result of [`lu_factorize`]
#[derive(Debug, Clone)]
pub struct LuFactorization<T: RealField> {
    /// Working matrix after elimination: U on and above the diagonal
    pub u: Array2<T>,
    /// Lower factor: L strictly below the diagonal, zeros elsewhere
    pub l: Array2<T>,
    /// Row permutation: row i of `P * A` is row `permutation[i]` of A
    pub permutation: Vec<usize>,
    /// Factorization summary
    pub report: LuReport<T>,
}

impl<T: RealField> LuFactorization<T> {
    /// Matrix dimension
    pub fn dimension(&self) -> usize {
        self.permutation.len()
    }

    /// Dense L with its unit diagonal and zeros above
    pub fn lower(&self) -> Array2<T> {
        let m = self.dimension();
        Array2::from_shape_fn((m, m), |(i, j)| {
            if i == j {
                T::one()
            } else if i > j {
                self.l[[i, j]]
            } else {
                T::zero()
            }
        })
    }

    /// Dense U with the strictly-lower part set to zero
    ///
    /// Elimination leaves rounding residue below the diagonal of the working
    /// matrix; U is defined by the entries on and above it.
    pub fn upper(&self) -> Array2<T> {
        let m = self.dimension();
        Array2::from_shape_fn(
            (m, m),
            |(i, j)| if i <= j { self.u[[i, j]] } else { T::zero() },
        )
    }

    /// Dense permutation matrix P
    pub fn permutation_matrix(&self) -> Array2<T> {
        permutation_matrix(&self.permutation)
    }

    /// L * U
    pub fn reconstruct(&self) -> Array2<T> {
        self.lower().dot(&self.upper())
    }

    /// P * A for the matrix `a` that was factorized
    pub fn permuted<S: Data<Elem = T>>(&self, a: &ArrayBase<S, Ix2>) -> Array2<T> {
        permute_rows(a, &self.permutation)
    }
}

/// Factorize a copy of `a` and return owned factors.
///
/// Allocates the working copy, a zeroed lower factor and the identity
/// permutation, then runs [`lu_pivot_in_place`].
pub fn lu_factorize<T, S>(
    a: &ArrayBase<S, Ix2>,
    config: &LuConfig,
) -> Result<LuFactorization<T>>
where
    T: RealField,
    S: Data<Elem = T>,
{
    let mut u = a.to_owned();
    let mut l = Array2::<T>::zeros(a.raw_dim());
    let mut permutation = identity_permutation(a.nrows());

    let report = lu_pivot_in_place(&mut u, &mut l, &mut permutation, config)?;

    Ok(LuFactorization {
        u,
        l,
        permutation,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn assert_identity_holds(a: &Array2<f64>, f: &LuFactorization<f64>, eps: f64) {
        let pa = f.permuted(a);
        let lu = f.reconstruct();
        for (x, y) in pa.iter().zip(lu.iter()) {
            assert_relative_eq!(*x, *y, epsilon = eps, max_relative = eps);
        }
    }

    #[test]
    fn test_known_3x3() {
        let a = array![[1.0_f64, 1.0, 1.0], [2.0, 1.0, 3.0], [3.0, 1.0, 1.0]];
        let f = lu_factorize(&a, &LuConfig::default()).expect("factorization should succeed");

        // Column 0 pivots on row 2 (|3| is largest)
        assert_eq!(f.permutation[0], 2);
        assert_identity_holds(&a, &f, 1e-12);
        assert_eq!(f.report.stages, 2);
        assert!(f.report.row_swaps >= 1);
    }

    #[test]
    fn test_known_3x3_exact_factors() {
        // Stage 0: pivot 3 (row 2); multipliers 2/3 and 1/3
        // Stage 1: remaining column [1/3, 2/3] -> pivot 2/3 (original row 0)
        let a = array![[1.0_f64, 1.0, 1.0], [2.0, 1.0, 3.0], [3.0, 1.0, 1.0]];
        let f = lu_factorize(&a, &LuConfig::default()).unwrap();

        assert_eq!(f.permutation, vec![2, 0, 1]);
        let l = f.lower();
        assert_relative_eq!(l[[1, 0]], 1.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(l[[2, 0]], 2.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(l[[2, 1]], 0.5, epsilon = 1e-14);

        let u = f.upper();
        assert_relative_eq!(u[[0, 0]], 3.0, epsilon = 1e-14);
        assert_relative_eq!(u[[1, 1]], 2.0 / 3.0, epsilon = 1e-14);
        assert_relative_eq!(u[[2, 2]], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn test_identity_matrix() {
        let a = Array2::<f64>::eye(3);
        let f = lu_factorize(&a, &LuConfig::default()).unwrap();

        assert_eq!(f.permutation, vec![0, 1, 2]);
        assert_eq!(f.upper(), a);
        for i in 0..3 {
            for j in 0..i {
                assert_eq!(f.l[[i, j]], 0.0);
            }
        }
        assert_eq!(f.report.row_swaps, 0);
        assert_eq!(f.report.smallest_pivot, 1.0);
    }

    #[test]
    fn test_one_by_one() {
        let mut a = array![[-4.5_f64]];
        let mut l = array![[123.0_f64]];
        let mut p = vec![0];

        let report = lu_pivot_in_place(&mut a, &mut l, &mut p, &LuConfig::default()).unwrap();

        assert_eq!(report.stages, 0);
        assert_eq!(a[[0, 0]], -4.5);
        assert_eq!(l[[0, 0]], 123.0, "L must not be touched");
        assert_eq!(p, vec![0]);
        assert_eq!(report.smallest_pivot, 4.5);
    }

    #[test]
    fn test_upper_part_of_l_untouched() {
        let a0 = array![[2.0_f64, -1.0, 0.5], [4.0, 3.0, -2.0], [-6.0, 1.0, 7.0]];
        let mut a = a0.clone();
        let sentinel = 99.0;
        let mut l = Array2::from_elem((3, 3), sentinel);
        let mut p = identity_permutation(3);

        lu_pivot_in_place(&mut a, &mut l, &mut p, &LuConfig::default()).unwrap();

        for i in 0..3 {
            for j in i..3 {
                assert_eq!(l[[i, j]], sentinel, "L[{i}][{j}] was written");
            }
        }
    }

    #[test]
    fn test_in_place_on_views() {
        // Factorize a block of a larger buffer through mutable views
        let mut storage = Array2::<f64>::zeros((4, 4));
        storage
            .slice_mut(s![1.., 1..])
            .assign(&array![[0.0, 2.0, 1.0], [1.0, 1.0, 0.0], [3.0, 0.0, 1.0]]);
        let mut l_storage = Array2::<f64>::zeros((3, 3));
        let mut p = identity_permutation(3);

        let mut block = storage.slice_mut(s![1.., 1..]);
        let mut l_view = l_storage.view_mut();
        lu_pivot_in_place(&mut block, &mut l_view, &mut p, &LuConfig::default()).unwrap();

        assert_eq!(p[0], 2);
        assert_eq!(storage[[0, 0]], 0.0);
        assert_eq!(storage[[1, 1]], 3.0);
    }

    #[test]
    fn test_singular_permissive_produces_non_finite() {
        let a = array![[0.0_f64, 1.0, 2.0], [0.0, 3.0, 4.0], [0.0, 5.0, 6.0]];
        let f = lu_factorize(&a, &LuConfig::default()).expect("permissive mode never fails");

        let any_non_finite = f.u.iter().chain(f.l.iter()).any(|v| !v.is_finite());
        assert!(any_non_finite);
        assert_eq!(f.report.smallest_pivot, 0.0);
    }

    #[test]
    fn test_singular_strict_fails_at_stage_zero() {
        let a = array![[0.0_f64, 1.0, 2.0], [0.0, 3.0, 4.0], [0.0, 5.0, 6.0]];
        let err = lu_factorize(&a, &LuConfig::strict()).unwrap_err();

        assert!(err.is_singular());
        assert!(matches!(err, LuError::SingularMatrix { stage: 0, .. }));
    }

    #[test]
    fn test_strict_detects_singularity_in_last_pivot() {
        let a = array![[1.0_f64, 2.0], [2.0, 4.0]];
        let err = lu_factorize(&a, &LuConfig::strict()).unwrap_err();
        assert!(matches!(err, LuError::SingularMatrix { stage: 1, .. }));
    }

    #[test]
    fn test_strict_absolute_tolerance() {
        let a = array![[1e-6_f64, 0.0], [0.0, 1e-6]];

        let loose = lu_factorize(&a, &LuConfig::strict_with_tolerance(1e-9));
        assert!(loose.is_ok());

        let tight = lu_factorize(&a, &LuConfig::strict_with_tolerance(1e-3));
        assert!(matches!(tight, Err(LuError::SingularMatrix { stage: 0, .. })));
    }

    #[test]
    fn test_strict_accepts_well_conditioned() {
        let a = array![[4.0_f64, 1.0, 0.0], [1.0, 3.0, 1.0], [0.0, 1.0, 2.0]];
        let f = lu_factorize(&a, &LuConfig::strict()).expect("nonsingular matrix");
        assert_identity_holds(&a, &f, 1e-12);
    }

    #[test]
    fn test_validation_errors() {
        let cfg = LuConfig::default();

        let mut empty = Array2::<f64>::zeros((0, 0));
        let mut l0 = Array2::<f64>::zeros((0, 0));
        assert_eq!(
            lu_pivot_in_place(&mut empty, &mut l0, &mut [], &cfg).unwrap_err(),
            LuError::InvalidDimension { rows: 0, cols: 0 }
        );

        let mut rect = Array2::<f64>::zeros((2, 3));
        let mut l = Array2::<f64>::zeros((2, 3));
        assert_eq!(
            lu_pivot_in_place(&mut rect, &mut l, &mut [0, 1], &cfg).unwrap_err(),
            LuError::NotSquare { rows: 2, cols: 3 }
        );

        let mut a = Array2::<f64>::eye(2);
        let mut small_l = Array2::<f64>::zeros((1, 2));
        assert_eq!(
            lu_pivot_in_place(&mut a, &mut small_l, &mut [0, 1], &cfg).unwrap_err(),
            LuError::DimensionMismatch {
                expected: 2,
                rows: 1,
                cols: 2
            }
        );

        let mut l = Array2::<f64>::zeros((2, 2));
        assert_eq!(
            lu_pivot_in_place(&mut a, &mut l, &mut [0], &cfg).unwrap_err(),
            LuError::PermutationLength {
                expected: 2,
                got: 1
            }
        );
        assert_eq!(
            lu_pivot_in_place(&mut a, &mut l, &mut [1, 1], &cfg).unwrap_err(),
            LuError::InvalidPermutation {
                position: 1,
                value: 1
            }
        );

        // Nothing was modified by the rejected calls
        assert_eq!(a, Array2::<f64>::eye(2));
    }

    #[test]
    fn test_parallel_threshold_gives_same_result() {
        let a = array![
            [2.0_f64, -1.0, 4.0, 0.5],
            [-3.0, 2.5, 1.0, 2.0],
            [1.0, 7.0, -2.0, 3.0],
            [5.0, 0.0, 1.5, -1.0],
        ];

        let seq = lu_factorize(&a, &LuConfig::default().sequential()).unwrap();
        let par_cfg = LuConfig {
            parallel_min_rows: 1,
            ..LuConfig::default()
        };
        let par = lu_factorize(&a, &par_cfg).unwrap();

        assert_eq!(seq.u, par.u);
        assert_eq!(seq.l, par.l);
        assert_eq!(seq.permutation, par.permutation);
    }

    #[test]
    fn test_f32() {
        let a = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let f = lu_factorize(&a, &LuConfig::default()).unwrap();
        assert_eq!(f.permutation, vec![1, 0]);
        let pa = f.permuted(&a);
        let lu = f.reconstruct();
        for (x, y) in pa.iter().zip(lu.iter()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-5);
        }
    }
}
