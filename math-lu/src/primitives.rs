//! Row-level kernels used by the factorizer
//!
//! - [`index_of_largest_magnitude`]: pivot search (BLAS `iamax` semantics)
//! - [`row_swap`]: in-place row interchange
//! - [`row_eliminate`]: `row[target] -= multiplier * row[source]` on a column range
//!
//! None of these allocate; swaps and updates happen element by element.

use crate::traits::RealField;
use ndarray::{ArrayBase, ArrayView1, Data, DataMut, Ix1, Ix2};

/// Offset of the entry with the greatest absolute value.
///
/// Ties resolve to the first (lowest-offset) occurrence. NaN entries never
/// compare greater, so they are only returned if they sit at offset 0.
/// An empty view returns 0.
#[inline]
pub fn index_of_largest_magnitude<T, S>(column: &ArrayBase<S, Ix1>) -> usize
where
    T: RealField,
    S: Data<Elem = T>,
{
    let mut best = 0;
    let mut best_val = match column.first() {
        Some(v) => v.magnitude(),
        None => return 0,
    };

    for (offset, value) in column.iter().enumerate().skip(1) {
        let val = value.magnitude();
        if val > best_val {
            best_val = val;
            best = offset;
        }
    }

    best
}

/// Exchange rows `r1` and `r2` across all columns.
///
/// # Panics
/// Panics if either row index is out of bounds.
#[inline]
pub fn row_swap<T, S>(matrix: &mut ArrayBase<S, Ix2>, r1: usize, r2: usize)
where
    S: DataMut<Elem = T>,
{
    if r1 == r2 {
        return;
    }
    for c in 0..matrix.ncols() {
        matrix.swap([r1, c], [r2, c]);
    }
}

/// Subtract `multiplier * matrix[source, ..]` from `matrix[target, ..]`
/// over columns `start..start + len`.
///
/// Columns outside the range are left untouched.
///
/// # Panics
/// Panics if a row index or the column range is out of bounds.
#[inline]
pub fn row_eliminate<T, S>(
    matrix: &mut ArrayBase<S, Ix2>,
    multiplier: T,
    len: usize,
    target: usize,
    source: usize,
    start: usize,
) where
    T: RealField,
    S: DataMut<Elem = T>,
{
    for c in start..start + len {
        let update = multiplier * matrix[[source, c]];
        matrix[[target, c]] -= update;
    }
}

/// Same update as [`row_eliminate`], on rows that were already split apart.
///
/// Used by the parallel elimination path, where each worker owns one
/// target row and shares the pivot row read-only.
#[inline]
pub(crate) fn eliminate_row_tail<T: RealField>(
    mut target: ndarray::ArrayViewMut1<T>,
    source: &ArrayView1<T>,
    multiplier: T,
    start: usize,
) {
    for c in start..target.len() {
        target[c] -= multiplier * source[c];
    }
}
