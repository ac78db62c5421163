//! Row permutations stored as index sequences
//!
//! A permutation `p` of length m represents the matrix P with a 1 at
//! `(i, p[i])`, so row i of `P * A` is row `p[i]` of A.

use crate::error::{LuError, Result};
use crate::traits::RealField;
use ndarray::{Array2, ArrayBase, Data, Ix2};

/// The identity permutation `[0, 1, ..., m - 1]`
pub fn identity_permutation(m: usize) -> Vec<usize> {
    (0..m).collect()
}

/// Check that `p` is a bijection on `[0, p.len())`
///
/// Returns the position and value of the first entry that is out of range or
/// repeated.
pub fn validate_permutation(p: &[usize]) -> Result<()> {
    let mut seen = vec![false; p.len()];
    for (position, &value) in p.iter().enumerate() {
        if value >= p.len() || seen[value] {
            return Err(LuError::InvalidPermutation { position, value });
        }
        seen[value] = true;
    }
    Ok(())
}

/// Top bit of a slot, free because every valid entry is below `p.len()`
const SEEN: usize = 1 << (usize::BITS - 1);

/// Check that `p` is a bijection on `[0, p.len())` without allocating
///
/// Out-of-range entries are reported first. Duplicates are then found by
/// flagging the slot each value indexes; all flags are cleared before
/// returning, so `p` is unchanged whether or not it is valid.
pub fn validate_permutation_in_place(p: &mut [usize]) -> Result<()> {
    let m = p.len();
    if let Some((position, &value)) = p.iter().enumerate().find(|&(_, &v)| v >= m) {
        return Err(LuError::InvalidPermutation { position, value });
    }

    let mut duplicate = None;
    for position in 0..m {
        let value = p[position] & !SEEN;
        if p[value] & SEEN != 0 {
            duplicate = Some(LuError::InvalidPermutation { position, value });
            break;
        }
        p[value] |= SEEN;
    }
    for v in p.iter_mut() {
        *v &= !SEEN;
    }

    duplicate.map_or(Ok(()), Err)
}

/// Returns `true` if `p` is a bijection on `[0, p.len())`
pub fn is_permutation(p: &[usize]) -> bool {
    validate_permutation(p).is_ok()
}

/// Dense permutation matrix P with `P[[i, p[i]]] = 1`
pub fn permutation_matrix<T: RealField>(p: &[usize]) -> Array2<T> {
    let m = p.len();
    let mut matrix = Array2::zeros((m, m));
    for (i, &pi) in p.iter().enumerate() {
        matrix[[i, pi]] = T::one();
    }
    matrix
}

/// Compute `P * A` without forming P: row i of the result is row `p[i]` of A
///
/// # Panics
/// Panics if `p` indexes past the rows of `a`.
pub fn permute_rows<T, S>(a: &ArrayBase<S, Ix2>, p: &[usize]) -> Array2<T>
where
    T: RealField,
    S: Data<Elem = T>,
{
    let mut out = Array2::zeros((p.len(), a.ncols()));
    for (i, &pi) in p.iter().enumerate() {
        out.row_mut(i).assign(&a.row(pi));
    }
    out
}
