//! Parallel elimination with feature-gated implementations
//!
//! One elimination stage updates every row below the pivot independently, so
//! the rows can be distributed over rayon workers. Stages themselves remain
//! sequential. Without the `parallel` feature the same entry point runs the
//! rows one after the other.

use crate::primitives::eliminate_row_tail;
use crate::traits::RealField;
use ndarray::{ArrayBase, Axis, DataMut, Ix2, Zip, s};

/// Check if parallel processing is available
#[cfg(feature = "parallel")]
pub fn is_parallel_available() -> bool {
    true
}

/// Check if parallel processing is available
#[cfg(not(feature = "parallel"))]
pub fn is_parallel_available() -> bool {
    false
}

/// Number of worker threads elimination would use
#[cfg(feature = "parallel")]
pub fn worker_count() -> usize {
    rayon::current_num_threads()
}

/// Number of worker threads elimination would use
#[cfg(not(feature = "parallel"))]
pub fn worker_count() -> usize {
    1
}

/// Eliminate column `stage` below the pivot, rows distributed across workers.
///
/// For every row j > stage this stores `l[[j, stage]] = a[[j, stage]] / a[[stage, stage]]`
/// and subtracts that multiple of the pivot row from row j over columns
/// `stage..m`. Each row performs exactly the operations of the sequential
/// path, so the result is bitwise identical.
#[cfg(feature = "parallel")]
pub(crate) fn eliminate_stage_parallel<T, Sa, Sl>(
    a: &mut ArrayBase<Sa, Ix2>,
    l: &mut ArrayBase<Sl, Ix2>,
    stage: usize,
) where
    T: RealField,
    Sa: DataMut<Elem = T>,
    Sl: DataMut<Elem = T>,
{
    let (head, mut trailing) = a.view_mut().split_at(Axis(0), stage + 1);
    let pivot_row = head.row(stage);
    let pivot = pivot_row[stage];
    let multipliers = l.slice_mut(s![stage + 1.., stage]);

    Zip::from(trailing.rows_mut())
        .and(multipliers)
        .par_for_each(|row, l_ji| {
            let multiplier = row[stage] / pivot;
            *l_ji = multiplier;
            eliminate_row_tail(row, &pivot_row, multiplier, stage);
        });
}

/// Sequential fallback with the same contract
#[cfg(not(feature = "parallel"))]
pub(crate) fn eliminate_stage_parallel<T, Sa, Sl>(
    a: &mut ArrayBase<Sa, Ix2>,
    l: &mut ArrayBase<Sl, Ix2>,
    stage: usize,
) where
    T: RealField,
    Sa: DataMut<Elem = T>,
    Sl: DataMut<Elem = T>,
{
    let (head, mut trailing) = a.view_mut().split_at(Axis(0), stage + 1);
    let pivot_row = head.row(stage);
    let pivot = pivot_row[stage];
    let multipliers = l.slice_mut(s![stage + 1.., stage]);

    Zip::from(trailing.rows_mut())
        .and(multipliers)
        .for_each(|row, l_ji| {
            let multiplier = row[stage] / pivot;
            *l_ji = multiplier;
            eliminate_row_tail(row, &pivot_row, multiplier, stage);
        });
}
