//! Scalar trait for the factorization
//!
//! [`RealField`] is the element type accepted by every routine in this crate.
//! Complex entries are out of scope, so the trait only abstracts over the two
//! IEEE real types.

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for real scalar types that can be factorized.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default)
/// - `f32` (for memory-constrained applications)
pub trait RealField:
    Float
    + NumAssign
    + FromPrimitive
    + ToPrimitive
    + Copy
    + Send
    + Sync
    + Debug
    + Display
    + 'static
{
    /// Magnitude |x|, the quantity compared during pivot selection
    fn magnitude(self) -> Self;

    /// Convert a configuration value into this type, rounding when narrowing
    fn from_f64_lossy(value: f64) -> Self;

    /// Widen to `f64` for logging and reporting
    fn to_f64_lossy(self) -> f64;
}

impl RealField for f64 {
    #[inline]
    fn magnitude(self) -> Self {
        self.abs()
    }

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl RealField for f32 {
    #[inline]
    fn magnitude(self) -> Self {
        self.abs()
    }

    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}
