//! Scalar traits for lens-space coordinates.
//!
//! Every numeric value that flows through a cover (lens coordinates, bounds,
//! widths, overlap fractions) is a `CoordinateScalar`. The trait consolidates
//! the floating-point, validation and serialization bounds the cover needs so
//! that generic code can name a single bound.
//!
//! # Usage Examples
//!
//! ```rust
//! use cubical_cover::geometry::traits::coordinate::{CoordinateScalar, FiniteCheck};
//!
//! fn half_width<T: CoordinateScalar>(lower: T, upper: T) -> T {
//!     (upper - lower) / (T::one() + T::one())
//! }
//!
//! assert_eq!(half_width(0.0_f64, 1.0), 0.5);
//! assert!(0.5_f32.is_finite_generic());
//! assert!(!f64::NAN.is_finite_generic());
//! ```

use num_traits::Float;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

/// Default overlap fraction for `f32` covers.
pub const DEFAULT_PERC_OVERLAP_F32: f32 = 0.2;

/// Default overlap fraction for `f64` covers.
pub const DEFAULT_PERC_OVERLAP_F64: f64 = 0.2;

// =============================================================================
// SUPPORTING TRAITS
// =============================================================================

/// Helper trait for checking finiteness of coordinates.
///
/// # Examples
///
/// ```
/// use cubical_cover::geometry::traits::coordinate::FiniteCheck;
///
/// assert!(1.0f64.is_finite_generic());
/// assert!((-42.5f32).is_finite_generic());
/// assert!(!f64::INFINITY.is_finite_generic());
/// assert!(!f32::NAN.is_finite_generic());
/// ```
pub trait FiniteCheck {
    /// Returns true if the value is finite (not NaN or infinite).
    fn is_finite_generic(&self) -> bool;
}

macro_rules! impl_finite_check {
    (float: $($t:ty),*) => {
        $(
            impl FiniteCheck for $t {
                #[inline(always)]
                fn is_finite_generic(&self) -> bool {
                    self.is_finite()
                }
            }
        )*
    };
}

impl_finite_check!(float: f32, f64);

/// Trait alias for the scalar type of lens coordinates and cover parameters.
///
/// Implemented for `f32` and `f64`. `Send + Sync` are required so that a
/// computed geometry can be shared read-only across worker threads.
///
/// ```rust
/// use cubical_cover::geometry::traits::coordinate::CoordinateScalar;
///
/// assert_eq!(f64::default_perc_overlap(), 0.2);
/// assert_eq!(f32::default_perc_overlap(), 0.2_f32);
/// ```
pub trait CoordinateScalar:
    Float + FiniteCheck + Default + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The overlap fraction used when a configuration does not set one.
    fn default_perc_overlap() -> Self;
}

impl CoordinateScalar for f32 {
    fn default_perc_overlap() -> Self {
        DEFAULT_PERC_OVERLAP_F32
    }
}

impl CoordinateScalar for f64 {
    fn default_perc_overlap() -> Self {
        DEFAULT_PERC_OVERLAP_F64
    }
}
