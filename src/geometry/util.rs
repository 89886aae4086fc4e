//! Per-axis helpers for bounded lens spaces.
//!
//! These functions operate on the lens columns of a data table (the row
//! identifier already stripped) and on scalar bounds. They are shared by bin
//! geometry derivation and the membership query.

use ndarray::{Array1, ArrayView2, Axis};

use crate::geometry::traits::coordinate::CoordinateScalar;

/// Column-wise minimum and maximum of a lens table.
///
/// Returns `(minima, maxima)`, one entry per column. An empty table yields
/// `+inf` minima and `-inf` maxima; callers are expected to reject empty
/// tables before deriving bounds.
///
/// # Examples
///
/// ```
/// use cubical_cover::geometry::util::axis_extrema;
/// use ndarray::array;
///
/// let lens = array![[0.5, 2.0], [0.1, 3.0], [0.9, -1.0]];
/// let (minima, maxima) = axis_extrema(lens.view());
/// assert_eq!(minima.to_vec(), vec![0.1, -1.0]);
/// assert_eq!(maxima.to_vec(), vec![0.9, 3.0]);
/// ```
#[must_use]
pub fn axis_extrema<T: CoordinateScalar>(lens: ArrayView2<'_, T>) -> (Array1<T>, Array1<T>) {
    let minima = lens.fold_axis(Axis(0), T::infinity(), |&acc, &x| acc.min(x));
    let maxima = lens.fold_axis(Axis(0), T::neg_infinity(), |&acc, &x| acc.max(x));
    (minima, maxima)
}

/// Clip `value` to the closed interval `[lower, upper]`.
///
/// Unlike `Float::clamp`, this never panics; when `lower > upper` the result
/// is `upper`. Bin geometry guarantees `lower <= upper` before clipping.
///
/// # Examples
///
/// ```
/// use cubical_cover::geometry::util::clip;
///
/// assert_eq!(clip(-0.25, 0.0, 1.0), 0.0);
/// assert_eq!(clip(0.5, 0.0, 1.0), 0.5);
/// assert_eq!(clip(1.75, 0.0, 1.0), 1.0);
/// ```
#[inline]
#[must_use]
pub fn clip<T: CoordinateScalar>(value: T, lower: T, upper: T) -> T {
    value.max(lower).min(upper)
}

/// Inclusive containment test on a closed interval.
#[inline]
#[must_use]
pub fn within_closed<T: CoordinateScalar>(value: T, lower: T, upper: T) -> bool {
    value >= lower && value <= upper
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    #[test]
    fn test_axis_extrema_single_row() {
        let lens = array![[3.0_f64, -2.0, 7.5]];
        let (minima, maxima) = axis_extrema(lens.view());
        assert_eq!(minima, maxima);
        assert_relative_eq!(minima[2], 7.5);
    }

    #[test]
    fn test_axis_extrema_empty_table() {
        let lens: Array2<f64> = Array2::zeros((0, 2));
        let (minima, maxima) = axis_extrema(lens.view());
        assert!(minima.iter().all(|m| m.is_infinite() && *m > 0.0));
        assert!(maxima.iter().all(|m| m.is_infinite() && *m < 0.0));
    }

    #[test]
    fn test_clip_inverted_interval_returns_upper() {
        assert_relative_eq!(clip(0.5_f64, 1.0, 0.0), 0.0);
    }

    #[test]
    fn test_within_closed_is_inclusive() {
        assert!(within_closed(0.0_f32, 0.0, 1.0));
        assert!(within_closed(1.0_f32, 0.0, 1.0));
        assert!(!within_closed(1.000_001_f32, 0.0, 1.0));
        assert!(!within_closed(f64::NAN, 0.0, 1.0));
    }
}
