//! Membership query: which rows of a table fall inside one bin.
//!
//! For a [`BinCoordinate`] `c` and dimension `d`, the bin spans
//!
//! ```text
//! lower = lower_bound[d] + c[d] * base_width[d] - overlap_width[d]
//! upper = lower_bound[d] + (c[d] + 1) * base_width[d] + overlap_width[d]
//! ```
//!
//! with both ends clipped to `[lower_bound[d], upper_bound[d]]`. The span is
//! `chunk_width[d]` wide before clipping. The last bin on a dimension always
//! closes at `upper_bound[d]`, so the row holding the maximum is never lost to
//! rounding. A row is a member when its lens coordinate satisfies
//! `lower <= x <= upper` on every dimension. Both ends are inclusive, so rows
//! on the shared edge of two adjacent bins belong to both.
//!
//! Queries only read the table and the geometry. Distinct coordinates can be
//! evaluated concurrently against the same [`BinGeometry`] without locking.

#![forbid(unsafe_code)]

use ndarray::{Array2, ArrayView2, Axis};
use thiserror::Error;

use crate::core::bins::{BinCoordinate, BinGeometry};
use crate::core::collections::DimensionBuffer;
use crate::core::data::{lens_dimensions, lens_view};
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::{clip, within_closed};

/// Errors raised when a query does not match the geometry it is evaluated against.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    /// The coordinate's dimension differs from the geometry's.
    #[error("bin coordinate has {actual} dimensions, geometry has {expected}")]
    DimensionMismatch {
        /// Geometry dimension count.
        expected: usize,
        /// Coordinate dimension count.
        actual: usize,
    },
    /// The table's column count is not the geometry's dimension count plus the row-id column.
    #[error("data table has {actual} columns, expected {expected} (row id + lens dimensions)")]
    ColumnMismatch {
        /// Expected column count.
        expected: usize,
        /// Column count of the table.
        actual: usize,
    },
    /// A cube index lies outside `0..n_cubes` for its dimension.
    #[error("cube index {index} on dimension {dimension} is out of range for {n_cubes} cubes")]
    CoordinateOutOfRange {
        /// Dimension of the offending index.
        dimension: usize,
        /// The cube index.
        index: usize,
        /// Number of cubes on that dimension.
        n_cubes: usize,
    },
}

// =============================================================================
// BIN BOUNDS
// =============================================================================

/// Clipped, inclusive per-dimension bounds of one bin.
#[derive(Clone, Debug, PartialEq)]
pub struct BinBounds<T>
where
    T: CoordinateScalar,
{
    lower: DimensionBuffer<T>,
    upper: DimensionBuffer<T>,
}

impl<T> BinBounds<T>
where
    T: CoordinateScalar,
{
    /// Lower bound on each dimension.
    #[must_use]
    pub fn lower(&self) -> &[T] {
        &self.lower
    }

    /// Upper bound on each dimension.
    #[must_use]
    pub fn upper(&self) -> &[T] {
        &self.upper
    }

    /// `true` if `point` (lens coordinates only) lies inside the bin on every dimension.
    ///
    /// Points with a different number of coordinates are never contained.
    #[must_use]
    pub fn contains(&self, point: &[T]) -> bool {
        point.len() == self.lower.len()
            && point
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&x, (&lo, &hi))| within_closed(x, lo, hi))
    }
}

impl<T> BinGeometry<T>
where
    T: CoordinateScalar,
{
    /// Clipped bounds of the bin at `coordinate`.
    ///
    /// # Errors
    ///
    /// - [`MembershipError::DimensionMismatch`] if `coordinate` has the wrong length.
    /// - [`MembershipError::CoordinateOutOfRange`] if an index is `>= n_cubes`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cubical_cover::core::bins::{BinCoordinate, BinGeometry};
    ///
    /// let geometry = BinGeometry::new(&[0.0], &[1.0], &[4], 0.5).unwrap();
    ///
    /// // First bin: [0 - 0.125, 0.25 + 0.125] clipped to [0, 1]
    /// let first = geometry.bin_bounds(&BinCoordinate::from([0])).unwrap();
    /// assert_eq!((first.lower()[0], first.upper()[0]), (0.0, 0.375));
    ///
    /// // Last bin: [0.75 - 0.125, 1.0], closing at the upper bound
    /// let last = geometry.bin_bounds(&BinCoordinate::from([3])).unwrap();
    /// assert_eq!((last.lower()[0], last.upper()[0]), (0.625, 1.0));
    /// ```
    pub fn bin_bounds(&self, coordinate: &BinCoordinate) -> Result<BinBounds<T>, MembershipError> {
        if coordinate.dim() != self.dim() {
            return Err(MembershipError::DimensionMismatch {
                expected: self.dim(),
                actual: coordinate.dim(),
            });
        }

        let mut lower = DimensionBuffer::with_capacity(self.dim());
        let mut upper = DimensionBuffer::with_capacity(self.dim());
        for (dimension, &index) in coordinate.as_slice().iter().enumerate() {
            let n_cubes = self.n_cubes()[dimension];
            if index >= n_cubes {
                return Err(MembershipError::CoordinateOutOfRange {
                    dimension,
                    index,
                    n_cubes,
                });
            }
            let origin = self.lower_bound()[dimension];
            let end = self.upper_bound()[dimension];
            let base = self.base_width()[dimension];
            let overlap = self.overlap_width()[dimension];
            // Indices are below n_cubes, which BinGeometry::new proved representable.
            let steps = <T as num_traits::NumCast>::from(index).unwrap_or_else(T::zero);

            // Both edges come from the same `origin + k * base` term, so at zero
            // overlap neighbours share the exact same float.
            let unclipped_lower = origin + steps * base - overlap;
            let unclipped_upper = if index + 1 == n_cubes {
                end
            } else {
                origin + (steps + T::one()) * base + overlap
            };
            lower.push(clip(unclipped_lower, origin, end));
            upper.push(clip(unclipped_upper, origin, end));
        }

        Ok(BinBounds { lower, upper })
    }
}

// =============================================================================
// QUERIES
// =============================================================================

fn check_columns<T>(data: ArrayView2<'_, T>, geometry: &BinGeometry<T>) -> Result<(), MembershipError>
where
    T: CoordinateScalar,
{
    if data.ncols() == 0 || lens_dimensions(data.ncols()) != geometry.dim() {
        return Err(MembershipError::ColumnMismatch {
            expected: geometry.dim() + 1,
            actual: data.ncols(),
        });
    }
    Ok(())
}

/// Indices of the rows of `data` inside the bin at `coordinate`, in table order.
///
/// # Errors
///
/// - [`MembershipError::ColumnMismatch`] if `data` does not have
///   `geometry.dim() + 1` columns.
/// - Any error from [`BinGeometry::bin_bounds`].
pub fn member_rows<T>(
    data: ArrayView2<'_, T>,
    geometry: &BinGeometry<T>,
    coordinate: &BinCoordinate,
) -> Result<Vec<usize>, MembershipError>
where
    T: CoordinateScalar,
{
    check_columns(data, geometry)?;
    let bounds = geometry.bin_bounds(coordinate)?;

    Ok(lens_view(data)
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, lens)| match lens.as_slice() {
            Some(point) => bounds.contains(point),
            None => bounds.contains(&lens.iter().copied().collect::<DimensionBuffer<T>>()),
        })
        .map(|(row, _)| row)
        .collect())
}

/// Rows of `data` inside the bin at `coordinate`.
///
/// The result keeps the input's column layout (row identifier first) and row
/// order. Neither `data` nor `geometry` is modified.
///
/// # Errors
///
/// See [`member_rows`].
///
/// # Examples
///
/// ```rust
/// use cubical_cover::core::bins::{BinCoordinate, compute_bins};
/// use cubical_cover::core::config::CoverConfig;
/// use cubical_cover::core::membership::evaluate;
/// use ndarray::array;
///
/// let data = array![[10.0, 0.0], [11.0, 0.5], [12.0, 1.0]];
/// let layout = compute_bins(&CoverConfig::new(2, 0.0).unwrap(), data.view()).unwrap();
///
/// // Both bins share the row sitting on their common edge.
/// let first = evaluate(data.view(), layout.geometry(), &BinCoordinate::from([0])).unwrap();
/// let second = evaluate(data.view(), layout.geometry(), &BinCoordinate::from([1])).unwrap();
/// assert_eq!(first.column(0).to_vec(), vec![10.0, 11.0]);
/// assert_eq!(second.column(0).to_vec(), vec![11.0, 12.0]);
/// ```
pub fn evaluate<T>(
    data: ArrayView2<'_, T>,
    geometry: &BinGeometry<T>,
    coordinate: &BinCoordinate,
) -> Result<Array2<T>, MembershipError>
where
    T: CoordinateScalar,
{
    let rows = member_rows(data, geometry, coordinate)?;
    Ok(data.select(Axis(0), &rows))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{ShapeBuilder, array};

    fn line_geometry(n_cubes: usize, perc_overlap: f64) -> BinGeometry<f64> {
        BinGeometry::new(&[0.0], &[1.0], &[n_cubes], perc_overlap).unwrap()
    }

    #[test]
    fn test_bounds_are_clipped_to_geometry() {
        let geometry = line_geometry(2, 3.0);
        for coordinate in geometry.coordinates() {
            let bounds = geometry.bin_bounds(&coordinate).unwrap();
            assert_relative_eq!(bounds.lower()[0], 0.0);
            assert_relative_eq!(bounds.upper()[0], 1.0);
        }
    }

    #[test]
    fn test_interior_bin_bounds() {
        let geometry = line_geometry(4, 0.5);
        let bounds = geometry.bin_bounds(&BinCoordinate::from([1])).unwrap();
        assert_relative_eq!(bounds.lower()[0], 0.125);
        assert_relative_eq!(bounds.upper()[0], 0.625);
    }

    #[test]
    fn test_upper_edge_is_inclusive() {
        let geometry = line_geometry(4, 0.5);
        let coordinate = BinCoordinate::from([1]);
        let bounds = geometry.bin_bounds(&coordinate).unwrap();
        let edge = bounds.upper()[0];
        let beyond = edge + 1e-9;

        let data = array![[0.0, edge], [1.0, beyond], [2.0, bounds.lower()[0]]];
        assert_eq!(
            member_rows(data.view(), &geometry, &coordinate).unwrap(),
            vec![0, 2]
        );
        assert!(bounds.contains(&[edge]));
        assert!(!bounds.contains(&[beyond]));
    }

    #[test]
    fn test_zero_overlap_last_bin_closes_at_upper_bound() {
        let lower: f64 = -0.7265;
        let upper: f64 = 5.879_732_649_748_636;
        let geometry = BinGeometry::new(&[lower], &[upper], &[6], 0.0).unwrap();

        let last = geometry.bin_bounds(&BinCoordinate::from([5])).unwrap();
        assert_eq!(last.upper()[0].to_bits(), upper.to_bits());

        let data = array![[0.0, lower], [1.0, upper]];
        let members: Vec<usize> = geometry
            .coordinates()
            .flat_map(|c| member_rows(data.view(), &geometry, &c).unwrap())
            .collect();
        assert!(members.contains(&0) && members.contains(&1));
    }

    #[test]
    fn test_zero_overlap_neighbours_share_exact_edges() {
        let geometry = BinGeometry::<f64>::new(&[0.1, -3.3], &[0.7, 9.1], &[7, 13], 0.0).unwrap();
        for (dimension, &n_cubes) in geometry.n_cubes().iter().enumerate() {
            for index in 0..n_cubes - 1 {
                let mut left = vec![0, 0];
                left[dimension] = index;
                let mut right = left.clone();
                right[dimension] = index + 1;

                let left = geometry.bin_bounds(&BinCoordinate::from(left)).unwrap();
                let right = geometry.bin_bounds(&BinCoordinate::from(right)).unwrap();
                assert_eq!(
                    left.upper()[dimension].to_bits(),
                    right.lower()[dimension].to_bits()
                );
            }
        }
    }

    #[test]
    fn test_member_rows_on_column_major_table() {
        let geometry = BinGeometry::new(&[0.0, 0.0], &[1.0, 1.0], &[2, 2], 0.1).unwrap();
        let standard = array![
            [42.0, 0.1, 0.1],
            [7.0, 0.9, 0.9],
            [13.0, 0.2, 0.4],
        ];
        let mut column_major: Array2<f64> = Array2::zeros(standard.dim().f());
        column_major.assign(&standard);
        assert_eq!(column_major, standard);
        assert!(column_major.row(0).as_slice().is_none());

        let coordinate = BinCoordinate::from([0, 0]);
        assert_eq!(
            member_rows(column_major.view(), &geometry, &coordinate).unwrap(),
            vec![0, 2]
        );
        assert_eq!(
            member_rows(standard.view(), &geometry, &coordinate).unwrap(),
            vec![0, 2]
        );
    }

    #[test]
    fn test_evaluate_preserves_row_ids_and_order() {
        let geometry = BinGeometry::new(&[0.0, 0.0], &[1.0, 1.0], &[2, 2], 0.1).unwrap();
        let data = array![
            [42.0, 0.1, 0.1],
            [7.0, 0.9, 0.9],
            [13.0, 0.2, 0.4],
            [99.0, 0.4, 0.8],
        ];
        let rows = evaluate(data.view(), &geometry, &BinCoordinate::from([0, 0])).unwrap();
        assert_eq!(rows, array![[42.0, 0.1, 0.1], [13.0, 0.2, 0.4]]);
    }

    #[test]
    fn test_empty_result_keeps_column_layout() {
        let geometry = BinGeometry::new(&[0.0, 0.0], &[1.0, 1.0], &[4, 4], 0.0).unwrap();
        let data = array![[0.0, 0.1, 0.1]];
        let rows = evaluate(data.view(), &geometry, &BinCoordinate::from([3, 3])).unwrap();
        assert_eq!(rows.dim(), (0, 3));
    }

    #[test]
    fn test_dimension_mismatch() {
        let geometry = line_geometry(2, 0.1);
        let err = geometry
            .bin_bounds(&BinCoordinate::from([0, 0]))
            .unwrap_err();
        assert_eq!(
            err,
            MembershipError::DimensionMismatch {
                expected: 1,
                actual: 2
            }
        );
    }

    #[test]
    fn test_column_mismatch() {
        let geometry = line_geometry(2, 0.1);
        let data = array![[0.0, 0.1, 0.2]];
        let err = evaluate(data.view(), &geometry, &BinCoordinate::from([0])).unwrap_err();
        assert_eq!(
            err,
            MembershipError::ColumnMismatch {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_coordinate_out_of_range() {
        let geometry = line_geometry(2, 0.1);
        let err = geometry.bin_bounds(&BinCoordinate::from([2])).unwrap_err();
        assert_eq!(
            err,
            MembershipError::CoordinateOutOfRange {
                dimension: 0,
                index: 2,
                n_cubes: 2
            }
        );
    }

    #[test]
    fn test_rows_outside_geometry_are_never_members() {
        // Bounds narrower than the data: rows beyond them fall in no bin.
        let geometry = line_geometry(2, 0.5);
        let data = array![[0.0, -0.5], [1.0, 0.5], [2.0, 1.5]];
        let members: Vec<usize> = geometry
            .coordinates()
            .flat_map(|c| member_rows(data.view(), &geometry, &c).unwrap())
            .collect();
        assert!(members.iter().all(|&row| row == 1));
    }
}
