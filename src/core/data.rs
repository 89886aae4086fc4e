//! Data-table access for cover computations.
//!
//! A data table is a row-major 2-D array whose first column is an opaque row
//! identifier and whose remaining columns are lens coordinates, one per
//! dimension. The identifier never takes part in geometry but is carried
//! through to query results.

#![forbid(unsafe_code)]

use ndarray::{ArrayView2, Axis, Slice};
use thiserror::Error;

use crate::geometry::traits::coordinate::CoordinateScalar;

/// Column holding the row identifier.
pub const ROW_ID_COLUMN: usize = 0;

/// Errors raised when a data table cannot be used to derive bin geometry.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DataTableError {
    /// The table has no lens columns after the row identifier.
    #[error("data table needs a row-id column and at least one lens column, found {columns} columns")]
    MissingLensColumns {
        /// Number of columns in the table.
        columns: usize,
    },
    /// The table has no rows, so bounds cannot be derived from it.
    #[error("data table has no rows")]
    EmptyTable,
    /// A lens coordinate is NaN or infinite.
    #[error("non-finite lens value {value} at row {row}, column {column}")]
    NonFiniteLensValue {
        /// Row index of the offending value.
        row: usize,
        /// Column index of the offending value (row-id column is 0).
        column: usize,
        /// The value, formatted.
        value: String,
    },
}

/// Number of lens dimensions in a table with `columns` columns.
#[inline]
#[must_use]
pub const fn lens_dimensions(columns: usize) -> usize {
    columns.saturating_sub(1)
}

/// The lens columns of `data`, with the row-id column stripped.
///
/// ```rust
/// use cubical_cover::core::data::lens_view;
/// use ndarray::array;
///
/// let data = array![[0.0, 0.5, 0.25], [1.0, 0.75, 0.5]];
/// let lens = lens_view(data.view());
/// assert_eq!(lens.dim(), (2, 2));
/// assert_eq!(lens[[1, 0]], 0.75);
/// ```
#[must_use]
pub fn lens_view<'a, T>(data: ArrayView2<'a, T>) -> ArrayView2<'a, T> {
    if data.ncols() == 0 {
        return data;
    }
    data.slice_axis_move(Axis(1), Slice::from(ROW_ID_COLUMN + 1..))
}

/// Check that `data` can be used to derive bin geometry.
///
/// # Errors
///
/// - [`DataTableError::MissingLensColumns`] if there are fewer than two columns.
/// - [`DataTableError::EmptyTable`] if there are no rows.
/// - [`DataTableError::NonFiniteLensValue`] for the first NaN or infinite lens value.
pub fn validate_table<T>(data: ArrayView2<'_, T>) -> Result<(), DataTableError>
where
    T: CoordinateScalar,
{
    if data.ncols() < 2 {
        return Err(DataTableError::MissingLensColumns {
            columns: data.ncols(),
        });
    }
    if data.nrows() == 0 {
        return Err(DataTableError::EmptyTable);
    }
    for ((row, column), value) in lens_view(data).indexed_iter() {
        if !value.is_finite_generic() {
            return Err(DataTableError::NonFiniteLensValue {
                row,
                column: column + 1,
                value: format!("{value:?}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    #[test]
    fn test_lens_view_keeps_row_order() {
        let data = array![[7.0_f64, 0.1], [3.0, 0.2], [9.0, 0.3]];
        let lens = lens_view(data.view());
        assert_eq!(lens.column(0).to_vec(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_lens_view_strips_row_id_of_column_major_table() {
        let data = array![[5.0_f64, 6.0], [0.1, 0.2], [0.3, 0.4]].reversed_axes();
        let lens = lens_view(data.view());
        assert_eq!(lens.dim(), (2, 2));
        assert_eq!(lens.row(1).to_vec(), vec![0.2, 0.4]);
    }

    #[test]
    fn test_lens_view_of_columnless_table_is_empty() {
        let data: Array2<f64> = Array2::zeros((3, 0));
        assert_eq!(lens_view(data.view()).dim(), (3, 0));
    }

    #[test]
    fn test_lens_dimensions() {
        assert_eq!(lens_dimensions(3), 2);
        assert_eq!(lens_dimensions(1), 0);
        assert_eq!(lens_dimensions(0), 0);
    }

    #[test]
    fn test_validate_rejects_missing_lens_columns() {
        let data = array![[0.0_f64], [1.0]];
        assert_eq!(
            validate_table(data.view()),
            Err(DataTableError::MissingLensColumns { columns: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_empty_table() {
        let data: Array2<f64> = Array2::zeros((0, 3));
        assert_eq!(validate_table(data.view()), Err(DataTableError::EmptyTable));
    }

    #[test]
    fn test_validate_reports_non_finite_position() {
        let data = array![[0.0_f64, 0.5, 0.5], [1.0, 0.5, f64::NAN]];
        let err = validate_table(data.view()).unwrap_err();
        assert!(matches!(
            err,
            DataTableError::NonFiniteLensValue {
                row: 1,
                column: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_ignores_row_id_values() {
        // Row identifiers are opaque; only lens columns are checked.
        let data = array![[f64::NAN, 0.5], [f64::INFINITY, 0.6]];
        assert!(validate_table(data.view()).is_ok());
    }
}
