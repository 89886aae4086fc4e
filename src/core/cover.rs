//! The `Cover` facade: a configuration plus the two cover stages.
//!
//! [`Cover::compute`] derives a [`CoverLayout`] for a table and
//! [`Cover::evaluate`] slices a table by bin. Nothing computed for one table is
//! stored on the cover, so one `Cover` can be shared across tables and threads.
//!
//! # Examples
//!
//! ```rust
//! use cubical_cover::prelude::*;
//! use ndarray::array;
//!
//! let data = array![
//!     [0.0, 0.05, 0.10],
//!     [1.0, 0.40, 0.90],
//!     [2.0, 0.95, 0.20],
//!     [3.0, 0.55, 0.55],
//! ];
//! let cover = Cover::new(CoverConfig::new(3, 0.25).unwrap());
//! let layout = cover.compute(data.view()).unwrap();
//! assert_eq!(layout.len(), 9);
//!
//! for (coordinate, rows) in layout.bins(data.view()) {
//!     let rows = rows.unwrap();
//!     println!("bin {coordinate}: {} rows", rows.nrows());
//! }
//! ```

#![forbid(unsafe_code)]

use ndarray::{Array2, ArrayView2};
use thiserror::Error;

use crate::core::bins::{BinCoordinate, BinGeometry, CoverLayout, compute_bins};
use crate::core::config::{ConfigError, CoverConfig};
use crate::core::data::DataTableError;
use crate::core::membership::{MembershipError, evaluate};
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Errors that abort a cover computation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CoverError {
    /// The configuration cannot be applied to the table.
    #[error("Invalid cover configuration: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },
    /// The table cannot be used to derive bin geometry.
    #[error("Invalid data table: {source}")]
    DataTable {
        /// The underlying data-table error.
        #[from]
        source: DataTableError,
    },
}

/// Overlapping cubical cover of a lens space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cover<T>
where
    T: CoordinateScalar,
{
    config: CoverConfig<T>,
}

/// The default cubical covering scheme; identical to [`Cover`].
pub type CubicalCover<T> = Cover<T>;

impl<T> Cover<T>
where
    T: CoordinateScalar,
{
    /// Wrap a validated configuration.
    #[must_use]
    pub const fn new(config: CoverConfig<T>) -> Self {
        Self { config }
    }

    /// The cover's configuration.
    #[must_use]
    pub const fn config(&self) -> &CoverConfig<T> {
        &self.config
    }

    /// Compute bin geometry and coordinates for `data`.
    ///
    /// # Errors
    ///
    /// See [`compute_bins`].
    pub fn compute(&self, data: ArrayView2<'_, T>) -> Result<CoverLayout<T>, CoverError> {
        compute_bins(&self.config, data)
    }

    /// Rows of `data` inside the bin at `coordinate` of `geometry`.
    ///
    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn evaluate(
        &self,
        data: ArrayView2<'_, T>,
        geometry: &BinGeometry<T>,
        coordinate: &BinCoordinate,
    ) -> Result<Array2<T>, MembershipError> {
        evaluate(data, geometry, coordinate)
    }
}

impl<T> From<CoverConfig<T>> for Cover<T>
where
    T: CoordinateScalar,
{
    fn from(config: CoverConfig<T>) -> Self {
        Self::new(config)
    }
}
