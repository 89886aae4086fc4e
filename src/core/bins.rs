//! Bin geometry derivation and bin-coordinate enumeration.
//!
//! [`compute_bins`] resolves a [`CoverConfig`] against a data table:
//!
//! 1. The row-id column is stripped; the remaining columns are the lens.
//! 2. Per-dimension bounds are taken from the configured limits, with any
//!    unbounded side (or all sides, when no limits are configured) replaced by
//!    the data's extremum on that dimension.
//! 3. Each dimension is split into `n_cubes` base widths; every bin is widened
//!    on both sides by `perc_overlap` of a base width.
//! 4. Bin coordinates are enumerated as the Cartesian product of the
//!    per-dimension cube indices, last dimension varying fastest.
//!
//! The returned [`BinGeometry`] is immutable and is the only input, besides the
//! table itself, that the membership query needs.
//!
//! # Examples
//!
//! ```rust
//! use cubical_cover::core::bins::compute_bins;
//! use cubical_cover::core::config::CoverConfig;
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.0, 0.0], [1.0, 1.0, 2.0], [2.0, 0.5, 1.0]];
//! let config = CoverConfig::new(4, 0.25).unwrap();
//! let layout = compute_bins(&config, data.view()).unwrap();
//!
//! assert_eq!(layout.len(), 16);
//! assert_eq!(layout.geometry().base_width(), &[0.25, 0.5]);
//! assert_eq!(layout.coordinates()[1].as_slice(), &[0, 1]);
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use ndarray::{Array2, ArrayView2};

use crate::core::collections::{CubeCounts, DimensionBuffer};
use crate::core::config::{ConfigError, CoverConfig};
use crate::core::cover::CoverError;
use crate::core::data::{lens_view, validate_table};
use crate::core::membership::{MembershipError, evaluate};
use crate::core::warnings::CoverWarning;
use crate::geometry::traits::coordinate::CoordinateScalar;
use crate::geometry::util::axis_extrema;

// =============================================================================
// BIN COORDINATE
// =============================================================================

/// Integer position of one hypercube in the cover grid.
///
/// `coordinate[d]` lies in `0..n_cubes[d]`. Coordinates order
/// lexicographically, which is also the order [`compute_bins`] returns them in.
///
/// ```rust
/// use cubical_cover::core::bins::BinCoordinate;
///
/// let coordinate = BinCoordinate::from([1, 0, 2]);
/// assert_eq!(coordinate.dim(), 3);
/// assert_eq!(coordinate[2], 2);
/// assert_eq!(coordinate.to_string(), "(1, 0, 2)");
/// assert!(BinCoordinate::from([0, 3]) < BinCoordinate::from([1, 0]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinCoordinate(DimensionBuffer<usize>);

impl BinCoordinate {
    /// The origin coordinate `(0, ..., 0)` in `dimensions` dimensions.
    #[must_use]
    pub fn origin(dimensions: usize) -> Self {
        Self(std::iter::repeat_n(0, dimensions).collect())
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.0.len()
    }

    /// Cube indices in dimension order.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl Index<usize> for BinCoordinate {
    type Output = usize;

    fn index(&self, dimension: usize) -> &usize {
        &self.0[dimension]
    }
}

impl From<Vec<usize>> for BinCoordinate {
    fn from(indices: Vec<usize>) -> Self {
        Self(DimensionBuffer::from_vec(indices))
    }
}

impl<const N: usize> From<[usize; N]> for BinCoordinate {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.into_iter().collect())
    }
}

impl From<&[usize]> for BinCoordinate {
    fn from(indices: &[usize]) -> Self {
        Self(DimensionBuffer::from_slice(indices))
    }
}

impl fmt::Display for BinCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str(")")
    }
}

// =============================================================================
// BIN GEOMETRY
// =============================================================================

/// Per-dimension widths and bounds of a cover, resolved for one data table.
///
/// For dimension `d`:
///
/// - `base_width[d] = (upper_bound[d] - lower_bound[d]) / n_cubes[d]`
/// - `overlap_width[d] = perc_overlap * base_width[d]`
/// - `chunk_width[d] = base_width[d] + 2 * overlap_width[d]`
///
/// Immutable once built; shared read-only by every membership query.
#[derive(Clone, Debug, PartialEq)]
pub struct BinGeometry<T>
where
    T: CoordinateScalar,
{
    lower_bound: DimensionBuffer<T>,
    upper_bound: DimensionBuffer<T>,
    base_width: DimensionBuffer<T>,
    overlap_width: DimensionBuffer<T>,
    chunk_width: DimensionBuffer<T>,
    n_cubes: CubeCounts,
    perc_overlap: T,
    bin_count: usize,
}

impl<T> BinGeometry<T>
where
    T: CoordinateScalar,
{
    /// Build geometry directly from resolved bounds.
    ///
    /// [`compute_bins`] calls this after deriving bounds from a table; it is
    /// public so a geometry can be reconstructed from known bounds.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::CubeCountMismatch`] / [`ConfigError::LimitsDimensionMismatch`]
    ///   when `n_cubes` or `upper` differ in length from `lower`.
    /// - [`ConfigError::ZeroCubes`] for a zero cube count.
    /// - [`ConfigError::InvalidOverlap`] for a negative or non-finite overlap.
    /// - [`ConfigError::NonFiniteLimit`] for a NaN or infinite bound.
    /// - [`ConfigError::InvertedBounds`] when `lower[d] > upper[d]`.
    /// - [`ConfigError::BinCountOverflow`] when the bin count overflows `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cubical_cover::core::bins::BinGeometry;
    ///
    /// let geometry = BinGeometry::new(&[0.0], &[1.0], &[4], 0.5).unwrap();
    /// assert_eq!(geometry.base_width(), &[0.25]);
    /// assert_eq!(geometry.overlap_width(), &[0.125]);
    /// assert_eq!(geometry.chunk_width(), &[0.5]);
    /// ```
    pub fn new(
        lower: &[T],
        upper: &[T],
        n_cubes: &[usize],
        perc_overlap: T,
    ) -> Result<Self, ConfigError> {
        let dimensions = lower.len();
        if n_cubes.len() != dimensions {
            return Err(ConfigError::CubeCountMismatch {
                expected: dimensions,
                actual: n_cubes.len(),
            });
        }
        if upper.len() != dimensions {
            return Err(ConfigError::LimitsDimensionMismatch {
                expected: dimensions,
                actual: upper.len(),
            });
        }
        if !perc_overlap.is_finite_generic() || perc_overlap < T::zero() {
            return Err(ConfigError::InvalidOverlap {
                value: format!("{perc_overlap:?}"),
            });
        }

        let bin_count = n_cubes
            .iter()
            .try_fold(1_usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| ConfigError::BinCountOverflow {
                n_cubes: n_cubes.to_vec(),
            })?;

        let two = T::one() + T::one();
        let mut base_width = DimensionBuffer::with_capacity(dimensions);
        let mut overlap_width = DimensionBuffer::with_capacity(dimensions);
        let mut chunk_width = DimensionBuffer::with_capacity(dimensions);

        for (dimension, ((&lo, &hi), &n)) in lower.iter().zip(upper).zip(n_cubes).enumerate() {
            if n == 0 {
                return Err(ConfigError::ZeroCubes { dimension });
            }
            if !lo.is_finite_generic() || !hi.is_finite_generic() {
                return Err(ConfigError::NonFiniteLimit { dimension });
            }
            if lo > hi {
                return Err(ConfigError::InvertedBounds {
                    dimension,
                    lower: format!("{lo:?}"),
                    upper: format!("{hi:?}"),
                });
            }
            let cubes = <T as num_traits::NumCast>::from(n)
                .ok_or(ConfigError::UnrepresentableCubeCount {
                    dimension,
                    n_cubes: n,
                })?;

            let base = (hi - lo) / cubes;
            let overlap = perc_overlap * base;
            base_width.push(base);
            overlap_width.push(overlap);
            chunk_width.push(base + overlap * two);
        }

        Ok(Self {
            lower_bound: DimensionBuffer::from_slice(lower),
            upper_bound: DimensionBuffer::from_slice(upper),
            base_width,
            overlap_width,
            chunk_width,
            n_cubes: CubeCounts::from_slice(n_cubes),
            perc_overlap,
            bin_count,
        })
    }

    /// Number of lens dimensions.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lower_bound.len()
    }

    /// Origin of the covered range on each dimension.
    #[must_use]
    pub fn lower_bound(&self) -> &[T] {
        &self.lower_bound
    }

    /// End of the covered range on each dimension.
    #[must_use]
    pub fn upper_bound(&self) -> &[T] {
        &self.upper_bound
    }

    /// Unexpanded width of a bin on each dimension.
    #[must_use]
    pub fn base_width(&self) -> &[T] {
        &self.base_width
    }

    /// Margin added on each side of a bin on each dimension.
    #[must_use]
    pub fn overlap_width(&self) -> &[T] {
        &self.overlap_width
    }

    /// Full width of an unclipped bin on each dimension.
    #[must_use]
    pub fn chunk_width(&self) -> &[T] {
        &self.chunk_width
    }

    /// Resolved cube count on each dimension.
    #[must_use]
    pub fn n_cubes(&self) -> &[usize] {
        &self.n_cubes
    }

    /// Overlap fraction the widths were derived from.
    #[must_use]
    pub const fn perc_overlap(&self) -> T {
        self.perc_overlap
    }

    /// Total number of bins, the product of the per-dimension cube counts.
    #[must_use]
    pub const fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Iterate over every bin coordinate in enumeration order.
    #[must_use]
    pub fn coordinates(&self) -> BinCoordinates {
        BinCoordinates::new(self.n_cubes.clone(), self.bin_count)
    }
}

// =============================================================================
// COORDINATE ENUMERATION
// =============================================================================

/// Odometer over all bin coordinates of a grid.
///
/// Yields the Cartesian product of `0..n_cubes[d]` with the last dimension
/// varying fastest and the first dimension slowest.
///
/// ```rust
/// use cubical_cover::core::bins::BinGeometry;
///
/// let geometry = BinGeometry::new(&[0.0, 0.0], &[1.0, 1.0], &[2, 3], 0.1).unwrap();
/// let order: Vec<String> = geometry.coordinates().map(|c| c.to_string()).collect();
/// assert_eq!(
///     order,
///     ["(0, 0)", "(0, 1)", "(0, 2)", "(1, 0)", "(1, 1)", "(1, 2)"]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct BinCoordinates {
    n_cubes: CubeCounts,
    next: Option<DimensionBuffer<usize>>,
    remaining: usize,
}

impl BinCoordinates {
    fn new(n_cubes: CubeCounts, bin_count: usize) -> Self {
        let next = (bin_count > 0).then(|| std::iter::repeat_n(0, n_cubes.len()).collect());
        Self {
            n_cubes,
            next,
            remaining: bin_count,
        }
    }
}

impl Iterator for BinCoordinates {
    type Item = BinCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.remaining = self.remaining.saturating_sub(1);

        let mut successor = current.clone();
        for dimension in (0..successor.len()).rev() {
            successor[dimension] += 1;
            if successor[dimension] < self.n_cubes[dimension] {
                self.next = Some(successor);
                break;
            }
            successor[dimension] = 0;
        }

        Some(BinCoordinate(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for BinCoordinates {}

impl FusedIterator for BinCoordinates {}

// =============================================================================
// COVER LAYOUT
// =============================================================================

/// Result of [`compute_bins`]: the geometry, the ordered bin coordinates and
/// any warnings raised while resolving bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct CoverLayout<T>
where
    T: CoordinateScalar,
{
    geometry: BinGeometry<T>,
    coordinates: Vec<BinCoordinate>,
    warnings: Vec<CoverWarning<T>>,
}

impl<T> CoverLayout<T>
where
    T: CoordinateScalar,
{
    /// The resolved bin geometry.
    #[must_use]
    pub const fn geometry(&self) -> &BinGeometry<T> {
        &self.geometry
    }

    /// Every bin coordinate, in enumeration order.
    #[must_use]
    pub fn coordinates(&self) -> &[BinCoordinate] {
        &self.coordinates
    }

    /// Warnings raised while resolving bounds for this table.
    #[must_use]
    pub fn warnings(&self) -> &[CoverWarning<T>] {
        &self.warnings
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// `true` if the layout has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Rows of `data` that fall inside the bin at `coordinate`.
    ///
    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn evaluate(
        &self,
        data: ArrayView2<'_, T>,
        coordinate: &BinCoordinate,
    ) -> Result<Array2<T>, MembershipError> {
        evaluate(data, &self.geometry, coordinate)
    }

    /// Iterate over `(coordinate, rows)` for every bin in enumeration order.
    pub fn bins<'a>(
        &'a self,
        data: ArrayView2<'a, T>,
    ) -> impl Iterator<Item = (&'a BinCoordinate, Result<Array2<T>, MembershipError>)> + 'a {
        self.coordinates
            .iter()
            .map(move |coordinate| (coordinate, evaluate(data, &self.geometry, coordinate)))
    }

    /// Split into geometry, coordinates and warnings.
    #[must_use]
    pub fn into_parts(self) -> (BinGeometry<T>, Vec<BinCoordinate>, Vec<CoverWarning<T>>) {
        (self.geometry, self.coordinates, self.warnings)
    }
}

// =============================================================================
// COMPUTATION
// =============================================================================

/// Resolve `config` against `data`, producing bin geometry and coordinates.
///
/// The first column of `data` is the row identifier and is ignored here. The
/// result is a pure function of the configuration and the table's lens values.
///
/// When configured limits fail to enclose the data on some dimension (data
/// minimum below the lower bound, or data maximum above the upper bound), a
/// [`CoverWarning::BoundsCoverage`] is recorded and computation proceeds with
/// the configured bounds.
///
/// # Errors
///
/// - [`CoverError::DataTable`] if the table has no lens columns, no rows, or
///   a non-finite lens value.
/// - [`CoverError::Config`] if the per-dimension cube counts or limits do not
///   match the table's dimension count, or the resolved bounds are invalid.
pub fn compute_bins<T>(
    config: &CoverConfig<T>,
    data: ArrayView2<'_, T>,
) -> Result<CoverLayout<T>, CoverError>
where
    T: CoordinateScalar,
{
    validate_table(data)?;
    let lens = lens_view(data);
    let dimensions = lens.ncols();
    let n_cubes = config.n_cubes().resolve(dimensions)?;
    let (minima, maxima) = axis_extrema(lens);

    let (lower, upper, coverage) = match config.limits() {
        None => (
            minima.iter().copied().collect::<DimensionBuffer<T>>(),
            maxima.iter().copied().collect::<DimensionBuffer<T>>(),
            None,
        ),
        Some(limits) => {
            if limits.len() != dimensions {
                return Err(ConfigError::LimitsDimensionMismatch {
                    expected: dimensions,
                    actual: limits.len(),
                }
                .into());
            }
            let lower: DimensionBuffer<T> = limits
                .iter()
                .zip(&minima)
                .map(|(limit, &min)| limit.lower.resolve(min))
                .collect();
            let upper: DimensionBuffer<T> = limits
                .iter()
                .zip(&maxima)
                .map(|(limit, &max)| limit.upper.resolve(max))
                .collect();

            let uncovered = (0..dimensions).any(|d| minima[d] < lower[d] || maxima[d] > upper[d]);
            let coverage = uncovered.then(|| CoverWarning::BoundsCoverage {
                actual_minima: minima.to_vec(),
                input_minima: lower.to_vec(),
                actual_maxima: maxima.to_vec(),
                input_maxima: upper.to_vec(),
            });
            (lower, upper, coverage)
        }
    };

    let geometry = BinGeometry::new(&lower, &upper, &n_cubes, config.perc_overlap())?;
    tracing::debug!(
        dimensions,
        bins = geometry.bin_count(),
        lower = ?geometry.lower_bound(),
        upper = ?geometry.upper_bound(),
        "computed bin geometry"
    );

    let warnings: Vec<CoverWarning<T>> = coverage.into_iter().collect();
    for warning in &warnings {
        warning.emit();
    }

    let coordinates = geometry.coordinates().collect();
    Ok(CoverLayout {
        geometry,
        coordinates,
        warnings,
    })
}

// =============================================================================
// TESTS
// =============================================================================
