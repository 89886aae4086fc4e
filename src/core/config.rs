//! Cover configuration: cube counts, overlap fraction and optional limits.
//!
//! A [`CoverConfig`] is built once from user parameters, validated, and then
//! treated as immutable. It carries no data-dependent state: bounds that are
//! marked unbounded are only resolved when bins are computed for a table.
//!
//! # Examples
//!
//! ```rust
//! use cubical_cover::core::config::{CoverConfig, Limit, NCubes};
//!
//! let config = CoverConfig::<f64>::builder()
//!     .n_cubes(15)
//!     .perc_overlap(0.75)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_cubes(), &NCubes::Uniform(15));
//! assert!(config.limits().is_none());
//!
//! // Per-dimension cube counts with the lower bound of the first axis pinned
//! let config = CoverConfig::<f64>::builder()
//!     .n_cubes([2, 3])
//!     .limits([Limit::lower_only(0.0), Limit::unbounded()])
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_cubes(), &NCubes::PerDimension(vec![2, 3]));
//! ```
//!
//! Configurations can also be read from serialized parameters. Legacy
//! parameter names are accepted and recorded as deprecation warnings:
//!
//! ```rust
//! use cubical_cover::core::config::CoverConfig;
//!
//! let config: CoverConfig<f64> =
//!     serde_json::from_str(r#"{"nr_cubes": 4, "limits": [[0.0, null]]}"#).unwrap();
//! assert_eq!(config.warnings().len(), 1);
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::collections::CubeCounts;
use crate::core::warnings::CoverWarning;
use crate::geometry::traits::coordinate::CoordinateScalar;

/// Cube count used when none is configured.
pub const DEFAULT_N_CUBES: usize = 10;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Fatal configuration errors.
///
/// Raised either while building a [`CoverConfig`] or when a configuration is
/// resolved against a concrete table. Values are never silently coerced.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A limits row does not contain exactly a lower and an upper bound.
    #[error("limits should be (n_dim, 2) in shape: row {row} has {len} entries")]
    MalformedLimits {
        /// Index of the offending row.
        row: usize,
        /// Number of entries found in that row.
        len: usize,
    },
    /// A fixed limit or resolved bound is NaN or infinite.
    #[error("limit for dimension {dimension} is not finite")]
    NonFiniteLimit {
        /// Dimension of the offending limit.
        dimension: usize,
    },
    /// Both sides of a limit are fixed and the lower side exceeds the upper side.
    #[error("limit for dimension {dimension} has lower bound {lower} above upper bound {upper}")]
    InvertedLimits {
        /// Dimension of the offending limit.
        dimension: usize,
        /// Configured lower bound, formatted.
        lower: String,
        /// Configured upper bound, formatted.
        upper: String,
    },
    /// The overlap fraction is negative or not finite.
    #[error("perc_overlap must be a finite, non-negative fraction, got {value}")]
    InvalidOverlap {
        /// The rejected value, formatted.
        value: String,
    },
    /// A cube count of zero was configured.
    #[error("n_cubes must be at least 1 (dimension {dimension} has 0 cubes)")]
    ZeroCubes {
        /// Dimension with zero cubes (0 for a uniform count).
        dimension: usize,
    },
    /// A per-dimension cube count does not match the table's dimension count.
    #[error(
        "There are {actual} dimensions specified but {expected} dimensions needing specification. If you supply specific number of cubes for each dimension, please supply the correct number."
    )]
    CubeCountMismatch {
        /// Number of lens dimensions in the table.
        expected: usize,
        /// Number of cube counts configured.
        actual: usize,
    },
    /// The number of limit rows does not match the table's dimension count.
    #[error("limits specify {actual} dimensions but the lens has {expected}")]
    LimitsDimensionMismatch {
        /// Number of lens dimensions in the table.
        expected: usize,
        /// Number of limit rows configured.
        actual: usize,
    },
    /// After substituting data extrema, a dimension's lower bound exceeds its upper bound.
    #[error("resolved bounds for dimension {dimension} are inverted: lower {lower} > upper {upper}")]
    InvertedBounds {
        /// Dimension of the offending bounds.
        dimension: usize,
        /// Resolved lower bound, formatted.
        lower: String,
        /// Resolved upper bound, formatted.
        upper: String,
    },
    /// A cube count cannot be represented in the coordinate scalar type.
    #[error("n_cubes {n_cubes} for dimension {dimension} is not representable as a coordinate")]
    UnrepresentableCubeCount {
        /// Dimension of the offending count.
        dimension: usize,
        /// The cube count.
        n_cubes: usize,
    },
    /// The total number of bins does not fit in `usize`.
    #[error("the product of per-dimension cube counts {n_cubes:?} overflows usize")]
    BinCountOverflow {
        /// Resolved per-dimension cube counts.
        n_cubes: Vec<usize>,
    },
}

// =============================================================================
// PARAMETER TYPES
// =============================================================================

/// Number of hypercubes along each dimension (the cover's resolution).
///
/// Serialized untagged: an integer for [`NCubes::Uniform`], an array for
/// [`NCubes::PerDimension`].
///
/// ```rust
/// use cubical_cover::core::config::NCubes;
///
/// assert_eq!(NCubes::from(4).resolve(3).unwrap().as_slice(), &[4, 4, 4]);
/// assert_eq!(NCubes::from(vec![2, 3]).resolve(2).unwrap().as_slice(), &[2, 3]);
/// assert!(NCubes::from([2, 3, 4]).resolve(2).is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NCubes {
    /// The same count on every dimension.
    Uniform(usize),
    /// One count per dimension, in dimension order.
    PerDimension(Vec<usize>),
}

impl NCubes {
    /// Resolve to one count per dimension for a lens with `dimensions` axes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::CubeCountMismatch`] when a per-dimension
    /// sequence has a length other than `dimensions`.
    pub fn resolve(&self, dimensions: usize) -> Result<CubeCounts, ConfigError> {
        match self {
            Self::Uniform(n) => Ok(std::iter::repeat_n(*n, dimensions).collect()),
            Self::PerDimension(counts) if counts.len() == dimensions => {
                Ok(counts.iter().copied().collect())
            }
            Self::PerDimension(counts) => Err(ConfigError::CubeCountMismatch {
                expected: dimensions,
                actual: counts.len(),
            }),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Uniform(0) => Err(ConfigError::ZeroCubes { dimension: 0 }),
            Self::Uniform(_) => Ok(()),
            Self::PerDimension(counts) => counts
                .iter()
                .position(|&n| n == 0)
                .map_or(Ok(()), |dimension| Err(ConfigError::ZeroCubes { dimension })),
        }
    }
}

impl Default for NCubes {
    fn default() -> Self {
        Self::Uniform(DEFAULT_N_CUBES)
    }
}

impl From<usize> for NCubes {
    fn from(n: usize) -> Self {
        Self::Uniform(n)
    }
}

impl From<Vec<usize>> for NCubes {
    fn from(counts: Vec<usize>) -> Self {
        Self::PerDimension(counts)
    }
}

impl<const N: usize> From<[usize; N]> for NCubes {
    fn from(counts: [usize; N]) -> Self {
        Self::PerDimension(counts.to_vec())
    }
}

/// One side of a [`Limit`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LimitBound<T> {
    /// Use this value as the bound.
    Fixed(T),
    /// Derive this side from the data's extremum on the dimension.
    #[default]
    Unbounded,
}

impl<T> LimitBound<T>
where
    T: CoordinateScalar,
{
    /// Interpret a raw value where any infinity marks the side as unbounded.
    ///
    /// ```rust
    /// use cubical_cover::core::config::LimitBound;
    ///
    /// assert_eq!(LimitBound::from_marker(0.5), LimitBound::Fixed(0.5));
    /// assert_eq!(LimitBound::<f64>::from_marker(f64::INFINITY), LimitBound::Unbounded);
    /// assert_eq!(LimitBound::<f64>::from_marker(f64::NEG_INFINITY), LimitBound::Unbounded);
    /// ```
    #[must_use]
    pub fn from_marker(value: T) -> Self {
        if value.is_infinite() {
            Self::Unbounded
        } else {
            Self::Fixed(value)
        }
    }

    /// The fixed value, or `derived` when unbounded.
    #[inline]
    #[must_use]
    pub fn resolve(self, derived: T) -> T {
        match self {
            Self::Fixed(value) => value,
            Self::Unbounded => derived,
        }
    }

    /// The fixed value, if any.
    #[must_use]
    pub const fn fixed(self) -> Option<T> {
        match self {
            Self::Fixed(value) => Some(value),
            Self::Unbounded => None,
        }
    }
}

impl<T> From<Option<T>> for LimitBound<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unbounded, Self::Fixed)
    }
}

/// Explicit `(lower, upper)` bounds for one lens dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Limit<T> {
    /// Lower side of the covered range.
    pub lower: LimitBound<T>,
    /// Upper side of the covered range.
    pub upper: LimitBound<T>,
}

impl<T> Limit<T>
where
    T: CoordinateScalar,
{
    /// A limit with both sides fixed.
    #[must_use]
    pub const fn new(lower: T, upper: T) -> Self {
        Self {
            lower: LimitBound::Fixed(lower),
            upper: LimitBound::Fixed(upper),
        }
    }

    /// A limit with the lower side fixed and the upper side derived from data.
    #[must_use]
    pub const fn lower_only(lower: T) -> Self {
        Self {
            lower: LimitBound::Fixed(lower),
            upper: LimitBound::Unbounded,
        }
    }

    /// A limit with the upper side fixed and the lower side derived from data.
    #[must_use]
    pub const fn upper_only(upper: T) -> Self {
        Self {
            lower: LimitBound::Unbounded,
            upper: LimitBound::Fixed(upper),
        }
    }

    /// A limit with both sides derived from data.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            lower: LimitBound::Unbounded,
            upper: LimitBound::Unbounded,
        }
    }

    fn validate(&self, dimension: usize) -> Result<(), ConfigError> {
        for side in [self.lower, self.upper] {
            if side.fixed().is_some_and(|value| !value.is_finite_generic()) {
                return Err(ConfigError::NonFiniteLimit { dimension });
            }
        }
        match (self.lower.fixed(), self.upper.fixed()) {
            (Some(lower), Some(upper)) if lower > upper => Err(ConfigError::InvertedLimits {
                dimension,
                lower: format!("{lower:?}"),
                upper: format!("{upper:?}"),
            }),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// COVER CONFIGURATION
// =============================================================================

/// Validated, immutable cover parameters.
///
/// Built with [`CoverConfig::builder`] or deserialized from
/// [`CoverParameters`]. Any deprecated parameter names used during
/// construction are available from [`CoverConfig::warnings`].
///
/// Equality compares parameters only. Warnings record how a configuration was
/// spelled, not what it is, and are not serialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    try_from = "CoverParameters<T>",
    into = "CoverParameters<T>",
    bound = "T: CoordinateScalar"
)]
pub struct CoverConfig<T>
where
    T: CoordinateScalar,
{
    n_cubes: NCubes,
    perc_overlap: T,
    limits: Option<Vec<Limit<T>>>,
    warnings: Vec<CoverWarning<T>>,
}

impl<T> CoverConfig<T>
where
    T: CoordinateScalar,
{
    /// Start a builder populated with the defaults (`n_cubes = 10`,
    /// `perc_overlap = 0.2`, no limits).
    #[must_use]
    pub fn builder() -> CoverConfigBuilder<T> {
        CoverConfigBuilder::new()
    }

    /// Shorthand for a configuration without limits.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `n_cubes` contains a zero or
    /// `perc_overlap` is negative or not finite.
    pub fn new(n_cubes: impl Into<NCubes>, perc_overlap: T) -> Result<Self, ConfigError> {
        Self::builder()
            .n_cubes(n_cubes)
            .perc_overlap(perc_overlap)
            .build()
    }

    /// Configured cube counts.
    #[must_use]
    pub const fn n_cubes(&self) -> &NCubes {
        &self.n_cubes
    }

    /// Fraction of a bin's base width added as overlap on each side.
    #[must_use]
    pub const fn perc_overlap(&self) -> T {
        self.perc_overlap
    }

    /// Explicit per-dimension limits, or `None` to derive bounds from data.
    #[must_use]
    pub fn limits(&self) -> Option<&[Limit<T>]> {
        self.limits.as_deref()
    }

    /// Warnings recorded while building this configuration.
    #[must_use]
    pub fn warnings(&self) -> &[CoverWarning<T>] {
        &self.warnings
    }
}

impl<T> PartialEq for CoverConfig<T>
where
    T: CoordinateScalar,
{
    fn eq(&self, other: &Self) -> bool {
        self.n_cubes == other.n_cubes
            && self.perc_overlap == other.perc_overlap
            && self.limits == other.limits
    }
}

impl<T> Default for CoverConfig<T>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self {
            n_cubes: NCubes::default(),
            perc_overlap: T::default_perc_overlap(),
            limits: None,
            warnings: Vec::new(),
        }
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Fluent builder for [`CoverConfig`].
///
/// Precedence between canonical and legacy parameter names is resolved once in
/// [`build`](Self::build): a supplied legacy value wins and records a
/// [`CoverWarning::DeprecatedParameter`].
#[derive(Clone, Debug)]
#[must_use]
pub struct CoverConfigBuilder<T>
where
    T: CoordinateScalar,
{
    n_cubes: NCubes,
    perc_overlap: T,
    limits: Option<Vec<Vec<LimitBound<T>>>>,
    nr_cubes: Option<NCubes>,
    overlap_perc: Option<T>,
}

impl<T> Default for CoverConfigBuilder<T>
where
    T: CoordinateScalar,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CoverConfigBuilder<T>
where
    T: CoordinateScalar,
{
    /// A builder holding the default parameters.
    pub fn new() -> Self {
        Self {
            n_cubes: NCubes::default(),
            perc_overlap: T::default_perc_overlap(),
            limits: None,
            nr_cubes: None,
            overlap_perc: None,
        }
    }

    /// Number of hypercubes per dimension: a scalar or one count per dimension.
    pub fn n_cubes(mut self, n_cubes: impl Into<NCubes>) -> Self {
        self.n_cubes = n_cubes.into();
        self
    }

    /// Overlap fraction between adjacent cubes, measured along one dimension.
    pub fn perc_overlap(mut self, perc_overlap: T) -> Self {
        self.perc_overlap = perc_overlap;
        self
    }

    /// Explicit per-dimension limits.
    pub fn limits(mut self, limits: impl IntoIterator<Item = Limit<T>>) -> Self {
        self.limits = Some(
            limits
                .into_iter()
                .map(|limit| vec![limit.lower, limit.upper])
                .collect(),
        );
        self
    }

    /// Explicit limits as raw `(n_dim, 2)` rows where an infinite value marks a
    /// side to be derived from data. Row shape is checked in [`build`](Self::build).
    pub fn limits_from_rows(mut self, rows: impl IntoIterator<Item = Vec<T>>) -> Self {
        self.limits = Some(
            rows.into_iter()
                .map(|row| row.into_iter().map(LimitBound::from_marker).collect())
                .collect(),
        );
        self
    }

    /// Remove any configured limits so bounds are derived from data.
    pub fn no_limits(mut self) -> Self {
        self.limits = None;
        self
    }

    /// Legacy name for [`n_cubes`](Self::n_cubes).
    #[deprecated(since = "0.1.0", note = "use `n_cubes` instead")]
    pub fn nr_cubes(mut self, nr_cubes: impl Into<NCubes>) -> Self {
        self.nr_cubes = Some(nr_cubes.into());
        self
    }

    /// Legacy name for [`perc_overlap`](Self::perc_overlap).
    #[deprecated(since = "0.1.0", note = "use `perc_overlap` instead")]
    pub fn overlap_perc(mut self, overlap_perc: T) -> Self {
        self.overlap_perc = Some(overlap_perc);
        self
    }

    /// Validate the parameters and produce an immutable [`CoverConfig`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MalformedLimits`] if a limits row is not a pair.
    /// - [`ConfigError::NonFiniteLimit`] if a fixed limit is NaN or infinite.
    /// - [`ConfigError::InvertedLimits`] if a fully fixed limit has lower > upper.
    /// - [`ConfigError::ZeroCubes`] if any cube count is zero.
    /// - [`ConfigError::InvalidOverlap`] if the overlap is negative or not finite.
    pub fn build(self) -> Result<CoverConfig<T>, ConfigError> {
        let mut warnings = Vec::new();

        let n_cubes = match self.nr_cubes {
            Some(legacy) => {
                warnings.push(CoverWarning::DeprecatedParameter {
                    legacy: "nr_cubes",
                    replacement: "n_cubes",
                });
                legacy
            }
            None => self.n_cubes,
        };
        let perc_overlap = match self.overlap_perc {
            Some(legacy) => {
                warnings.push(CoverWarning::DeprecatedParameter {
                    legacy: "overlap_perc",
                    replacement: "perc_overlap",
                });
                legacy
            }
            None => self.perc_overlap,
        };

        n_cubes.validate()?;
        if !perc_overlap.is_finite_generic() || perc_overlap < T::zero() {
            return Err(ConfigError::InvalidOverlap {
                value: format!("{perc_overlap:?}"),
            });
        }

        let limits = self
            .limits
            .map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(row, sides)| match sides.as_slice() {
                        &[lower, upper] => {
                            let limit = Limit { lower, upper };
                            limit.validate(row)?;
                            Ok(limit)
                        }
                        _ => Err(ConfigError::MalformedLimits {
                            row,
                            len: sides.len(),
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        for warning in &warnings {
            warning.emit();
        }

        Ok(CoverConfig {
            n_cubes,
            perc_overlap,
            limits,
            warnings,
        })
    }
}

// =============================================================================
// SERIALIZED PARAMETERS
// =============================================================================

/// Flat, serializable form of a [`CoverConfig`].
///
/// `limits` rows hold numbers or `null`, where `null` marks a side to be
/// derived from data. The legacy names `nr_cubes` and `overlap_perc` are
/// accepted on input and never written on output.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, bound = "T: CoordinateScalar")]
pub struct CoverParameters<T> {
    /// Number of hypercubes per dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n_cubes: Option<NCubes>,
    /// Overlap fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perc_overlap: Option<T>,
    /// Explicit limits, one `[lower, upper]` row per dimension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<Vec<Vec<Option<T>>>>,
    /// Deprecated synonym for `n_cubes`.
    #[serde(default, skip_serializing)]
    pub nr_cubes: Option<NCubes>,
    /// Deprecated synonym for `perc_overlap`.
    #[serde(default, skip_serializing)]
    pub overlap_perc: Option<T>,
}

impl<T> TryFrom<CoverParameters<T>> for CoverConfig<T>
where
    T: CoordinateScalar,
{
    type Error = ConfigError;

    fn try_from(params: CoverParameters<T>) -> Result<Self, Self::Error> {
        let defaults = CoverConfigBuilder::new();
        CoverConfigBuilder {
            n_cubes: params.n_cubes.unwrap_or(defaults.n_cubes),
            perc_overlap: params.perc_overlap.unwrap_or(defaults.perc_overlap),
            limits: params.limits.map(|rows| {
                rows.into_iter()
                    .map(|row| row.into_iter().map(LimitBound::from).collect())
                    .collect()
            }),
            nr_cubes: params.nr_cubes,
            overlap_perc: params.overlap_perc,
        }
        .build()
    }
}

impl<T> From<CoverConfig<T>> for CoverParameters<T>
where
    T: CoordinateScalar,
{
    fn from(config: CoverConfig<T>) -> Self {
        Self {
            n_cubes: Some(config.n_cubes),
            perc_overlap: Some(config.perc_overlap),
            limits: config.limits.map(|limits| {
                limits
                    .into_iter()
                    .map(|limit| vec![limit.lower.fixed(), limit.upper.fixed()])
                    .collect()
            }),
            nr_cubes: None,
            overlap_perc: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
