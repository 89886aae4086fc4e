//! Non-fatal diagnostics raised while configuring or computing a cover.
//!
//! Warnings never abort a computation. They are returned as values on the
//! object that produced them ([`CoverConfig::warnings`] and
//! [`CoverLayout::warnings`]) and emitted once through `tracing` at `warn`
//! level when recorded.
//!
//! [`CoverConfig::warnings`]: crate::core::config::CoverConfig::warnings
//! [`CoverLayout::warnings`]: crate::core::bins::CoverLayout::warnings

#![forbid(unsafe_code)]

use std::fmt;

use crate::geometry::traits::coordinate::CoordinateScalar;

/// A non-fatal condition detected while building or evaluating a cover.
///
/// # Examples
///
/// ```rust
/// use cubical_cover::core::warnings::CoverWarning;
///
/// let warning: CoverWarning<f64> = CoverWarning::DeprecatedParameter {
///     legacy: "nr_cubes",
///     replacement: "n_cubes",
/// };
/// assert!(warning.to_string().contains("`nr_cubes`"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum CoverWarning<T>
where
    T: CoordinateScalar,
{
    /// A legacy parameter name was used in place of its canonical name.
    DeprecatedParameter {
        /// The legacy name that was supplied.
        legacy: &'static str,
        /// The canonical name that replaces it.
        replacement: &'static str,
    },
    /// The configured limits do not enclose the data's observed range.
    ///
    /// Computation proceeds with the configured bounds; rows outside them are
    /// not assigned to any bin.
    BoundsCoverage {
        /// Observed per-dimension minima of the lens data.
        actual_minima: Vec<T>,
        /// Resolved per-dimension lower bounds.
        input_minima: Vec<T>,
        /// Observed per-dimension maxima of the lens data.
        actual_maxima: Vec<T>,
        /// Resolved per-dimension upper bounds.
        input_maxima: Vec<T>,
    },
}

impl<T> CoverWarning<T>
where
    T: CoordinateScalar,
{
    /// Returns `true` for [`CoverWarning::BoundsCoverage`].
    #[must_use]
    pub const fn is_bounds_coverage(&self) -> bool {
        matches!(self, Self::BoundsCoverage { .. })
    }

    /// Returns `true` for [`CoverWarning::DeprecatedParameter`].
    #[must_use]
    pub const fn is_deprecated_parameter(&self) -> bool {
        matches!(self, Self::DeprecatedParameter { .. })
    }

    /// Dimensions whose observed range escapes the resolved bounds.
    ///
    /// Empty for warnings other than [`CoverWarning::BoundsCoverage`].
    #[must_use]
    pub fn uncovered_dimensions(&self) -> Vec<usize> {
        match self {
            Self::BoundsCoverage {
                actual_minima,
                input_minima,
                actual_maxima,
                input_maxima,
            } => (0..actual_minima.len())
                .filter(|&d| {
                    actual_minima[d] < input_minima[d] || actual_maxima[d] > input_maxima[d]
                })
                .collect(),
            Self::DeprecatedParameter { .. } => Vec::new(),
        }
    }

    /// Emit the warning through `tracing`.
    pub(crate) fn emit(&self) {
        match self {
            Self::DeprecatedParameter {
                legacy,
                replacement,
            } => tracing::warn!(legacy, replacement, "{self}"),
            Self::BoundsCoverage { .. } => tracing::warn!(
                dimensions = ?self.uncovered_dimensions(),
                "{self}"
            ),
        }
    }
}

impl<T> fmt::Display for CoverWarning<T>
where
    T: CoordinateScalar,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeprecatedParameter {
                legacy,
                replacement,
            } => write!(
                f,
                "Argument `{legacy}` has been replaced with `{replacement}`. Use `{replacement}` instead; `{legacy}` will be removed in a future release."
            ),
            Self::BoundsCoverage {
                actual_minima,
                input_minima,
                actual_maxima,
                input_maxima,
            } => write!(
                f,
                "The limits given do not cover the entire range of the lens functions\n\
                 Actual Minima: {actual_minima:?}\tInput Minima: {input_minima:?}\n\
                 Actual Maxima: {actual_maxima:?}\tInput Maxima: {input_maxima:?}"
            ),
        }
    }
}
