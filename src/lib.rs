//! # cubical-cover
//!
//! Overlapping, axis-aligned hypercube covers of bounded n-dimensional lens
//! spaces: the bin-generation stage of a Mapper-style topological data
//! analysis pipeline.
//!
//! Given a data table whose first column is a row identifier and whose
//! remaining columns are lens coordinates, the crate
//!
//! 1. derives per-dimension bounds, from explicit limits or from the data,
//! 2. splits each dimension into `n_cubes` bins widened by an overlap fraction,
//! 3. enumerates every bin coordinate in a fixed order, and
//! 4. answers membership queries: which rows fall inside a given bin.
//!
//! Clustering the rows of each bin and stitching clusters into a graph are
//! left to downstream code.
//!
//! # Features
//!
//! - Arbitrary lens dimension, resolved from the table at run time
//! - Uniform or per-dimension cube counts
//! - Limits with either side derivable from data
//! - Generic floating-point scalars (`f32`, `f64`)
//! - Immutable geometry shared read-only across concurrent queries
//! - Configuration (de)serialization with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! ```rust
//! use cubical_cover::prelude::*;
//! use ndarray::array;
//!
//! // Row id, then two lens coordinates
//! let data = array![
//!     [0.0, 0.10, 0.20],
//!     [1.0, 0.50, 0.50],
//!     [2.0, 0.90, 0.85],
//!     [3.0, 0.30, 0.70],
//! ];
//!
//! let config = CoverConfig::new(4, 0.5).unwrap();
//! let layout = compute_bins(&config, data.view()).unwrap();
//! assert_eq!(layout.len(), 16);
//!
//! let origin = BinCoordinate::origin(2);
//! let rows = evaluate(data.view(), layout.geometry(), &origin).unwrap();
//! assert_eq!(rows.column(0).to_vec(), vec![0.0]);
//! ```
//!
//! # Bin semantics
//!
//! On dimension `d`, bin `c` spans
//! `[lower_d + c * base_d - overlap_d, lower_d + (c + 1) * base_d + overlap_d]`
//! clipped to `[lower_d, upper_d]`, where `base_d = (upper_d - lower_d) / n_cubes_d`,
//! `overlap_d = perc_overlap * base_d` and `chunk_d = base_d + 2 * overlap_d`.
//! Both ends are inclusive: rows on the edge shared by adjacent bins belong to
//! both, so downstream clustering can merge across the edge.
//!
//! # Warnings and errors
//!
//! Fatal problems are returned as [`CoverError`](core::cover::CoverError),
//! [`ConfigError`](core::config::ConfigError) or
//! [`MembershipError`](core::membership::MembershipError). Non-fatal ones
//! (limits that do not enclose the data, deprecated parameter names) are
//! returned as [`CoverWarning`](core::warnings::CoverWarning) values and
//! logged through `tracing` at `warn` level.
//!
//! ```rust
//! use cubical_cover::prelude::*;
//! use ndarray::array;
//!
//! let data = array![[0.0, 0.1], [1.0, 0.9]];
//! let config = CoverConfig::<f64>::builder()
//!     .n_cubes(2)
//!     .limits([Limit::new(0.2, 1.0)])
//!     .build()
//!     .unwrap();
//!
//! let layout = compute_bins(&config, data.view()).unwrap();
//! assert!(layout.warnings()[0].is_bounds_coverage());
//! ```

#![forbid(unsafe_code)]

/// Cover configuration, bin geometry and membership queries.
pub mod core {
    /// Bin geometry derivation and coordinate enumeration
    pub mod bins;
    pub mod collections;
    /// Cover parameters and their validation
    pub mod config;
    pub mod cover;
    pub mod data;
    /// Membership query over a computed geometry
    pub mod membership;
    pub mod warnings;

    pub use bins::*;
    pub use config::*;
    pub use cover::*;
    pub use data::*;
    pub use membership::*;
    pub use warnings::*;
}

/// Scalar traits and per-axis helpers for lens spaces.
pub mod geometry {
    /// Geometric utility functions on lens tables and bounds
    pub mod util;
    /// Scalar abstractions for lens coordinates.
    pub mod traits {
        pub mod coordinate;
        pub use coordinate::*;
    }
    pub use traits::*;
    pub use util::*;
}

/// A prelude module that re-exports commonly used types.
pub mod prelude {
    pub use crate::core::{
        bins::{BinCoordinate, BinCoordinates, BinGeometry, CoverLayout, compute_bins},
        config::{
            ConfigError, CoverConfig, CoverConfigBuilder, CoverParameters, Limit, LimitBound,
            NCubes,
        },
        cover::{Cover, CoverError, CubicalCover},
        data::DataTableError,
        membership::{BinBounds, MembershipError, evaluate, member_rows},
        warnings::CoverWarning,
    };
    pub use crate::geometry::traits::coordinate::{CoordinateScalar, FiniteCheck};
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
