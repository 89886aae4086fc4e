//! Small, stack-first collection types used by the cover.
//!
//! Lens spaces are low-dimensional (typically 1 to 3 axes), so per-dimension
//! data is stored in a `SmallVec` that stays on the stack up to
//! [`MAX_INLINE_DIMENSIONS`] axes and spills to the heap beyond that.

use smallvec::SmallVec;

/// Number of dimensions stored inline before a per-dimension buffer spills to the heap.
pub const MAX_INLINE_DIMENSIONS: usize = 4;

/// Stack-allocated buffer with heap fallback.
///
/// # Examples
///
/// ```rust
/// use cubical_cover::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<usize, 4> = SmallBuffer::new();
/// buffer.extend([1, 2, 3]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// One value per lens dimension.
pub type DimensionBuffer<T> = SmallBuffer<T, MAX_INLINE_DIMENSIONS>;

/// Per-dimension cube counts once `n_cubes` has been resolved against a table.
pub type CubeCounts = DimensionBuffer<usize>;
