//! Error types for the rendering core.

use thiserror::Error;

use crate::geometry::Axis;

/// Result type alias for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while building or projecting a plot.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum RenderError {
    /// An axis of the plot extents has zero (or negative) width.
    ///
    /// Callers are expected to widen such extents (see
    /// [`Extents::widened`](crate::Extents::widened)) before projecting.
    #[error("degenerate extent on {axis:?} axis: min {min} >= max {max}")]
    DegenerateExtent {
        /// The offending axis.
        axis: Axis,
        /// Lower bound on that axis.
        min: f64,
        /// Upper bound on that axis.
        max: f64,
    },

    /// A lattice axis was given zero cells.
    #[error("lattice resolution on {axis:?} axis must be at least 1, got {value}")]
    InvalidResolution {
        /// The offending axis.
        axis: Axis,
        /// The provided cell count.
        value: usize,
    },

    /// The lattice has more points than can be indexed.
    #[error("lattice of {nx}x{ny}x{nz} cells is too large")]
    LatticeTooLarge {
        /// Cells along x.
        nx: usize,
        /// Cells along y.
        ny: usize,
        /// Cells along z.
        nz: usize,
    },

    /// The number of lattice samples does not match the resolution.
    #[error("expected {expected} lattice samples, got {actual}")]
    SampleCountMismatch {
        /// Samples required by the resolution.
        expected: usize,
        /// Samples actually supplied.
        actual: usize,
    },

    /// A lattice text file could not be parsed.
    #[error("failed to parse lattice: {0}")]
    Parse(String),

    /// An explicit-surface grid needs at least 2x2 samples.
    #[error("explicit surface grid needs at least 2x2 samples")]
    EmptyGrid,
}
