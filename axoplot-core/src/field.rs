//! Sampled inside/outside fields over a regular lattice.

use nalgebra::Point3;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Axis, CellIndex, CellRange, Extents, WorldPoint};
use crate::marching::{Corner, CornerFlags};

/// Source of corner flags for every cell of a lattice.
///
/// Implementations resolve evaluation failures (undefined points, domain
/// errors) into a plain inside/outside answer before they get here.
pub trait ScalarField {
    fn resolution(&self) -> CellRange;

    fn extents(&self) -> Extents;

    fn corner_flags(&self, cell: CellIndex) -> CornerFlags;
}

/// A dense grid of `(nx + 1) * (ny + 1) * (nz + 1)` samples, x fastest
#[derive(Debug, Clone, PartialEq)]
pub struct SampledLattice {
    extents: Extents,
    range: CellRange,
    samples: Vec<bool>,
}

impl SampledLattice {
    pub fn new(extents: Extents, range: CellRange, samples: Vec<bool>) -> RenderResult<Self> {
        range.validate()?;
        extents.validate()?;
        let expected = range.sample_count()?;
        if samples.len() != expected {
            return Err(RenderError::SampleCountMismatch {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            extents,
            range,
            samples,
        })
    }

    /// Sample `inside` at every lattice point
    pub fn from_fn<F>(extents: Extents, range: CellRange, inside: F) -> RenderResult<Self>
    where
        F: Fn(WorldPoint) -> bool,
    {
        range.validate()?;
        let mut samples = Vec::with_capacity(range.sample_count()?);
        for k in 0..=range.nz {
            for j in 0..=range.ny {
                for i in 0..=range.nx {
                    samples.push(inside(lattice_point(&extents, range, i, j, k)));
                }
            }
        }
        Self::new(extents, range, samples)
    }

    /// Flag at lattice point `(i, j, k)`; out-of-range points are outside
    pub fn sample(&self, i: usize, j: usize, k: usize) -> bool {
        if i > self.range.nx || j > self.range.ny || k > self.range.nz {
            return false;
        }
        let stride_y = self.range.nx + 1;
        let stride_z = stride_y * (self.range.ny + 1);
        self.samples[i + j * stride_y + k * stride_z]
    }

    pub fn inner_count(&self) -> usize {
        self.samples.iter().filter(|&&s| s).count()
    }
}

/// World position of lattice point `(i, j, k)`
pub fn lattice_point(
    extents: &Extents,
    range: CellRange,
    i: usize,
    j: usize,
    k: usize,
) -> WorldPoint {
    Point3::new(
        extents.lattice_coordinate(Axis::X, i, range.nx),
        extents.lattice_coordinate(Axis::Y, j, range.ny),
        extents.lattice_coordinate(Axis::Z, k, range.nz),
    )
}

impl ScalarField for SampledLattice {
    fn resolution(&self) -> CellRange {
        self.range
    }

    fn extents(&self) -> Extents {
        self.extents
    }

    fn corner_flags(&self, cell: CellIndex) -> CornerFlags {
        Corner::ALL
            .into_iter()
            .fold(CornerFlags::default(), |flags, corner| {
                let i = cell.i + corner.is_high(Axis::X) as usize;
                let j = cell.j + corner.is_high(Axis::Y) as usize;
                let k = cell.k + corner.is_high(Axis::Z) as usize;
                if self.sample(i, j, k) {
                    flags.with_inner(corner)
                } else {
                    flags
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Extents {
        Extents::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0))
    }

    #[test]
    fn test_single_cell_flags_follow_corner_order() {
        let samples = vec![true, false, false, false, false, false, false, false];
        let lattice = SampledLattice::new(unit(), CellRange::new(1, 1, 1), samples).unwrap();
        let flags = lattice.corner_flags(CellIndex::new(0, 0, 0));
        assert_eq!(
            flags,
            CornerFlags::from_array([true, false, false, false, false, false, false, false])
        );
    }

    #[test]
    fn test_sample_count_checked() {
        let err = SampledLattice::new(unit(), CellRange::new(1, 1, 1), vec![true; 7]).unwrap_err();
        assert_eq!(
            err,
            RenderError::SampleCountMismatch {
                expected: 8,
                actual: 7
            }
        );
    }

    #[test]
    fn test_from_fn_samples_lattice_points() {
        let extents = Extents::new((-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0));
        let lattice = SampledLattice::from_fn(extents, CellRange::new(2, 2, 2), |p| {
            p.coords.norm() < 0.5
        })
        .unwrap();
        // Only the center point is inside
        assert_eq!(lattice.inner_count(), 1);
        assert!(lattice.sample(1, 1, 1));
        let flags = lattice.corner_flags(CellIndex::new(0, 0, 0));
        assert_eq!(flags.inner_count(), 1);
        assert!(flags.is_inner(Corner::new(true, true, true)));
    }

    #[test]
    fn test_out_of_range_is_outside() {
        let lattice = SampledLattice::new(unit(), CellRange::new(1, 1, 1), vec![true; 8]).unwrap();
        assert!(!lattice.sample(2, 0, 0));
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let result = SampledLattice::from_fn(unit(), CellRange::new(0, 1, 1), |_| true);
        assert!(matches!(result, Err(RenderError::InvalidResolution { axis: Axis::X, .. })));
    }
}
