//! Geometry primitives shared by the extraction, ordering and projection stages.

use nalgebra::{Point3, Vector3};

use crate::error::{RenderError, RenderResult};

/// A point in world space
pub type WorldPoint = Point3<f64>;

/// One of the three coordinate axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two axes other than `self`, in cyclic order
    pub fn others(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::Z, Axis::X),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

/// Cube-local coordinate along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coord {
    Zero,
    Half,
    One,
}

impl Coord {
    pub fn from_high(high: bool) -> Self {
        if high {
            Coord::One
        } else {
            Coord::Zero
        }
    }

    /// Interpolate within `[min, max]`
    pub fn lerp(self, min: f64, max: f64) -> f64 {
        match self {
            Coord::Zero => min,
            Coord::Half => (min + max) / 2.0,
            Coord::One => max,
        }
    }
}

/// A vertex in cube-local space: a corner, edge midpoint, face center or the
/// cube center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedVertex(pub [Coord; 3]);

impl NormalizedVertex {
    pub fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self([x, y, z])
    }

    pub fn get(&self, axis: Axis) -> Coord {
        self.0[axis.index()]
    }

    /// Copy of this vertex with one axis replaced
    pub fn with(mut self, axis: Axis, coord: Coord) -> Self {
        self.0[axis.index()] = coord;
        self
    }
}

/// A closed, planar vertex loop
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<P> {
    pub vertices: Vec<P>,
}

impl<P> Polygon<P> {
    pub fn new(vertices: Vec<P>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Integer screen position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i32,
    pub y: i32,
}

impl PixelPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned plot bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl Extents {
    pub fn new(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self {
            min: Point3::new(x.0, y.0, z.0),
            max: Point3::new(x.1, y.1, z.1),
        }
    }

    pub fn range(&self, axis: Axis) -> (f64, f64) {
        (self.min[axis.index()], self.max[axis.index()])
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> WorldPoint {
        nalgebra::center(&self.min, &self.max)
    }

    /// Fail with [`RenderError::DegenerateExtent`] if any axis has no width
    pub fn validate(&self) -> RenderResult<()> {
        for axis in Axis::ALL {
            let (min, max) = self.range(axis);
            // Written so NaN bounds fail too
            if !(max > min) || !(max - min).is_finite() {
                return Err(RenderError::DegenerateExtent { axis, min, max });
            }
        }
        Ok(())
    }

    /// Copy with every zero-width axis opened up to `[v - 1, v + 1]`
    pub fn widened(&self) -> Self {
        let mut out = *self;
        for axis in Axis::ALL {
            let i = axis.index();
            if self.max[i] <= self.min[i] {
                let mid = (self.min[i] + self.max[i]) / 2.0;
                out.min[i] = mid - 1.0;
                out.max[i] = mid + 1.0;
            }
        }
        out
    }

    /// Coordinate of grid line `n` when `axis` is split into `cells` cells.
    /// Neighbouring cells share their boundary values exactly.
    pub fn lattice_coordinate(&self, axis: Axis, n: usize, cells: usize) -> f64 {
        let (lo, hi) = self.range(axis);
        if n >= cells {
            hi
        } else {
            lo + (hi - lo) * n as f64 / cells as f64
        }
    }

    /// Bounding box of a point set; `None` when empty
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| {
            (
                Point3::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z)),
                Point3::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z)),
            )
        });
        Some(Self { min, max })
    }
}

/// Number of lattice cells along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl CellRange {
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    pub fn count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.nx,
            Axis::Y => self.ny,
            Axis::Z => self.nz,
        }
    }

    /// Flat index of a cell, x fastest
    pub fn flat(&self, cell: CellIndex) -> usize {
        cell.i + self.nx * (cell.j + self.ny * cell.k)
    }

    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        (0..self.nz).flat_map(move |k| {
            (0..self.ny).flat_map(move |j| (0..self.nx).map(move |i| CellIndex::new(i, j, k)))
        })
    }

    /// Number of lattice points, `(nx + 1) * (ny + 1) * (nz + 1)`
    pub fn sample_count(&self) -> RenderResult<usize> {
        let too_large = RenderError::LatticeTooLarge {
            nx: self.nx,
            ny: self.ny,
            nz: self.nz,
        };
        let points = |cells: usize| cells.checked_add(1);
        points(self.nx)
            .zip(points(self.ny))
            .zip(points(self.nz))
            .and_then(|((x, y), z)| x.checked_mul(y)?.checked_mul(z))
            .ok_or(too_large)
    }

    /// Every axis has at least one cell and the lattice points fit in memory indices
    pub fn validate(&self) -> RenderResult<()> {
        for axis in Axis::ALL {
            let value = self.get(axis);
            if value == 0 {
                return Err(RenderError::InvalidResolution { axis, value });
            }
        }
        self.sample_count().map(|_| ())
    }
}

/// Integer position of a lattice cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl CellIndex {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        Self { i, j, k }
    }

    pub fn get(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.i,
            Axis::Y => self.j,
            Axis::Z => self.k,
        }
    }
}

/// One axis-aligned cell of the sampling grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeCube {
    pub index: CellIndex,
    pub bounds: Extents,
}

impl LatticeCube {
    /// The cell at `index` of a grid of `range` cells spanning `extents`
    pub fn new(index: CellIndex, range: CellRange, extents: &Extents) -> Self {
        let line = |axis: Axis, n: usize| extents.lattice_coordinate(axis, n, range.get(axis));
        let lo = |axis: Axis| line(axis, index.get(axis));
        let hi = |axis: Axis| line(axis, index.get(axis) + 1);
        Self {
            index,
            bounds: Extents::new(
                (lo(Axis::X), hi(Axis::X)),
                (lo(Axis::Y), hi(Axis::Y)),
                (lo(Axis::Z), hi(Axis::Z)),
            ),
        }
    }

    /// Shortest edge of the cell
    pub fn edge_length(&self) -> f64 {
        let size = self.bounds.size();
        size.x.min(size.y).min(size.z)
    }

    pub fn center(&self) -> WorldPoint {
        self.bounds.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_extent_rejected() {
        let flat = Extents::new((0.0, 1.0), (0.0, 1.0), (2.0, 2.0));
        assert_eq!(
            flat.validate(),
            Err(RenderError::DegenerateExtent {
                axis: Axis::Z,
                min: 2.0,
                max: 2.0
            })
        );
        let widened = flat.widened();
        assert!(widened.validate().is_ok());
        assert_relative_eq!(widened.min.z, 1.0);
        assert_relative_eq!(widened.max.z, 3.0);
        assert_relative_eq!(widened.max.x, 1.0);
    }

    #[test]
    fn test_lattice_cube_bounds() {
        let extents = Extents::new((-1.0, 1.0), (0.0, 4.0), (0.0, 1.0));
        let range = CellRange::new(2, 4, 1);
        let cube = LatticeCube::new(CellIndex::new(1, 2, 0), range, &extents);
        assert_relative_eq!(cube.bounds.min.x, 0.0);
        assert_relative_eq!(cube.bounds.max.x, 1.0);
        assert_relative_eq!(cube.bounds.min.y, 2.0);
        assert_relative_eq!(cube.bounds.max.y, 3.0);
        assert_relative_eq!(cube.edge_length(), 1.0);
    }

    #[test]
    fn test_cell_iteration_matches_flat_index() {
        let range = CellRange::new(3, 2, 2);
        for (n, cell) in range.cells().enumerate() {
            assert_eq!(range.flat(cell), n);
        }
        assert_eq!(range.cells().count(), range.count());
        assert!(CellRange::new(3, 0, 1).validate().is_err());
    }

    #[test]
    fn test_oversized_range_rejected() {
        assert_eq!(CellRange::new(2, 3, 4).sample_count(), Ok(60));
        let huge = CellRange::new(usize::MAX / 2, usize::MAX / 2, 1);
        assert!(matches!(huge.validate(), Err(RenderError::LatticeTooLarge { .. })));
        let max = CellRange::new(usize::MAX, 1, 1);
        assert!(matches!(max.sample_count(), Err(RenderError::LatticeTooLarge { .. })));
    }
}
