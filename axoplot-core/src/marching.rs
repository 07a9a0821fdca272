//! Binary marching cubes over a single lattice cell.
//!
//! Each cell corner is either inside or outside the implicit solid. The
//! corner pattern is classified into a [`CubeCase`] and a fixed polygon
//! template is emitted for that case. Vertices are restricted to corners,
//! edge midpoints and face/cube centers ([`Coord::Half`]), so the surface is
//! a coarse but watertight-looking approximation that needs no field values
//! beyond the inside/outside sign.
//!
//! Patterns with more than four inner corners are complemented before
//! classification: the separating surface is the same either way.

use tracing::debug;

use crate::geometry::{Axis, Coord, NormalizedVertex, Polygon};

/// A unit-cube corner: bit 0 is the x flag, bit 1 the y flag, bit 2 the z flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Corner(u8);

impl Corner {
    pub const ALL: [Corner; 8] = [
        Corner(0),
        Corner(1),
        Corner(2),
        Corner(3),
        Corner(4),
        Corner(5),
        Corner(6),
        Corner(7),
    ];

    pub fn new(x: bool, y: bool, z: bool) -> Self {
        Corner(x as u8 | (y as u8) << 1 | (z as u8) << 2)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_high(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    /// The corner across the edge leaving `self` along `axis`
    pub fn flipped(self, axis: Axis) -> Self {
        Corner(self.0 ^ (1 << axis.index()))
    }

    pub fn vertex(self) -> NormalizedVertex {
        NormalizedVertex::new(
            Coord::from_high(self.is_high(Axis::X)),
            Coord::from_high(self.is_high(Axis::Y)),
            Coord::from_high(self.is_high(Axis::Z)),
        )
    }

    /// Midpoint of the edge leaving `self` along `axis`
    pub fn toward(self, axis: Axis) -> NormalizedVertex {
        self.vertex().with(axis, Coord::Half)
    }
}

/// Inner/outer flags for the eight corners of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CornerFlags(u8);

impl CornerFlags {
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Flags in [`Corner`] index order
    pub fn from_array(flags: [bool; 8]) -> Self {
        Self(
            flags
                .iter()
                .enumerate()
                .fold(0u8, |bits, (i, &inner)| bits | (inner as u8) << i),
        )
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inner(self, corner: Corner) -> bool {
        self.0 & (1 << corner.0) != 0
    }

    pub fn with_inner(self, corner: Corner) -> Self {
        Self(self.0 | 1 << corner.0)
    }

    pub fn inner_count(self) -> u32 {
        self.0.count_ones()
    }

    /// The pattern with at most four inner corners that has the same
    /// separating surface
    pub fn normalized(self) -> Self {
        if self.inner_count() > 4 {
            Self(!self.0)
        } else {
            self
        }
    }

    /// True when the surface crosses the edge between `a` and `b`
    pub fn crosses(self, a: Corner, b: Corner) -> bool {
        self.is_inner(a) != self.is_inner(b)
    }
}

/// Topological class of a cell's corner pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeCase {
    /// All corners on one side
    NoCrossing,
    /// Inner corners with no inner neighbor
    IsolatedPoints,
    /// One pair of adjacent inner corners
    SingleEdge,
    /// Two disjoint adjacent pairs
    IsolatedEdges,
    /// Three inner corners on one face
    IsolatedTriangle,
    /// An adjacent pair plus a lone corner
    EdgeAndVertex,
    /// A whole face of four inner corners
    IsolatedPlane,
    /// One corner together with its three neighbors
    TetrahedronCorner,
    /// Four corners forming a path that leaves the face
    FourChain,
    /// A face triangle plus a lone corner
    TriangleAndVertex,
    /// A pattern outside the known table
    Unclassified,
}

/// Classifies a corner pattern
pub trait CubeClassifier {
    fn classify(&self) -> CubeCase;

    /// Inner corners of the pattern that was classified
    fn inner_corners(&self) -> Vec<Corner>;

    fn complement(&self) -> Self
    where
        Self: Sized;
}

/// Adjacency queries on the corners of a cell
pub trait CubeTopology {
    fn are_adjacent(&self, a: Corner, b: Corner) -> bool;

    fn neighbor_along_axis(&self, corner: Corner, axis: Axis) -> Corner;

    /// The axis of the edge joining `a` and `b`, if they are adjacent
    fn axis_between(&self, a: Corner, b: Corner) -> Option<Axis> {
        Axis::ALL
            .into_iter()
            .find(|&axis| self.neighbor_along_axis(a, axis) == b)
    }
}

/// The standard cube: corners are adjacent when they differ on one axis
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitCube;

impl CubeTopology for UnitCube {
    fn are_adjacent(&self, a: Corner, b: Corner) -> bool {
        (a.0 ^ b.0).count_ones() == 1
    }

    fn neighbor_along_axis(&self, corner: Corner, axis: Axis) -> Corner {
        corner.flipped(axis)
    }
}

impl CubeClassifier for CornerFlags {
    fn classify(&self) -> CubeCase {
        let inner = self.inner_corners();
        if inner.is_empty() {
            return CubeCase::NoCrossing;
        }

        let groups = components(&inner, &UnitCube);
        let mut sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));

        match sizes.as_slice() {
            s if s.iter().all(|&n| n == 1) => CubeCase::IsolatedPoints,
            [2] => CubeCase::SingleEdge,
            [2, 2] => CubeCase::IsolatedEdges,
            [3] => CubeCase::IsolatedTriangle,
            [2, 1] => CubeCase::EdgeAndVertex,
            [3, 1] => CubeCase::TriangleAndVertex,
            [4] => {
                if shared_axis(&inner).is_some() {
                    CubeCase::IsolatedPlane
                } else if hinge(&inner, &UnitCube).is_some() {
                    CubeCase::TetrahedronCorner
                } else {
                    CubeCase::FourChain
                }
            }
            _ => CubeCase::Unclassified,
        }
    }

    fn inner_corners(&self) -> Vec<Corner> {
        let flags = self.normalized();
        Corner::ALL
            .into_iter()
            .filter(|&c| flags.is_inner(c))
            .collect()
    }

    fn complement(&self) -> Self {
        Self(!self.0)
    }
}

/// Group corners into adjacency-connected components
fn components<T: CubeTopology>(corners: &[Corner], topology: &T) -> Vec<Vec<Corner>> {
    let mut groups: Vec<Vec<Corner>> = Vec::new();
    for &corner in corners {
        let mut merged = vec![corner];
        let mut i = 0;
        while i < groups.len() {
            if groups[i].iter().any(|&c| topology.are_adjacent(c, corner)) {
                merged.extend(groups.swap_remove(i));
            } else {
                i += 1;
            }
        }
        groups.push(merged);
    }
    groups
}

/// The axis on which every corner has the same flag
fn shared_axis(corners: &[Corner]) -> Option<Axis> {
    let first = corners.first()?;
    Axis::ALL.into_iter().find(|&axis| {
        corners
            .iter()
            .all(|c| c.is_high(axis) == first.is_high(axis))
    })
}

/// The corner adjacent to every other corner in the group
fn hinge<T: CubeTopology>(corners: &[Corner], topology: &T) -> Option<Corner> {
    corners.iter().copied().find(|&h| {
        corners
            .iter()
            .all(|&c| c == h || topology.are_adjacent(h, c))
    })
}

/// Adjacent inner pairs, each reported once
fn adjacent_pairs<'a, T: CubeTopology>(
    corners: &'a [Corner],
    topology: &'a T,
) -> impl Iterator<Item = (Corner, Corner)> + 'a {
    corners.iter().enumerate().flat_map(move |(i, &a)| {
        corners[i + 1..]
            .iter()
            .filter(move |&&b| topology.are_adjacent(a, b))
            .map(move |&b| (a, b))
    })
}

/// Corners with no adjacent inner corner
fn lone_corners<T: CubeTopology>(corners: &[Corner], topology: &T) -> Vec<Corner> {
    corners
        .iter()
        .copied()
        .filter(|&a| !corners.iter().any(|&b| topology.are_adjacent(a, b)))
        .collect()
}

/// Triangle cutting off a single corner
fn corner_triangle(corner: Corner) -> Polygon<NormalizedVertex> {
    Polygon::new(Axis::ALL.iter().map(|&axis| corner.toward(axis)).collect())
}

/// Quad cutting off the edge between two adjacent corners
fn edge_quad<T: CubeTopology>(
    a: Corner,
    b: Corner,
    topology: &T,
) -> Option<Polygon<NormalizedVertex>> {
    let (u, v) = topology.axis_between(a, b)?.others();
    Some(Polygon::new(vec![
        a.toward(u),
        a.toward(v),
        b.toward(v),
        b.toward(u),
    ]))
}

/// Triangle plus quad cutting off three corners of one face
fn face_triangle_polygons<T: CubeTopology>(
    corners: &[Corner],
    topology: &T,
) -> Vec<Polygon<NormalizedVertex>> {
    let Some(h) = hinge(corners, topology) else {
        debug!(?corners, "no hinge corner among face triangle, emitting nothing");
        return Vec::new();
    };
    let mut others = corners.iter().copied().filter(|&c| c != h);
    let (Some(p), Some(q)) = (others.next(), others.next()) else {
        return Vec::new();
    };
    let (Some(a), Some(b)) = (topology.axis_between(h, p), topology.axis_between(h, q)) else {
        return Vec::new();
    };
    let Some(c) = Axis::ALL.into_iter().find(|&axis| axis != a && axis != b) else {
        return Vec::new();
    };

    vec![
        Polygon::new(vec![h.toward(c), p.toward(c), q.toward(c)]),
        // p -> r and q -> r edges, where r is the hinge reflected across the face diagonal
        Polygon::new(vec![p.toward(c), p.toward(b), q.toward(a), q.toward(c)]),
    ]
}

/// Quad halfway between two opposite faces
fn plane_quad(corners: &[Corner]) -> Option<Polygon<NormalizedVertex>> {
    let axis = shared_axis(corners)?;
    let (u, v) = axis.others();
    let base = NormalizedVertex::new(Coord::Zero, Coord::Zero, Coord::Zero).with(axis, Coord::Half);
    Some(Polygon::new(vec![
        base,
        base.with(u, Coord::One),
        base.with(u, Coord::One).with(v, Coord::One),
        base.with(v, Coord::One),
    ]))
}

/// Hexagon cutting off a corner together with its three neighbors
fn tetrahedron_hexagon<T: CubeTopology>(
    corners: &[Corner],
    topology: &T,
) -> Option<Polygon<NormalizedVertex>> {
    let Some(h) = hinge(corners, topology) else {
        debug!(?corners, "no hinge corner in tetrahedron pattern, emitting nothing");
        return None;
    };
    let mut vertices = Vec::with_capacity(6);
    for i in 0..3 {
        let a = Axis::ALL[i];
        let b = Axis::ALL[(i + 1) % 3];
        vertices.push(topology.neighbor_along_axis(h, a).toward(b));
        vertices.push(topology.neighbor_along_axis(h, b).toward(a));
    }
    Some(Polygon::new(vertices))
}

/// Emit the cube-local polygons for one classified cell.
///
/// `inner` must be the normalized inner corner list (at most four corners).
/// Four-chain and unclassified patterns emit nothing.
pub fn build_polygons<T: CubeTopology>(
    case: CubeCase,
    inner: &[Corner],
    topology: &T,
) -> Vec<Polygon<NormalizedVertex>> {
    match case {
        CubeCase::NoCrossing => Vec::new(),
        CubeCase::IsolatedPoints => inner.iter().map(|&c| corner_triangle(c)).collect(),
        CubeCase::SingleEdge | CubeCase::IsolatedEdges => adjacent_pairs(inner, topology)
            .filter_map(|(a, b)| edge_quad(a, b, topology))
            .collect(),
        CubeCase::IsolatedTriangle => face_triangle_polygons(inner, topology),
        CubeCase::EdgeAndVertex => {
            let mut polygons: Vec<_> = lone_corners(inner, topology)
                .into_iter()
                .map(corner_triangle)
                .collect();
            polygons.extend(
                adjacent_pairs(inner, topology).filter_map(|(a, b)| edge_quad(a, b, topology)),
            );
            polygons
        }
        CubeCase::IsolatedPlane => plane_quad(inner).into_iter().collect(),
        CubeCase::TetrahedronCorner => tetrahedron_hexagon(inner, topology).into_iter().collect(),
        CubeCase::FourChain => {
            debug!(?inner, "four-chain pattern has no template, emitting nothing");
            Vec::new()
        }
        CubeCase::TriangleAndVertex => {
            let lone = lone_corners(inner, topology);
            let face: Vec<Corner> = inner
                .iter()
                .copied()
                .filter(|c| !lone.contains(c))
                .collect();
            let mut polygons: Vec<_> = lone.into_iter().map(corner_triangle).collect();
            polygons.extend(face_triangle_polygons(&face, topology));
            polygons
        }
        CubeCase::Unclassified => {
            debug!(?inner, "unclassified corner pattern, emitting nothing");
            Vec::new()
        }
    }
}

/// Classify `flags` and emit its polygons with the standard cube topology
pub fn polygonize(flags: CornerFlags) -> Vec<Polygon<NormalizedVertex>> {
    build_polygons(flags.classify(), &flags.inner_corners(), &UnitCube)
}
