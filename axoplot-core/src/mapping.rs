//! Placement of cube-local polygons into lattice cells.

use nalgebra::Point3;

use crate::geometry::{Axis, Extents, LatticeCube, NormalizedVertex, Polygon, WorldPoint};

/// A polygon in world space, tagged with the edge length of the cell it
/// came from. The edge length is the adjacency tolerance used by depth
/// ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldPolygon {
    pub vertices: Vec<WorldPoint>,
    pub edge_length: f64,
}

impl WorldPolygon {
    pub fn new(vertices: Vec<WorldPoint>, edge_length: f64) -> Self {
        Self {
            vertices,
            edge_length,
        }
    }

    /// Mean of the vertices
    pub fn centroid(&self) -> WorldPoint {
        let n = self.vertices.len().max(1) as f64;
        let sum = self
            .vertices
            .iter()
            .fold(nalgebra::Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / n)
    }

    pub fn mean_z(&self) -> f64 {
        self.centroid().z
    }
}

/// Map one cube-local vertex into `bounds`
pub fn map_vertex(vertex: &NormalizedVertex, bounds: &Extents) -> WorldPoint {
    let coord = |axis: Axis| {
        let (min, max) = bounds.range(axis);
        vertex.get(axis).lerp(min, max)
    };
    Point3::new(coord(Axis::X), coord(Axis::Y), coord(Axis::Z))
}

/// Map a cube-local polygon into the world box of `cube`
pub fn to_world(polygon: &Polygon<NormalizedVertex>, cube: &LatticeCube) -> WorldPolygon {
    WorldPolygon::new(
        polygon
            .vertices
            .iter()
            .map(|v| map_vertex(v, &cube.bounds))
            .collect(),
        cube.edge_length(),
    )
}
