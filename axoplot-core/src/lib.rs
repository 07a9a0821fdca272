//! Axoplot Core - axonometric plotting of implicit and explicit surfaces
//!
//! This library turns inside/outside samples on a regular lattice into
//! polygons (binary marching cubes), places them in world space, and paints
//! them back to front through an oblique axonometric projection onto any
//! [`DrawingSurface`]. It never evaluates expressions itself.

pub mod depth;
pub mod error;
pub mod explicit;
pub mod field;
pub mod geometry;
pub mod lattice_file;
pub mod mapping;
pub mod marching;
pub mod params;
pub mod projection;
pub mod shade;
pub mod surface;

// Re-export commonly used types
pub use depth::{DepthStrategy, PainterHeuristic, SweepOrder};
pub use error::{RenderError, RenderResult};
pub use explicit::{ExplicitSurface, ParametricCurve};
pub use field::{SampledLattice, ScalarField};
pub use geometry::{Axis, CellIndex, CellRange, Extents, LatticeCube, PixelPoint, WorldPoint};
pub use lattice_file::{format_lattice, parse_lattice};
pub use mapping::WorldPolygon;
pub use marching::{polygonize, CornerFlags, CubeCase, CubeClassifier};
pub use params::RenderParams;
pub use projection::{project, Projector, ViewState};
pub use shade::{color_of, Color};
pub use surface::{
    draw_axes, DisplayList, DrawCommand, DrawingSurface, ImplicitSurface, SurfaceRenderer,
};
