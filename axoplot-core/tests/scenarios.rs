//! End-to-end: corner flags through polygon building, world mapping and drawing.

use approx::assert_relative_eq;
use axoplot_core::mapping::to_world;
use axoplot_core::{
    polygonize, CellIndex, CellRange, CornerFlags, CubeCase, CubeClassifier, DisplayList,
    DrawCommand, Extents, ImplicitSurface, LatticeCube, RenderParams, SampledLattice,
    SurfaceRenderer, ViewState, WorldPoint,
};
use nalgebra::Point3;

fn single_cell(flags: CornerFlags, extents: Extents) -> Vec<Vec<WorldPoint>> {
    let range = CellRange::new(1, 1, 1);
    let cube = LatticeCube::new(CellIndex::new(0, 0, 0), range, &extents);
    polygonize(flags)
        .iter()
        .map(|polygon| to_world(polygon, &cube).vertices)
        .collect()
}

fn contains(points: &[WorldPoint], expected: WorldPoint) -> bool {
    points.iter().any(|p| (*p - expected).norm() < 1e-12)
}

#[test]
fn test_lone_corner_becomes_one_triangle() {
    let flags = CornerFlags::from_array([true, false, false, false, false, false, false, false]);
    assert_eq!(flags.classify(), CubeCase::IsolatedPoints);

    let polygons = single_cell(flags, Extents::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0)));
    assert_eq!(polygons.len(), 1);
    let triangle = &polygons[0];
    assert_eq!(triangle.len(), 3);
    for expected in [
        Point3::new(0.5, 0.0, 0.0),
        Point3::new(0.0, 0.5, 0.0),
        Point3::new(0.0, 0.0, 0.5),
    ] {
        assert!(contains(triangle, expected), "missing {expected:?} in {triangle:?}");
    }
}

#[test]
fn test_bottom_face_becomes_mid_height_quad() {
    // The four z = 0 corners are indices 0..4
    let flags = CornerFlags::from_array([true, true, true, true, false, false, false, false]);
    assert_eq!(flags.classify(), CubeCase::IsolatedPlane);

    let polygons = single_cell(flags, Extents::new((0.0, 2.0), (0.0, 2.0), (0.0, 2.0)));
    assert_eq!(polygons.len(), 1);
    let quad = &polygons[0];
    assert_eq!(quad.len(), 4);
    for p in quad {
        assert_relative_eq!(p.z, 1.0);
    }
    for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
        assert!(contains(quad, Point3::new(x, y, 1.0)), "missing ({x}, {y}) in {quad:?}");
    }
    // Consecutive vertices share an edge of the square
    for k in 0..4 {
        let a = quad[k];
        let b = quad[(k + 1) % 4];
        assert_relative_eq!((a - b).norm(), 2.0, epsilon = 1e-12);
    }
}

#[test]
fn test_complement_of_lone_corner_matches() {
    let flags = CornerFlags::from_array([false, true, true, true, true, true, true, true]);
    let polygons = single_cell(flags, Extents::new((0.0, 1.0), (0.0, 1.0), (0.0, 1.0)));
    assert_eq!(polygons.len(), 1);
    assert!(contains(&polygons[0], Point3::new(0.5, 0.0, 0.0)));
}

#[test]
fn test_lattice_to_display_list() {
    let extents = Extents::new((-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0));
    let field = SampledLattice::from_fn(extents, CellRange::new(6, 6, 6), |p| {
        p.coords.norm_squared() <= 0.6
    })
    .unwrap();
    let surface = ImplicitSurface::build(&field).unwrap();
    assert!(surface.polygon_count() > 0);

    let renderer = SurfaceRenderer::new(RenderParams::default());
    let view = ViewState::new(200, 150);
    let mut first = DisplayList::new(200, 150);
    let mut second = DisplayList::new(200, 150);
    renderer.render(&mut first, &view, Some(&surface)).unwrap();
    renderer.render(&mut second, &view, Some(&surface)).unwrap();

    assert_eq!(first, second);
    assert!(matches!(first.commands[0], DrawCommand::FillRect { .. }));
    assert_eq!(first.commands.len(), 1 + 2 * surface.polygon_count());
}
