//! Implicit-surface extraction and the per-repaint drawing pass.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::depth::{DepthStrategy, PainterHeuristic};
use crate::error::RenderResult;
use crate::field::ScalarField;
use crate::geometry::{Axis, CellIndex, CellRange, Extents, LatticeCube, PixelPoint};
use crate::mapping::{to_world, WorldPolygon};
use crate::marching::polygonize;
use crate::params::RenderParams;
use crate::projection::{Projector, ViewState};
use crate::shade::{color_of, Color};

/// A 2-D canvas the renderers draw into
pub trait DrawingSurface {
    /// Width and height in pixels
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color);

    /// Fill a closed polygon with the even-odd rule
    fn fill_polygon(&mut self, points: &[PixelPoint], color: Color);

    /// Draw the closed outline of a polygon
    fn stroke_polygon(&mut self, points: &[PixelPoint], color: Color);

    /// Draw an open polyline
    fn stroke_polyline(&mut self, points: &[PixelPoint], color: Color) {
        for segment in points.windows(2) {
            self.stroke_polygon(segment, color);
        }
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Color,
    },
    FillPolygon(Vec<PixelPoint>, Color),
    StrokePolygon(Vec<PixelPoint>, Color),
    StrokePolyline(Vec<PixelPoint>, Color),
}

/// A surface that records draw calls in order, for replay or inspection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Draw every recorded command onto another surface
    pub fn replay<S: DrawingSurface>(&self, target: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::FillRect {
                    x,
                    y,
                    width,
                    height,
                    color,
                } => target.fill_rect(*x, *y, *width, *height, *color),
                DrawCommand::FillPolygon(points, color) => target.fill_polygon(points, *color),
                DrawCommand::StrokePolygon(points, color) => target.stroke_polygon(points, *color),
                DrawCommand::StrokePolyline(points, color) => {
                    target.stroke_polyline(points, *color)
                }
            }
        }
    }
}

impl DrawingSurface for DisplayList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[PixelPoint], color: Color) {
        self.commands
            .push(DrawCommand::FillPolygon(points.to_vec(), color));
    }

    fn stroke_polygon(&mut self, points: &[PixelPoint], color: Color) {
        self.commands
            .push(DrawCommand::StrokePolygon(points.to_vec(), color));
    }

    fn stroke_polyline(&mut self, points: &[PixelPoint], color: Color) {
        self.commands
            .push(DrawCommand::StrokePolyline(points.to_vec(), color));
    }
}

/// Clear the whole surface to the background color
pub fn clear<S: DrawingSurface>(surface: &mut S, params: &RenderParams) {
    let (width, height) = surface.size();
    surface.fill_rect(0, 0, width, height, params.background);
}

/// Stroke the three coordinate axes through the center of the extents
pub fn draw_axes<S: DrawingSurface>(surface: &mut S, projector: &Projector, color: Color) {
    let extents = projector.extents();
    let center = extents.center();
    for axis in Axis::ALL {
        let i = axis.index();
        let mut from = center;
        let mut to = center;
        from[i] = extents.min[i];
        to[i] = extents.max[i];
        surface.stroke_polyline(&[projector.project(&from), projector.project(&to)], color);
    }
}

/// Polygons extracted from a sampled field, one list per lattice cell.
///
/// Built once per field and reused for every repaint.
#[derive(Debug, Clone)]
pub struct ImplicitSurface {
    extents: Extents,
    range: CellRange,
    cells: Vec<Vec<WorldPolygon>>,
}

impl ImplicitSurface {
    /// Extract the surface polygons of every cell of `field`
    pub fn build<F: ScalarField + Sync>(field: &F) -> RenderResult<Self> {
        let range = field.resolution();
        range.validate()?;
        let extents = field.extents();
        extents.validate()?;

        let indices: Vec<CellIndex> = range.cells().collect();
        let cells: Vec<Vec<WorldPolygon>> = indices
            .par_iter()
            .map(|&index| {
                let cube = LatticeCube::new(index, range, &extents);
                polygonize(field.corner_flags(index))
                    .iter()
                    .map(|polygon| to_world(polygon, &cube))
                    .collect()
            })
            .collect();

        let surface = Self {
            extents,
            range,
            cells,
        };
        info!(
            cells = range.count(),
            polygons = surface.polygon_count(),
            "Built implicit surface"
        );
        Ok(surface)
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    pub fn range(&self) -> CellRange {
        self.range
    }

    /// Polygons of one cell; empty for cells outside the lattice
    pub fn polygons(&self, cell: CellIndex) -> &[WorldPolygon] {
        if cell.i >= self.range.nx || cell.j >= self.range.ny || cell.k >= self.range.nz {
            return &[];
        }
        &self.cells[self.range.flat(cell)]
    }

    pub fn polygon_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.polygon_count() == 0
    }

    /// Draw all polygons back to front. Each polygon is filled (when enabled)
    /// and then outlined before the next one is touched.
    pub fn draw<S, D>(
        &self,
        surface: &mut S,
        projector: &Projector,
        strategy: &D,
        params: &RenderParams,
    ) where
        S: DrawingSurface,
        D: DepthStrategy + ?Sized,
    {
        let view = projector.view();
        let (z_min, z_max) = (self.extents.min.z, self.extents.max.z);
        let mut drawn = 0usize;

        for cell in strategy.order_cells(view, self.range) {
            let polygons = self.polygons(cell);
            if polygons.is_empty() {
                continue;
            }
            for polygon in strategy.order_polygons(polygons, view) {
                let points: Vec<PixelPoint> =
                    polygon.vertices.iter().map(|v| projector.project(v)).collect();
                if params.fill {
                    let z = polygon.mean_z();
                    let color = color_of(params.base_color, z_min, z_max, z, view.rotation);
                    surface.fill_polygon(&points, color);
                }
                surface.stroke_polygon(&points, params.outline);
                drawn += 1;
            }
        }
        debug!(
            polygons = drawn,
            rotation = view.rotation,
            tilt = view.tilt,
            "Drew implicit surface"
        );
    }
}

/// Repaints an implicit surface with a pluggable depth ordering
#[derive(Debug, Clone, Default)]
pub struct SurfaceRenderer<D = PainterHeuristic> {
    pub strategy: D,
    pub params: RenderParams,
}

impl SurfaceRenderer<PainterHeuristic> {
    pub fn new(params: RenderParams) -> Self {
        Self {
            strategy: PainterHeuristic,
            params,
        }
    }
}

impl<D: DepthStrategy> SurfaceRenderer<D> {
    pub fn with_strategy(strategy: D, params: RenderParams) -> Self {
        Self { strategy, params }
    }

    /// Clear the surface and, when there is data, draw it for `view`
    pub fn render<S: DrawingSurface>(
        &self,
        surface: &mut S,
        view: &ViewState,
        plot: Option<&ImplicitSurface>,
    ) -> RenderResult<()> {
        clear(surface, &self.params);
        let Some(plot) = plot else {
            return Ok(());
        };
        let projector = Projector::new(*view, *plot.extents())?;
        plot.draw(surface, &projector, &self.strategy, &self.params);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::SampledLattice;

    fn sphere(n: usize) -> ImplicitSurface {
        let extents = Extents::new((-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0));
        let field = SampledLattice::from_fn(extents, CellRange::new(n, n, n), |p| {
            p.coords.norm_squared() <= 0.7
        })
        .unwrap();
        ImplicitSurface::build(&field).unwrap()
    }

    fn view() -> ViewState {
        ViewState::new(120, 80).with_rotation(40.0).with_tilt(35.0)
    }

    #[test]
    fn test_sphere_has_polygons_in_boundary_cells_only() {
        let surface = sphere(4);
        assert!(!surface.is_empty());
        assert!(!surface.polygons(CellIndex::new(1, 1, 1)).is_empty());
        // Every lattice point of a corner cell lies outside the sphere
        assert!(surface.polygons(CellIndex::new(0, 0, 0)).is_empty());
        assert!(surface.polygons(CellIndex::new(4, 0, 0)).is_empty());
    }

    #[test]
    fn test_no_data_only_clears() {
        let renderer = SurfaceRenderer::new(RenderParams::default());
        let mut list = DisplayList::new(120, 80);
        renderer.render(&mut list, &view(), None).unwrap();
        assert_eq!(
            list.commands,
            vec![DrawCommand::FillRect {
                x: 0,
                y: 0,
                width: 120,
                height: 80,
                color: RenderParams::default().background,
            }]
        );
    }

    #[test]
    fn test_fill_then_stroke_in_depth_order() {
        let surface = sphere(3);
        let params = RenderParams::default();
        let renderer = SurfaceRenderer::new(params);
        let mut list = DisplayList::new(120, 80);
        let v = view();
        renderer.render(&mut list, &v, Some(&surface)).unwrap();

        let projector = Projector::new(v, *surface.extents()).unwrap();
        let expected: Vec<Vec<PixelPoint>> = PainterHeuristic
            .order_cells(&v, surface.range())
            .into_iter()
            .flat_map(|cell| PainterHeuristic.order_polygons(surface.polygons(cell), &v))
            .map(|p| p.vertices.iter().map(|q| projector.project(q)).collect())
            .collect();

        let draws = &list.commands[1..];
        assert_eq!(draws.len(), expected.len() * 2);
        for (pair, points) in draws.chunks(2).zip(&expected) {
            match pair {
                [DrawCommand::FillPolygon(fill, _), DrawCommand::StrokePolygon(stroke, color)] => {
                    assert_eq!(fill, points);
                    assert_eq!(stroke, points);
                    assert_eq!(*color, params.outline);
                }
                other => panic!("unexpected draw sequence {other:?}"),
            }
        }
    }

    #[test]
    fn test_outline_mode_skips_fill() {
        let surface = sphere(2);
        let renderer = SurfaceRenderer::new(RenderParams::default().with_fill(false));
        let mut list = DisplayList::new(120, 80);
        renderer.render(&mut list, &view(), Some(&surface)).unwrap();
        assert!(list.commands[1..]
            .iter()
            .all(|c| matches!(c, DrawCommand::StrokePolygon(..))));
        assert_eq!(list.commands.len(), 1 + surface.polygon_count());
    }

    #[test]
    fn test_replay_reproduces_commands() {
        let surface = sphere(2);
        let renderer = SurfaceRenderer::new(RenderParams::default());
        let mut list = DisplayList::new(120, 80);
        renderer.render(&mut list, &view(), Some(&surface)).unwrap();
        let mut copy = DisplayList::new(120, 80);
        list.replay(&mut copy);
        assert_eq!(copy, list);
    }

    #[test]
    fn test_axes_are_three_segments() {
        let surface = sphere(2);
        let projector = Projector::new(view(), *surface.extents()).unwrap();
        let mut list = DisplayList::new(120, 80);
        draw_axes(&mut list, &projector, Color::WHITE);
        assert_eq!(list.commands.len(), 3);
    }
}
