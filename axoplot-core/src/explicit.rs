//! Explicit surfaces z = f(x, y) and parametric curves.
//!
//! Both consume points the caller has already evaluated; nothing here
//! knows about expressions.

use nalgebra::Point3;

use crate::depth::SweepOrder;
use crate::error::{RenderError, RenderResult};
use crate::geometry::{Axis, Extents, PixelPoint, WorldPoint};
use crate::params::RenderParams;
use crate::projection::{Projector, ViewState};
use crate::shade::color_of;
use crate::surface::{clear, DrawingSurface};

/// A grid of pre-evaluated points; row `i` runs along x, column `j` along y.
#[derive(Debug, Clone)]
pub struct ExplicitSurface {
    grid: Vec<Vec<WorldPoint>>,
    extents: Extents,
}

impl ExplicitSurface {
    pub fn new(grid: Vec<Vec<WorldPoint>>) -> RenderResult<Self> {
        let columns = grid.first().map_or(0, Vec::len);
        if grid.len() < 2 || columns < 2 {
            return Err(RenderError::EmptyGrid);
        }
        if let Some(row) = grid.iter().find(|row| row.len() != columns) {
            return Err(RenderError::SampleCountMismatch {
                expected: columns,
                actual: row.len(),
            });
        }
        let extents = Extents::enclosing(grid.iter().flatten())
            .ok_or(RenderError::EmptyGrid)?
            .widened();
        Ok(Self { grid, extents })
    }

    /// Evaluate `f` on an `(nx + 1) x (ny + 1)` grid over the given ranges
    pub fn from_fn<F>(
        x: (f64, f64),
        y: (f64, f64),
        nx: usize,
        ny: usize,
        f: F,
    ) -> RenderResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        let domain = Extents::new(x, y, (0.0, 1.0));
        let grid = (0..=nx)
            .map(|i| {
                let px = domain.lattice_coordinate(Axis::X, i, nx);
                (0..=ny)
                    .map(|j| {
                        let py = domain.lattice_coordinate(Axis::Y, j, ny);
                        Point3::new(px, py, f(px, py))
                    })
                    .collect()
            })
            .collect();
        Self::new(grid)
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Number of patches along x and y
    pub fn patch_counts(&self) -> (usize, usize) {
        (self.grid.len() - 1, self.grid[0].len() - 1)
    }

    /// Corner points of patch `(i, j)` as a closed loop
    pub fn patch(&self, i: usize, j: usize) -> [WorldPoint; 4] {
        [
            self.grid[i][j],
            self.grid[i + 1][j],
            self.grid[i + 1][j + 1],
            self.grid[i][j + 1],
        ]
    }

    /// Patch indices in far-to-near order for `view`
    pub fn patch_order(&self, view: &ViewState) -> Vec<(usize, usize)> {
        let sweep = SweepOrder::from_rotation(view.rotation);
        let (rows, columns) = self.patch_counts();
        let xs = sweep.indices(Axis::X, rows);
        let ys = sweep.indices(Axis::Y, columns);
        let mut order = Vec::with_capacity(rows * columns);
        match sweep.primary {
            Axis::X => {
                for &i in &xs {
                    order.extend(ys.iter().map(|&j| (i, j)));
                }
            }
            _ => {
                for &j in &ys {
                    order.extend(xs.iter().map(|&i| (i, j)));
                }
            }
        }
        order
    }

    pub fn draw<S: DrawingSurface>(
        &self,
        surface: &mut S,
        projector: &Projector,
        params: &RenderParams,
    ) {
        let view = projector.view();
        let (z_min, z_max) = (self.extents.min.z, self.extents.max.z);
        for (i, j) in self.patch_order(view) {
            let corners = self.patch(i, j);
            let points: Vec<PixelPoint> = corners.iter().map(|p| projector.project(p)).collect();
            if params.fill {
                let mean_z = corners.iter().map(|p| p.z).sum::<f64>() / 4.0;
                let color = color_of(params.base_color, z_min, z_max, mean_z, view.rotation);
                surface.fill_polygon(&points, color);
            }
            surface.stroke_polygon(&points, params.outline);
        }
    }

    /// Clear the surface and draw this plot in its own extents
    pub fn render<S: DrawingSurface>(
        &self,
        surface: &mut S,
        view: &ViewState,
        params: &RenderParams,
    ) -> RenderResult<()> {
        clear(surface, params);
        let projector = Projector::new(*view, self.extents)?;
        self.draw(surface, &projector, params);
        Ok(())
    }
}

/// A pre-evaluated space curve
#[derive(Debug, Clone)]
pub struct ParametricCurve {
    points: Vec<WorldPoint>,
}

impl ParametricCurve {
    pub fn new(points: Vec<WorldPoint>) -> Self {
        Self { points }
    }

    /// Sample `f` at `samples + 1` evenly spaced parameters in `[t0, t1]`
    pub fn from_fn<F>(t0: f64, t1: f64, samples: usize, f: F) -> Self
    where
        F: Fn(f64) -> WorldPoint,
    {
        let samples = samples.max(1);
        Self::new(
            (0..=samples)
                .map(|n| f(t0 + (t1 - t0) * n as f64 / samples as f64))
                .collect(),
        )
    }

    pub fn points(&self) -> &[WorldPoint] {
        &self.points
    }

    /// Bounding box of the curve, widened on flat axes
    pub fn extents(&self) -> Option<Extents> {
        Extents::enclosing(&self.points).map(|e| e.widened())
    }

    pub fn draw<S: DrawingSurface>(
        &self,
        surface: &mut S,
        projector: &Projector,
        params: &RenderParams,
    ) {
        if self.points.len() < 2 {
            return;
        }
        let points: Vec<PixelPoint> = self.points.iter().map(|p| projector.project(p)).collect();
        surface.stroke_polyline(&points, params.outline);
    }

    pub fn render<S: DrawingSurface>(
        &self,
        surface: &mut S,
        view: &ViewState,
        params: &RenderParams,
    ) -> RenderResult<()> {
        clear(surface, params);
        let Some(extents) = self.extents() else {
            return Ok(());
        };
        let projector = Projector::new(*view, extents)?;
        self.draw(surface, &projector, params);
        Ok(())
    }
}
