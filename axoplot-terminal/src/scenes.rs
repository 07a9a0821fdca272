/// Built-in demo plots
use std::f64::consts::PI;

use axoplot_core::{
    CellRange, Extents, ExplicitSurface, ImplicitSurface, ParametricCurve, RenderResult,
    SampledLattice,
};
use nalgebra::Point3;

use crate::Plot;

/// Names accepted by [`scene`]
pub const SCENES: [&str; 4] = ["sphere", "torus", "saddle", "helix"];

/// Build a demo plot by name; `None` for an unknown name
pub fn scene(name: &str) -> RenderResult<Option<Plot>> {
    let plot = match name {
        "sphere" => Plot::Implicit(sphere()?),
        "torus" => Plot::Implicit(torus()?),
        "saddle" => Plot::Explicit(saddle()?),
        "helix" => Plot::Curve(helix()),
        _ => return Ok(None),
    };
    Ok(Some(plot))
}

fn sphere() -> RenderResult<ImplicitSurface> {
    let extents = Extents::new((-1.0, 1.0), (-1.0, 1.0), (-1.0, 1.0));
    let field = SampledLattice::from_fn(extents, CellRange::new(14, 14, 14), |p| {
        p.coords.norm_squared() <= 0.8
    })?;
    ImplicitSurface::build(&field)
}

fn torus() -> RenderResult<ImplicitSurface> {
    let extents = Extents::new((-1.0, 1.0), (-1.0, 1.0), (-0.5, 0.5));
    let field = SampledLattice::from_fn(extents, CellRange::new(20, 20, 10), |p| {
        let ring = (p.x * p.x + p.y * p.y).sqrt() - 0.6;
        ring * ring + p.z * p.z <= 0.09
    })?;
    ImplicitSurface::build(&field)
}

fn saddle() -> RenderResult<ExplicitSurface> {
    ExplicitSurface::from_fn((-1.0, 1.0), (-1.0, 1.0), 12, 12, |x, y| x * x - y * y)
}

fn helix() -> ParametricCurve {
    let turns = 3.0;
    ParametricCurve::from_fn(0.0, turns * 2.0 * PI, 240, |t| {
        Point3::new(t.cos(), t.sin(), t / (turns * PI) - 1.0)
    })
}
