//! Back-to-front ordering without a depth buffer.
//!
//! Lattice cells are swept along the ground axis that points most directly
//! at the viewer, far side first. Polygons inside a cell are ordered by the
//! same rule applied to their centroids. Above 45° of tilt, items that sit
//! in the same slab of the sweep axis are stacked bottom to top instead.
//!
//! The polygon comparator is antisymmetric but not transitive, so polygons
//! are sorted with [`insertion_sort_by`], which never rejects an
//! inconsistent comparator.

use std::cmp::Ordering;

use crate::geometry::{Axis, CellIndex, CellRange, WorldPoint};
use crate::mapping::WorldPolygon;
use crate::projection::ViewState;

/// Tilt above which near-coincident items are stacked by height
pub const STEEP_TILT: f64 = 45.0;

/// Fraction of the cell edge under which two items share a sweep slab
pub const SLAB_DIVISOR: f64 = 10.0;

/// Ground-plane sweep for one rotation angle.
///
/// A 90° quadrant test on the rotation picks the direction along each ground
/// axis; the axis facing the viewer more directly is the primary one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOrder {
    pub primary: Axis,
    pub x_ascending: bool,
    pub y_ascending: bool,
}

impl SweepOrder {
    pub fn from_rotation(degrees: f64) -> Self {
        let angle = degrees.rem_euclid(360.0);
        let (x_ascending, y_ascending) = match (angle / 90.0) as u32 {
            0 => (true, false),
            1 => (true, true),
            2 => (false, true),
            _ => (false, false),
        };
        let folded = angle.rem_euclid(180.0);
        let primary = if folded > 45.0 && folded < 135.0 {
            Axis::X
        } else {
            Axis::Y
        };
        Self {
            primary,
            x_ascending,
            y_ascending,
        }
    }

    pub fn secondary(&self) -> Axis {
        match self.primary {
            Axis::X => Axis::Y,
            _ => Axis::X,
        }
    }

    /// Whether the far-to-near direction along `axis` is increasing.
    /// Height always sweeps bottom to top.
    pub fn ascending(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x_ascending,
            Axis::Y => self.y_ascending,
            Axis::Z => true,
        }
    }

    /// Indices `0..n` along `axis` in far-to-near order
    pub fn indices(&self, axis: Axis, n: usize) -> Vec<usize> {
        if self.ascending(axis) {
            (0..n).collect()
        } else {
            (0..n).rev().collect()
        }
    }
}

/// Compare two points for drawing order; `Less` means `a` is drawn first.
///
/// `tolerance` is the cell edge length. Antisymmetric and reflexive for a
/// fixed view, but not transitive.
pub fn compare_points(
    a: &WorldPoint,
    b: &WorldPoint,
    view: &ViewState,
    tolerance: f64,
) -> Ordering {
    let sweep = SweepOrder::from_rotation(view.rotation);
    let by = |axis: Axis| {
        let (x, y) = (a[axis.index()], b[axis.index()]);
        let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
        if sweep.ascending(axis) {
            ord
        } else {
            ord.reverse()
        }
    };
    let primary = sweep.primary;
    let secondary = sweep.secondary();

    let gap = (a[primary.index()] - b[primary.index()]).abs();
    if view.tilt > STEEP_TILT && gap < tolerance / SLAB_DIVISOR {
        by(Axis::Z).then(by(secondary)).then(by(primary))
    } else {
        by(primary).then(by(secondary)).then(by(Axis::Z))
    }
}

/// Stable insertion sort that tolerates non-transitive comparators
pub fn insertion_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Drawing order for lattice cells and the polygons inside them
pub trait DepthStrategy {
    /// Every cell of `range`, farthest first
    fn order_cells(&self, view: &ViewState, range: CellRange) -> Vec<CellIndex>;

    fn compare_polygons(&self, p: &WorldPolygon, q: &WorldPolygon, view: &ViewState) -> Ordering;

    /// The polygons of one cell, farthest first
    fn order_polygons<'a>(
        &self,
        polygons: &'a [WorldPolygon],
        view: &ViewState,
    ) -> Vec<&'a WorldPolygon> {
        let mut ordered: Vec<&WorldPolygon> = polygons.iter().collect();
        insertion_sort_by(&mut ordered, |p, q| self.compare_polygons(p, q, view));
        ordered
    }
}

/// The quadrant-sweep painter's ordering
#[derive(Debug, Clone, Copy, Default)]
pub struct PainterHeuristic;

impl DepthStrategy for PainterHeuristic {
    fn order_cells(&self, view: &ViewState, range: CellRange) -> Vec<CellIndex> {
        let sweep = SweepOrder::from_rotation(view.rotation);
        let primary = sweep.primary;
        let secondary = sweep.secondary();
        let outer = sweep.indices(primary, range.get(primary));
        let across = sweep.indices(secondary, range.get(secondary));
        let heights = sweep.indices(Axis::Z, range.nz);
        let steep = view.tilt > STEEP_TILT;

        let cell = |p: usize, s: usize, k: usize| match primary {
            Axis::X => CellIndex::new(p, s, k),
            _ => CellIndex::new(s, p, k),
        };

        let mut cells = Vec::with_capacity(range.count());
        for &p in &outer {
            if steep {
                for &k in &heights {
                    cells.extend(across.iter().map(|&s| cell(p, s, k)));
                }
            } else {
                for &s in &across {
                    cells.extend(heights.iter().map(|&k| cell(p, s, k)));
                }
            }
        }
        cells
    }

    fn compare_polygons(&self, p: &WorldPolygon, q: &WorldPolygon, view: &ViewState) -> Ordering {
        let tolerance = p.edge_length.min(q.edge_length);
        compare_points(&p.centroid(), &q.centroid(), view, tolerance)
    }
}
