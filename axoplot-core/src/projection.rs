//! Oblique axonometric projection from world space to screen pixels.

use crate::error::RenderResult;
use crate::geometry::{Extents, PixelPoint, WorldPoint};

/// Rotation angles at which the ground axes move purely horizontally or
/// vertically on screen
const CARDINAL_ANGLES: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Largest zoom factor a view accepts
pub const MAX_ZOOM: f64 = 1000.0;

/// View parameters for one repaint.
///
/// The ground plane (x, y) is drawn as an ellipse with radius `big_radius`
/// along the screen horizontal and a radius foreshortened by the tilt
/// perpendicular to it. Tilt 0° looks edge-on at the ground plane, 90°
/// looks straight down. The value is captured once per repaint and passed
/// explicitly to every stage; input handling produces a new value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Rotation around the vertical axis, degrees in `[0, 360)`
    pub rotation: f64,
    /// Elevation of the eye above the ground plane, degrees in `[0, 90]`
    pub tilt: f64,
    pub zoom: f64,
    pub big_radius: f64,
    /// Screen length of the full z range when viewed edge-on
    pub height_projection: f64,
    /// Screen position of the center of the plot extents
    pub center: (f64, f64),
}

impl ViewState {
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            rotation: 30.0,
            tilt: 30.0,
            zoom: 1.0,
            big_radius: 0.4 * w.min(h),
            height_projection: 0.35 * h,
            center: (w / 2.0, h / 2.0),
        }
    }

    /// Small radius of the ground ellipse
    pub fn small_radius(&self) -> f64 {
        self.big_radius * self.tilt.to_radians().sin()
    }

    /// Half-length of the projected z axis
    pub fn height(&self) -> f64 {
        self.height_projection * self.tilt.to_radians().cos()
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees.rem_euclid(360.0);
        self
    }

    pub fn with_tilt(mut self, degrees: f64) -> Self {
        self.tilt = degrees.clamp(0.0, 90.0);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom.min(MAX_ZOOM);
        }
        self
    }

    pub fn with_center(mut self, x: f64, y: f64) -> Self {
        self.center = (x, y);
        self
    }

    pub fn with_radii(mut self, big_radius: f64, height_projection: f64) -> Self {
        self.big_radius = big_radius;
        self.height_projection = height_projection;
        self
    }

    /// Rotate by `delta` degrees, wrapping into `[0, 360)`
    pub fn rotated(self, delta: f64) -> Self {
        self.with_rotation(self.rotation + delta)
    }

    /// Tilt by `delta` degrees, clamped to `[0, 90]`
    pub fn tilted(self, delta: f64) -> Self {
        self.with_tilt(self.tilt + delta)
    }

    /// Scale the zoom factor, capped at [`MAX_ZOOM`]; non-positive factors
    /// are ignored
    pub fn zoomed(self, factor: f64) -> Self {
        self.with_zoom(self.zoom * factor)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn is_cardinal(degrees: f64) -> bool {
    CARDINAL_ANGLES.contains(&degrees)
}

/// Polar angle, in degrees, of the ground-ellipse point at parameter
/// `nominal`.
///
/// The result lies in the same 90° quadrant as `nominal`, so a uniform drag
/// of the nominal angle sweeps the drawn axis around the ellipse without
/// jumping between quadrants.
pub fn graphical_angle(nominal: f64, big_radius: f64, small_radius: f64) -> f64 {
    let angle = nominal.rem_euclid(360.0);
    if is_cardinal(angle) {
        return angle;
    }
    let base = (small_radius * angle.to_radians().tan() / big_radius)
        .atan()
        .to_degrees();
    if angle < 90.0 {
        base
    } else if angle < 270.0 {
        base + 180.0
    } else {
        base + 360.0
    }
}

/// Screen offset of a unit ground axis drawn at rotation `angle`
fn axis_tip(angle: f64, big_radius: f64, small_radius: f64) -> (f64, f64) {
    let angle = angle.rem_euclid(360.0);
    if angle == 0.0 {
        (big_radius, 0.0)
    } else if angle == 90.0 {
        (0.0, small_radius)
    } else if angle == 180.0 {
        (-big_radius, 0.0)
    } else if angle == 270.0 {
        (0.0, -small_radius)
    } else {
        let graphical = graphical_angle(angle, big_radius, small_radius).to_radians();
        let nominal_tan = angle.to_radians().tan();
        let foreshortening = 1.0 / (1.0 + nominal_tan * nominal_tan).sqrt();
        let x = graphical.cos().signum() * big_radius * foreshortening;
        (x, x * graphical.tan())
    }
}

/// Linear map of `value` from `[min, max]` to `[-1, 1]`
fn normalize(value: f64, min: f64, max: f64) -> f64 {
    2.0 * (value - min) / (max - min) - 1.0
}

/// A [`ViewState`] bound to validated plot extents.
///
/// Building one checks the extents once, after which every projection in
/// the repaint is infallible.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    view: ViewState,
    extents: Extents,
    x_tip: (f64, f64),
    y_tip: (f64, f64),
    height: f64,
}

impl Projector {
    pub fn new(view: ViewState, extents: Extents) -> RenderResult<Self> {
        extents.validate()?;
        let big = view.big_radius;
        let small = view.small_radius();
        Ok(Self {
            view,
            extents,
            x_tip: axis_tip(view.rotation, big, small),
            y_tip: axis_tip(view.rotation + 270.0, big, small),
            height: view.height(),
        })
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn extents(&self) -> &Extents {
        &self.extents
    }

    /// Unrounded screen position of a world point
    pub fn project_exact(&self, point: &WorldPoint) -> (f64, f64) {
        let (min, max) = (&self.extents.min, &self.extents.max);
        let u = normalize(point.x, min.x, max.x);
        let v = normalize(point.y, min.y, max.y);
        let w = normalize(point.z, min.z, max.z);

        let ground_x = u * self.x_tip.0 + v * self.y_tip.0;
        let ground_y = u * self.x_tip.1 + v * self.y_tip.1;
        // z grows upward, pixel y grows downward
        let vertical = -self.height * w;

        (
            self.view.center.0 + self.view.zoom * ground_x,
            self.view.center.1 + self.view.zoom * (ground_y + vertical),
        )
    }

    pub fn project(&self, point: &WorldPoint) -> PixelPoint {
        let (x, y) = self.project_exact(point);
        PixelPoint::new(x.round() as i32, y.round() as i32)
    }
}

/// Project one world point.
///
/// Fails with [`RenderError::DegenerateExtent`](crate::RenderError) when an
/// axis of `extents` has no width.
pub fn project(
    point: &WorldPoint,
    view: &ViewState,
    extents: &Extents,
) -> RenderResult<PixelPoint> {
    Ok(Projector::new(*view, *extents)?.project(point))
}
