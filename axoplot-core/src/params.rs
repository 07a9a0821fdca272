//! Rendering parameters.

use crate::shade::Color;

/// Colors and fill mode for a plot.
///
/// # Examples
///
/// ```
/// use axoplot_core::{Color, RenderParams};
///
/// let params = RenderParams::default()
///     .with_base_color(Color::rgb(40, 0, 160))
///     .with_fill(false);
/// assert!(!params.fill);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderParams {
    /// Color the whole surface is cleared to before drawing.
    pub background: Color,

    /// Fill color at the bottom of the z range, before rotation shading.
    pub base_color: Color,

    /// Color of polygon outlines, axes and curves.
    pub outline: Color,

    /// Fill polygons ("whole graph" mode). When false only outlines are drawn.
    pub fill: bool,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            base_color: Color::rgb(90, 40, 150),
            outline: Color::rgb(200, 200, 200),
            fill: true,
        }
    }
}

impl RenderParams {
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_base_color(mut self, color: Color) -> Self {
        self.base_color = color;
        self
    }

    pub fn with_outline(mut self, color: Color) -> Self {
        self.outline = color;
        self
    }

    pub fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }
}
