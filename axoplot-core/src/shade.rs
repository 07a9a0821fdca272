//! Height-based fill colors.

/// Amplitude of the red/blue swing as the view rotates
const ROTATION_SWING: f64 = 60.0;

/// An opaque 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

fn clamp_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Fill color for a polygon at height `z` within `[z_min, z_max]`.
///
/// Red and blue swing by up to 60 in opposite directions with the sine of
/// the rotation, and green ramps from `base.g` at the bottom to 255 at the
/// top. A flat range returns `base` unchanged.
pub fn color_of(base: Color, z_min: f64, z_max: f64, z: f64, rotation: f64) -> Color {
    if z_min == z_max {
        return base;
    }
    let swing = ROTATION_SWING * rotation.to_radians().sin();
    let t = (z - z_min) / (z_max - z_min);
    let green = base.g as f64 + (255.0 - base.g as f64) * t;
    Color::rgb(
        clamp_channel(base.r as f64 + swing),
        clamp_channel(green),
        clamp_channel(base.b as f64 - swing),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_range_returns_base() {
        let base = Color::rgb(10, 20, 30);
        assert_eq!(color_of(base, 1.0, 1.0, 5.0, 90.0), base);
    }

    #[test]
    fn test_green_ramp() {
        let base = Color::rgb(100, 55, 100);
        assert_eq!(color_of(base, 0.0, 2.0, 0.0, 0.0).g, 55);
        assert_eq!(color_of(base, 0.0, 2.0, 1.0, 0.0).g, 155);
        assert_eq!(color_of(base, 0.0, 2.0, 2.0, 0.0).g, 255);
        assert_eq!(color_of(base, 0.0, 2.0, 1.0, 0.0).r, 100);
    }

    #[test]
    fn test_rotation_swings_red_and_blue() {
        let base = Color::rgb(100, 0, 100);
        let c = color_of(base, 0.0, 1.0, 0.5, 90.0);
        assert_eq!((c.r, c.b), (160, 40));
        let c = color_of(base, 0.0, 1.0, 0.5, 270.0);
        assert_eq!((c.r, c.b), (40, 160));
    }

    #[test]
    fn test_channels_clamp() {
        for base in [Color::BLACK, Color::WHITE, Color::rgb(30, 200, 230)] {
            for z in [-3.0, 0.0, 0.5, 1.0, 4.0] {
                let c = color_of(base, 0.0, 1.0, z, 270.0);
                // u8 cannot leave [0, 255]; check the clamps landed on the edges
                if base == Color::BLACK {
                    assert_eq!(c.r, 0);
                    assert_eq!(c.b, 60);
                }
                if base == Color::WHITE {
                    assert_eq!(c.b, 255);
                    assert_eq!(c.r, 195);
                }
                if z >= 1.0 {
                    assert_eq!(c.g, 255);
                }
            }
        }
        assert_eq!(color_of(Color::rgb(0, 100, 0), 0.0, 1.0, -1.0, 0.0).g, 0);
    }
}
