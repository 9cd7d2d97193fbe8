//! Device colors and their normalized RGBA form.

use crate::error::{GenError, Result};

/// Color value as written in the content stream, before alpha is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceColor {
    /// Greyscale color (0.0 = black, 1.0 = white)
    Gray(f64),
    /// RGB color
    Rgb(f64, f64, f64),
    /// CMYK color
    Cmyk(f64, f64, f64, f64),
}

impl Default for DeviceColor {
    fn default() -> Self {
        DeviceColor::Gray(0.0)
    }
}

impl DeviceColor {
    /// Interpret color operands by their count (1 gray, 3 RGB, 4 CMYK).
    pub fn from_components(components: &[f64]) -> Result<Self> {
        match *components {
            [g] => Ok(DeviceColor::Gray(g)),
            [r, g, b] => Ok(DeviceColor::Rgb(r, g, b)),
            [c, m, y, k] => Ok(DeviceColor::Cmyk(c, m, y, k)),
            _ => Err(GenError::DecodeError(format!(
                "unsupported color with {} components",
                components.len()
            ))),
        }
    }

    /// Number of components in the color's space.
    pub const fn ncomponents(&self) -> usize {
        match self {
            DeviceColor::Gray(_) => 1,
            DeviceColor::Rgb(..) => 3,
            DeviceColor::Cmyk(..) => 4,
        }
    }

    /// Convert to RGB with the given alpha.
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        let (r, g, b) = match self {
            DeviceColor::Gray(g) => (g, g, g),
            DeviceColor::Rgb(r, g, b) => (r, g, b),
            DeviceColor::Cmyk(c, m, y, k) => (
                1.0 - (c + k).min(1.0),
                1.0 - (m + k).min(1.0),
                1.0 - (y + k).min(1.0),
            ),
        };
        Rgba::new(r, g, b, alpha)
    }
}

/// Normalized color with channels in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0.0, 0.0, 0.0);

    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 1.0)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_pick_color_space() {
        assert_eq!(
            DeviceColor::from_components(&[0.5]).unwrap(),
            DeviceColor::Gray(0.5)
        );
        assert_eq!(
            DeviceColor::from_components(&[1.0, 0.0, 0.0]).unwrap().ncomponents(),
            3
        );
        assert!(DeviceColor::from_components(&[1.0, 0.0]).is_err());
    }

    #[test]
    fn test_cmyk_conversion_clamps() {
        let rgba = DeviceColor::Cmyk(0.0, 1.0, 0.5, 0.75).with_alpha(0.5);
        assert_eq!(rgba, Rgba::new(0.25, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_default_alpha_is_opaque() {
        assert_eq!(Rgba::default().alpha, 1.0);
        assert_eq!(DeviceColor::Gray(1.0).with_alpha(1.0), Rgba::opaque(1.0, 1.0, 1.0));
    }
}
