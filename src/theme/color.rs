//! RGB colour values handed to the canvas

use image::Rgba;

/// Opaque 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Create a color from RGB values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Create a color from unit-range channels, rounding to the nearest byte
    ///
    /// Channels outside `0.0..=1.0` are clamped.
    pub fn from_unit(r: f32, g: f32, b: f32) -> Self {
        Color::rgb(unit_to_byte(r), unit_to_byte(g), unit_to_byte(b))
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    pub const fn white() -> Self {
        Color::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Color::rgb(0, 0, 0)
    }

    /// Fully opaque pixel for raster surfaces
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}

fn unit_to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unit_rounds() {
        assert_eq!(Color::from_unit(0.9, 0.9, 0.9), Color::rgb(230, 230, 230));
        assert_eq!(Color::from_unit(0.6, 0.6, 0.6), Color::rgb(153, 153, 153));
        assert_eq!(Color::from_unit(1.5, -1.0, 0.0), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#3366cc"), Some(Color::rgb(0x33, 0x66, 0xcc)));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::white()));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("zzzzzz"), None);
    }

    #[test]
    fn test_to_rgba_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgba(), Rgba([1, 2, 3, 255]));
    }
}
