//! Stroke color: linear premultiplied RGBA, converted from sRGB inputs.

use palette::{FromColor, LinSrgba, Srgba};

/// Linear premultiplied RGBA color. This is the form the GPU blends in
/// (premultiplied alpha blending) and the form snapshot pixels come back in.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create from sRGB u8 components (premultiplied in linear space).
    pub fn from_srgba_u8(c: [u8; 4]) -> Self {
        let s = Srgba::new(
            c[0] as f32 / 255.0,
            c[1] as f32 / 255.0,
            c[2] as f32 / 255.0,
            c[3] as f32 / 255.0,
        );
        let lin = LinSrgba::from_color(s);
        Self {
            r: lin.red * lin.alpha,
            g: lin.green * lin.alpha,
            b: lin.blue * lin.alpha,
            a: lin.alpha,
        }
    }

    /// Convert back to sRGB u8 RGBA (unpremultiplied).
    pub fn to_srgba_u8(&self) -> [u8; 4] {
        let (r, g, b) = if self.a > 1e-4 {
            (self.r / self.a, self.g / self.a, self.b / self.a)
        } else {
            (0.0, 0.0, 0.0)
        };
        let srgb = Srgba::from_color(LinSrgba::new(r, g, b, self.a));
        [
            (srgb.red * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.green * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.blue * 255.0).round().clamp(0.0, 255.0) as u8,
            (srgb.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ]
    }

    /// Parse a `#rrggbb` or `#rrggbbaa` hex string (as used by quill.toml).
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::from_srgba_u8([byte(0)?, byte(2)?, byte(4)?, 255])),
            8 => Some(Self::from_srgba_u8([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_round_trips() {
        let c = Rgba::from_srgba_u8([0, 0, 0, 255]);
        assert_eq!(c.to_srgba_u8(), [0, 0, 0, 255]);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn transparent_has_zero_alpha() {
        assert_eq!(Rgba::TRANSPARENT.to_srgba_u8()[3], 0);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(
            Rgba::from_hex("#ff0000"),
            Some(Rgba::from_srgba_u8([255, 0, 0, 255]))
        );
        assert_eq!(
            Rgba::from_hex("#0000ff80"),
            Some(Rgba::from_srgba_u8([0, 0, 255, 128]))
        );
        assert_eq!(Rgba::from_hex("ff0000"), None);
        assert_eq!(Rgba::from_hex("#ff"), None);
        assert_eq!(Rgba::from_hex("#gggggg"), None);
    }
}
