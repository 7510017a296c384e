//! Hex color strings as stored on canvases and artboards.

use crate::error::{DesignerError, DesignerResult};
use peniko::Color;

/// RGBA8 color parsed from a `#rgb`, `#rrggbb` or `#rrggbbaa` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a CSS-style hex color. `"transparent"` is accepted too.
    pub fn parse(value: &str) -> DesignerResult<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Ok(Self::transparent());
        }
        let invalid = || DesignerError::InvalidColor(value.to_string());
        let hex = value.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());

        match hex.len() {
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::new(short(0)?, short(1)?, short(2)?, 255))
            }
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?)),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl From<Color> for HexColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<HexColor> for Color {
    fn from(color: HexColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Parse a background color string into a renderer color.
pub fn parse_color(value: &str) -> DesignerResult<Color> {
    HexColor::parse(value).map(Color::from)
}
