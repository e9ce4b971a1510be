//! RGBA colors and color-string parsing.
//!
//! Colors can be written as hex strings (`"#EFF5FB"`, `"#RRGGBBAA"`), as
//! single-letter shorthands (`"b"`, `"k"`), as CSS-like names, or as
//! `[r, g, b]` / `[r, g, b, a]` arrays in configuration files.

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorSpec", into = "ColorSpec")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a new alpha value (0.0 - 1.0).
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn to_rgba(self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation between two colors.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let lerp_u8 =
            |a: u8, b: u8| -> u8 { ((a as f64) * (1.0 - t) + (b as f64) * t).round() as u8 };

        Color {
            r: lerp_u8(self.r, other.r),
            g: lerp_u8(self.g, other.g),
            b: lerp_u8(self.b, other.b),
            a: lerp_u8(self.a, other.a),
        }
    }

    /// Parse a color string: hex, single-letter shorthand or name.
    pub fn parse(s: &str) -> Result<Self, MapError> {
        let s = s.trim();
        if s.starts_with('#') {
            return parse_hex_color(s)
                .ok_or_else(|| MapError::InvalidInput(format!("invalid hex color '{}'", s)));
        }
        named_color(s).ok_or_else(|| MapError::InvalidInput(format!("unknown color '{}'", s)))
    }

    /// Format as `#RRGGBB` (or `#RRGGBBAA` when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::str::FromStr for Color {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

/// Serialized form of a color.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    /// Hex string or named color
    Text(String),

    /// RGB array: [r, g, b] or [r, g, b, a]
    Array(Vec<u8>),
}

impl TryFrom<ColorSpec> for Color {
    type Error = MapError;

    fn try_from(spec: ColorSpec) -> Result<Self, Self::Error> {
        match spec {
            ColorSpec::Text(s) => Color::parse(&s),
            ColorSpec::Array(arr) => match arr.as_slice() {
                [r, g, b] => Ok(Color::rgb(*r, *g, *b)),
                [r, g, b, a] => Ok(Color::new(*r, *g, *b, *a)),
                _ => Err(MapError::InvalidInput(format!(
                    "color arrays need 3 or 4 components, got {}",
                    arr.len()
                ))),
            },
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        ColorSpec::Text(color.to_hex())
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let s = s.trim_start_matches('#');
    let channel = |i: usize| u8::from_str_radix(s.get(i..i + 2)?, 16).ok();

    match s.len() {
        6 => Some(Color::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Color::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        3 => {
            let nibble = |i: usize| {
                let v = u8::from_str_radix(s.get(i..i + 1)?, 16).ok()?;
                Some(v * 17)
            };
            Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        _ => None,
    }
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name.to_lowercase().as_str() {
        "transparent" | "none" => Color::TRANSPARENT,
        // Single-letter shorthands
        "b" => Color::rgb(0, 0, 255),
        "g" => Color::rgb(0, 128, 0),
        "r" => Color::rgb(255, 0, 0),
        "c" => Color::rgb(0, 191, 191),
        "m" => Color::rgb(191, 0, 191),
        "y" => Color::rgb(191, 191, 0),
        "k" => Color::BLACK,
        "w" => Color::WHITE,
        // Names
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgb(255, 0, 0),
        "green" => Color::rgb(0, 128, 0),
        "blue" => Color::rgb(0, 0, 255),
        "yellow" => Color::rgb(255, 255, 0),
        "cyan" => Color::rgb(0, 255, 255),
        "magenta" => Color::rgb(255, 0, 255),
        "orange" => Color::rgb(255, 165, 0),
        "purple" => Color::rgb(128, 0, 128),
        "gray" | "grey" => Color::rgb(128, 128, 128),
        "darkgray" | "darkgrey" => Color::rgb(88, 88, 88),
        "lightgray" | "lightgrey" => Color::rgb(211, 211, 211),
        _ => return None,
    };
    Some(color)
}
