/// Hex color handling for extracted palettes
///
/// The extraction service reports colors as `#rrggbb` strings. This module
/// validates them once at decode time so the rest of the client can work with
/// plain sRGB bytes:
/// - Parsing `#rgb` / `#rrggbb` (case-insensitive)
/// - Conversion to iced colors for drawing
/// - Relative luminance (sRGB -> linear) for picking readable label colors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Luminance above which black text is more readable than white (WCAG crossover)
const LABEL_LUMINANCE_THRESHOLD: f32 = 0.179;

/// A validated sRGB color as reported by the extraction service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn parse(input: &str) -> Result<Self, String> {
        let digits = input
            .trim()
            .strip_prefix('#')
            .ok_or_else(|| format!("color {:?} does not start with '#'", input))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("color {:?} contains non-hex digits", input));
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|e| e.to_string());

        match digits.len() {
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            // #abc is shorthand for #aabbcc
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            n => Err(format!("color {:?} has {} hex digits, expected 3 or 6", input, n)),
        }
    }

    pub fn to_color(self) -> iced::Color {
        iced::Color::from_rgb8(self.r, self.g, self.b)
    }

    /// WCAG relative luminance in [0, 1]
    pub fn relative_luminance(self) -> f32 {
        let [r, g, b] = [self.r, self.g, self.b].map(srgb_to_linear);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// Black or white, whichever reads better on top of this color
    pub fn label_color(self) -> iced::Color {
        if self.relative_luminance() > LABEL_LUMINANCE_THRESHOLD {
            iced::Color::BLACK
        } else {
            iced::Color::WHITE
        }
    }
}

/// Undo the sRGB transfer curve for one 8-bit channel
fn srgb_to_linear(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}
