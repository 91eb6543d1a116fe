use crate::error::{GlobeError, GlobeResult};
use crossterm::style::Color;
use serde::Deserialize;

/// 24-bit colour used by both globe layers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(s: &str) -> GlobeResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(GlobeError::InvalidColor(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| GlobeError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Build from a `[0, 1]` float triple, the way sphere colours are configured
    pub fn from_unit(rgb: [f32; 3]) -> Self {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(c(rgb[0]), c(rgb[1]), c(rgb[2]))
    }

    /// Multiply every channel, saturating at white
    pub fn scale(self, factor: f32) -> Self {
        let c = |v: u8| (v as f32 * factor.max(0.0)).round().min(255.0) as u8;
        Self::new(c(self.r), c(self.g), c(self.b))
    }

    /// Composite `self` at `alpha` over `background`
    pub fn blend_over(self, background: Rgb, alpha: f32) -> Self {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        Self::new(mix(self.r, background.r), mix(self.g, background.g), mix(self.b, background.b))
    }

    /// Perceived brightness in `[0, 255]`, used to pick the dominant dot in a cell
    pub fn luma(self) -> u32 {
        (self.r as u32 * 299 + self.g as u32 * 587 + self.b as u32 * 114) / 1000
    }
}

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

impl TryFrom<String> for Rgb {
    type Error = GlobeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&s)
    }
}
