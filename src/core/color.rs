//! Display colors carried by rings.
//!
//! Colors are opaque RGB triples. In a canonical ring tag they are written as
//! the decimal string of the packed ARGB integer (alpha fixed at 0xFF), so
//! white is `"-1"` and black is `"-16777216"`.

use serde::{Deserialize, Serialize};

/// An opaque RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create a color from its components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a `0xRRGGBB` integer. Bits above 24 are ignored.
    #[must_use]
    pub const fn from_rgb_int(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packed ARGB value with an opaque alpha channel.
    #[must_use]
    pub const fn argb(self) -> i32 {
        let packed = 0xFF00_0000u32 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32;
        packed as i32
    }

    /// Canonical string form: decimal packed ARGB.
    #[must_use]
    pub fn to_decimal_string(self) -> String {
        self.argb().to_string()
    }

    /// Parse a persisted color.
    ///
    /// Accepts signed decimal (`"-16777216"`), `#rrggbb` and `0xrrggbb`.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let hex = text
            .strip_prefix('#')
            .or_else(|| text.strip_prefix("0x"))
            .or_else(|| text.strip_prefix("0X"));

        let value = match hex {
            Some(digits) => u32::from_str_radix(digits, 16).ok()?,
            None => text.parse::<i64>().ok()? as u32,
        };
        Some(Self::from_rgb_int(value))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
