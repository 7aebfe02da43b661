//! Piece color handling with hex parsing and serialization.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color of a physical piece, with hex string representation.
///
/// Represents a color using red, green, and blue channels (0-255 each).
/// Serializes as a `#RRGGBB` hex string so design files and API payloads
/// read the way the shop catalogs colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceColor {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl PieceColor {
    /// Creates a new `PieceColor` from individual channel values.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `PieceColor` from a hex string.
    ///
    /// Supports formats: "#RRGGBB", "RRGGBB", "#rrggbb", "rrggbb"
    ///
    /// # Examples
    ///
    /// ```
    /// use opsdeck::models::PieceColor;
    ///
    /// let color = PieceColor::from_hex("#FF0000").unwrap();
    /// assert_eq!(color, PieceColor::new(255, 0, 0));
    ///
    /// let color = PieceColor::from_hex("00FF00").unwrap();
    /// assert_eq!(color, PieceColor::new(0, 255, 0));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid hex color format.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        // Length is in bytes; non-ASCII input must be rejected before
        // slicing or a 6-byte multibyte string would split a char boundary.
        if hex.len() != 6 || !hex.is_ascii() {
            anyhow::bail!("Invalid hex color format '{hex}'. Expected 6 hex digits (RRGGBB)");
        }

        let r = u8::from_str_radix(&hex[0..2], 16)
            .context(format!("Invalid red channel in hex color '{hex}'"))?;
        let g = u8::from_str_radix(&hex[2..4], 16)
            .context(format!("Invalid green channel in hex color '{hex}'"))?;
        let b = u8::from_str_radix(&hex[4..6], 16)
            .context(format!("Invalid blue channel in hex color '{hex}'"))?;

        Ok(Self::new(r, g, b))
    }

    /// Converts the color to a hex string in the format "#RRGGBB" (uppercase).
    ///
    /// # Examples
    ///
    /// ```
    /// use opsdeck::models::PieceColor;
    ///
    /// let color = PieceColor::new(255, 0, 0);
    /// assert_eq!(color.to_hex(), "#FF0000");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Converts the color to a Ratatui Color for terminal rendering.
    #[must_use]
    pub const fn to_ratatui_color(&self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.r, self.g, self.b)
    }

    /// Returns a dimmed version of the color at the given percentage.
    ///
    /// # Arguments
    ///
    /// * `percent` - Brightness percentage (0-100). 0 = black, 100 = original color.
    #[must_use]
    pub const fn dim(&self, percent: u8) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self {
            r: (self.r as u16 * percent as u16 / 100) as u8,
            g: (self.g as u16 * percent as u16 / 100) as u8,
            b: (self.b as u16 * percent as u16 / 100) as u8,
        }
    }

    /// Relative luma (0-255), used to pick readable label text on colored bars.
    #[must_use]
    pub fn luma(&self) -> u8 {
        let y = 0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b);
        y.round().clamp(0.0, 255.0) as u8
    }
}

impl fmt::Display for PieceColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for PieceColor {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<PieceColor> for String {
    fn from(color: PieceColor) -> Self {
        color.to_hex()
    }
}

impl Default for PieceColor {
    /// Default color is white (#FFFFFF).
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_valid() {
        let color = PieceColor::from_hex("#FF0000").unwrap();
        assert_eq!(color, PieceColor::new(255, 0, 0));

        let color = PieceColor::from_hex("00FF00").unwrap();
        assert_eq!(color, PieceColor::new(0, 255, 0));

        let color = PieceColor::from_hex("#0000ff").unwrap();
        assert_eq!(color, PieceColor::new(0, 0, 255));

        let color = PieceColor::from_hex("  #FFFFFF  ").unwrap();
        assert_eq!(color, PieceColor::new(255, 255, 255));
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(PieceColor::from_hex("#FFF").is_err());
        assert!(PieceColor::from_hex("#FFFFFFF").is_err());
        assert!(PieceColor::from_hex("GGGGGG").is_err());
        assert!(PieceColor::from_hex("").is_err());
        assert!(PieceColor::from_hex("#").is_err());
    }

    #[test]
    fn test_from_hex_multibyte_rejected() {
        // Both are 6 bytes long but not 6 ASCII digits; parsing must
        // return an error rather than panic on a char boundary.
        assert!(PieceColor::from_hex("\u{20ac}\u{20ac}").is_err());
        assert!(PieceColor::from_hex("ff00\u{e9}").is_err());
        assert!(PieceColor::from_hex("#\u{20ac}\u{20ac}").is_err());
    }

    #[test]
    fn test_to_hex() {
        let color = PieceColor::new(255, 0, 0);
        assert_eq!(color.to_hex(), "#FF0000");

        let color = PieceColor::new(0, 128, 255);
        assert_eq!(color.to_hex(), "#0080FF");
    }

    #[test]
    fn test_hex_roundtrip() {
        let original = PieceColor::new(123, 45, 67);
        let parsed = PieceColor::from_hex(&original.to_hex()).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let color = PieceColor::new(239, 68, 68);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#EF4444\"");

        let parsed: PieceColor = serde_json::from_str("\"#ef4444\"").unwrap();
        assert_eq!(parsed, color);
    }

    #[test]
    fn test_serde_rejects_garbage() {
        let result: Result<PieceColor, _> = serde_json::from_str("\"notacolor\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_dim() {
        let color = PieceColor::new(200, 100, 50);
        assert_eq!(color.dim(50), PieceColor::new(100, 50, 25));
        assert_eq!(color.dim(0), PieceColor::new(0, 0, 0));
        assert_eq!(color.dim(200), color);
    }

    #[test]
    fn test_luma_ordering() {
        assert!(PieceColor::new(255, 255, 255).luma() > PieceColor::new(0, 0, 0).luma());
        assert!(PieceColor::new(0, 255, 0).luma() > PieceColor::new(0, 0, 255).luma());
    }
}
