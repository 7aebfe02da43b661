//! Designs: named, ordered color palettes for manufactured pieces.
//!
//! A design is the fixed palette a physical artwork is built from. Palette
//! order is what makes the apportionment adjustment deterministic, so it is
//! preserved everywhere a design travels (files, API payloads, the TUI).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::PieceColor;

/// A named, ordered palette of piece colors.
///
/// Invariant: the palette is never empty. The constructor enforces this so
/// downstream consumers (the apportionment calculator, the TUI bars) can
/// rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Design {
    /// Display name of the design (e.g., "Sunset Mosaic").
    pub name: String,
    /// Ordered palette. Order matters for adjustment distribution.
    colors: Vec<PieceColor>,
}

impl Design {
    /// Creates a new design with the given name and palette.
    ///
    /// # Errors
    ///
    /// Returns an error if `colors` is empty.
    pub fn new(name: impl Into<String>, colors: Vec<PieceColor>) -> Result<Self> {
        if colors.is_empty() {
            anyhow::bail!("Design must have at least one color");
        }
        Ok(Self {
            name: name.into(),
            colors,
        })
    }

    /// Parses a design from a comma-separated list of hex codes.
    ///
    /// # Examples
    ///
    /// ```
    /// use opsdeck::models::Design;
    ///
    /// let design = Design::from_hex_list("Ad hoc", "#FF0000, 00FF00").unwrap();
    /// assert_eq!(design.color_count(), 2);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or any entry is not a hex color.
    pub fn from_hex_list(name: impl Into<String>, list: &str) -> Result<Self> {
        let colors = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PieceColor::from_hex)
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, colors)
    }

    /// The ordered palette.
    #[must_use]
    pub fn colors(&self) -> &[PieceColor] {
        &self.colors
    }

    /// Number of colors in the palette.
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Built-in catalog of stock designs shipped with the application.
    ///
    /// User-defined designs live next to the order data; these are the
    /// defaults every installation starts with.
    #[must_use]
    pub fn stock_catalog() -> Vec<Self> {
        let make = |name: &str, hexes: &[&str]| {
            let colors = hexes
                .iter()
                .map(|h| PieceColor::from_hex(h).expect("stock catalog hex is valid"))
                .collect();
            Self::new(name, colors).expect("stock catalog is non-empty")
        };

        vec![
            make("Sunset Mosaic", &["#E63946", "#F4A261", "#E9C46A", "#2A9D8F"]),
            make("Harbor Blues", &["#03045E", "#0077B6", "#00B4D8", "#90E0EF", "#CAF0F8"]),
            make("Forest Floor", &["#344E41", "#3A5A40", "#588157", "#A3B18A", "#DAD7CD"]),
            make("Monochrome", &["#111111", "#555555", "#999999", "#DDDDDD"]),
            make("Poppy Field", &["#D00000", "#FFBA08", "#3F88C5", "#032B43", "#136F63"]),
        ]
    }
}
