//! Output types for the color-distribution calculator.

use serde::{Deserialize, Serialize};

use super::PieceColor;

/// Whether the per-color adjustment adds to or subtracts from the base share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Base share is the floor of the average; some colors get one extra piece.
    Add,
    /// Base share is the ceiling of the average; some colors give one piece back.
    Subtract,
}

impl std::fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentType::Add => write!(f, "+1"),
            AdjustmentType::Subtract => write!(f, "-1"),
        }
    }
}

/// Per-color share of the total piece count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorShare {
    /// The color this share belongs to.
    pub color: PieceColor,
    /// Number of pieces allocated to this color.
    pub count: u32,
}

/// A complete distribution of pieces across a design's palette.
///
/// Invariant: the counts in `distribution` sum to exactly `total_pieces`,
/// and every count is within one of the even share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDistribution {
    /// Total number of pieces distributed.
    pub total_pieces: u32,
    /// Number of colors in the palette (length of `distribution`).
    pub color_count: usize,
    /// Base share every color starts from.
    pub base_pieces_per_color: u32,
    /// Per-color shares, in palette order.
    pub distribution: Vec<ColorShare>,
    /// How many colors deviate from the base share.
    pub adjustment_count: u32,
    /// Direction of the deviation.
    pub adjustment_type: AdjustmentType,
}

impl ColorDistribution {
    /// Sum of all per-color counts. Always equals `total_pieces`.
    #[must_use]
    pub fn sum(&self) -> u32 {
        self.distribution.iter().map(|share| share.count).sum()
    }

    /// Largest per-color count, used to scale the TUI bars.
    #[must_use]
    pub fn max_count(&self) -> u32 {
        self.distribution
            .iter()
            .map(|share| share.count)
            .max()
            .unwrap_or(0)
    }
}
