//! Color-distribution calculator: largest-remainder apportionment.
//!
//! Distributes a fixed number of physical pieces across a design's ordered
//! palette so that every color is within one piece of the even share and the
//! counts sum to exactly the total. Two candidate allocations are compared:
//! round the average down and add the shortfall, or round it up and subtract
//! the surplus. Whichever touches fewer colors wins, ties going to the
//! floor-based allocation.

use anyhow::{Context, Result};

use crate::models::{AdjustmentType, ColorDistribution, ColorShare, PieceColor};

/// Computes the per-color piece distribution for a palette and total.
///
/// # Arguments
///
/// * `colors` - Ordered palette. Must be non-empty.
/// * `total_pieces` - Total number of pieces to distribute.
///
/// # Guarantees
///
/// * The returned counts sum to exactly `total_pieces`.
/// * Every count is the base share or the base share plus/minus one.
/// * The adjustment count is the minimum of the two candidates' deviations.
/// * Deterministic: identical inputs produce identical output.
///
/// # Errors
///
/// Returns an error if `colors` is empty.
///
/// # Examples
///
/// ```
/// use opsdeck::calc::compute_distribution;
/// use opsdeck::models::PieceColor;
///
/// let palette = vec![
///     PieceColor::new(255, 0, 0),
///     PieceColor::new(0, 255, 0),
///     PieceColor::new(0, 0, 255),
/// ];
/// let dist = compute_distribution(&palette, 10).unwrap();
/// assert_eq!(dist.sum(), 10);
/// assert_eq!(dist.distribution[0].count, 4);
/// ```
pub fn compute_distribution(colors: &[PieceColor], total_pieces: u32) -> Result<ColorDistribution> {
    if colors.is_empty() {
        anyhow::bail!("Cannot distribute pieces across an empty palette");
    }

    let n = u32::try_from(colors.len()).context("Palette is too large")?;

    // Candidate A: floor the average, then add the shortfall one piece at a
    // time. Candidate B: ceil the average, then subtract the surplus.
    let base_down = total_pieces / n;
    let extras_to_add = total_pieces - base_down * n;
    let base_up = total_pieces.div_ceil(n);
    let extras_to_subtract = base_up * n - total_pieces;

    // Ties favor adding, i.e. the floor-based allocation.
    let (base, adjustment_count, adjustment_type) = if extras_to_add <= extras_to_subtract {
        (base_down, extras_to_add, AdjustmentType::Add)
    } else {
        (base_up, extras_to_subtract, AdjustmentType::Subtract)
    };

    let mut distribution: Vec<ColorShare> = colors
        .iter()
        .map(|&color| ColorShare { color, count: base })
        .collect();

    // Spread the adjusted colors approximately uniformly across the palette
    // instead of clustering them at the front. adjustment_count <= n always
    // holds (it is the smaller of the two deviations), so the index formula
    // never lands on the same color twice.
    if adjustment_count > 0 {
        for i in 0..adjustment_count {
            let index = (i as usize) * colors.len() / (adjustment_count as usize);
            match adjustment_type {
                AdjustmentType::Add => distribution[index].count += 1,
                AdjustmentType::Subtract => distribution[index].count -= 1,
            }
        }
    }

    Ok(ColorDistribution {
        total_pieces,
        color_count: colors.len(),
        base_pieces_per_color: base,
        distribution,
        adjustment_count,
        adjustment_type,
    })
}

/// Parses a grid dimension from UI-supplied text.
///
/// The source of these strings is a free-text field, so fractional,
/// negative, or non-numeric input must be rejected here rather than
/// silently truncated into a distribution that breaks the sum invariant.
///
/// # Errors
///
/// Returns an error unless the string is a plain non-negative integer.
pub fn parse_dimension(field: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{field} is required");
    }
    trimmed.parse::<u32>().map_err(|_| {
        anyhow::anyhow!("{field} must be a non-negative whole number (got '{trimmed}')")
    })
}
