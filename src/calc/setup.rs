//! Setup and packaging calculator.
//!
//! Converts an order's piece total into the material and packaging counts the
//! floor needs to stage before a run: raw sheets to punch pieces from, boxes
//! to pack finished pieces into, and cartons to ship the boxes in. All
//! ceiling division, no state.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Material and packaging constants for the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupParams {
    /// Pieces punched from one raw sheet.
    pub pieces_per_sheet: u32,
    /// Finished pieces packed per box.
    pub pieces_per_box: u32,
    /// Boxes packed per shipping carton.
    pub boxes_per_carton: u32,
}

impl Default for SetupParams {
    fn default() -> Self {
        Self {
            pieces_per_sheet: 48,
            pieces_per_box: 100,
            boxes_per_carton: 12,
        }
    }
}

impl SetupParams {
    /// Validates that every capacity constant is positive.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first zero-valued field.
    pub fn validate(&self) -> Result<()> {
        if self.pieces_per_sheet == 0 {
            anyhow::bail!("pieces_per_sheet must be positive");
        }
        if self.pieces_per_box == 0 {
            anyhow::bail!("pieces_per_box must be positive");
        }
        if self.boxes_per_carton == 0 {
            anyhow::bail!("boxes_per_carton must be positive");
        }
        Ok(())
    }
}

/// Result of the setup/packaging calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupPlan {
    /// Total pieces the order requires.
    pub total_pieces: u32,
    /// Raw sheets to stage.
    pub sheets: u32,
    /// Pieces left unused on the final sheet.
    pub last_sheet_leftover: u32,
    /// Boxes to pack.
    pub boxes: u32,
    /// Open capacity in the final box.
    pub last_box_slack: u32,
    /// Shipping cartons to stage.
    pub cartons: u32,
}

/// Computes the setup/packaging plan for a piece total.
///
/// # Errors
///
/// Returns an error if any capacity constant in `params` is zero.
///
/// # Examples
///
/// ```
/// use opsdeck::calc::{compute_setup, SetupParams};
///
/// let plan = compute_setup(250, &SetupParams::default()).unwrap();
/// assert_eq!(plan.sheets, 6);       // 6 * 48 = 288 >= 250
/// assert_eq!(plan.boxes, 3);        // 3 * 100 = 300 >= 250
/// assert_eq!(plan.cartons, 1);
/// ```
pub fn compute_setup(total_pieces: u32, params: &SetupParams) -> Result<SetupPlan> {
    params.validate()?;

    let sheets = total_pieces.div_ceil(params.pieces_per_sheet);
    let boxes = total_pieces.div_ceil(params.pieces_per_box);
    let cartons = boxes.div_ceil(params.boxes_per_carton);

    Ok(SetupPlan {
        total_pieces,
        sheets,
        last_sheet_leftover: sheets * params.pieces_per_sheet - total_pieces,
        boxes,
        last_box_slack: boxes * params.pieces_per_box - total_pieces,
        cartons,
    })
}
