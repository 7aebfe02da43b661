//! Setup/packaging command.

use clap::Args;

use crate::calc::{compute_setup, SetupParams};
use crate::cli::common::{CliError, CliResult};
use crate::config::Config;

/// Compute sheet, box, and carton counts for a piece total
#[derive(Debug, Clone, Args)]
pub struct SetupArgs {
    /// Total number of pieces
    #[arg(long, value_name = "N")]
    pub pieces: u32,

    /// Override pieces punched per sheet
    #[arg(long, value_name = "N")]
    pub pieces_per_sheet: Option<u32>,

    /// Override pieces packed per box
    #[arg(long, value_name = "N")]
    pub pieces_per_box: Option<u32>,

    /// Override boxes per shipping carton
    #[arg(long, value_name = "N")]
    pub boxes_per_carton: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl SetupArgs {
    /// Execute the setup command
    pub fn execute(&self) -> CliResult<()> {
        // Start from the configured shop constants, then apply overrides.
        let config = Config::load().unwrap_or_default();
        let mut params = config.shop.setup;
        if let Some(v) = self.pieces_per_sheet {
            params.pieces_per_sheet = v;
        }
        if let Some(v) = self.pieces_per_box {
            params.pieces_per_box = v;
        }
        if let Some(v) = self.boxes_per_carton {
            params.boxes_per_carton = v;
        }

        let plan = compute_setup(self.pieces, &params)
            .map_err(|e| CliError::validation(e.to_string()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            print_plan(&plan, &params);
        }

        Ok(())
    }
}

/// Human-readable plan output.
fn print_plan(plan: &crate::calc::SetupPlan, params: &SetupParams) {
    println!("Setup for {} pieces:", plan.total_pieces);
    println!(
        "  Sheets:  {:>5}  ({} pieces/sheet, {} left on last sheet)",
        plan.sheets, params.pieces_per_sheet, plan.last_sheet_leftover
    );
    println!(
        "  Boxes:   {:>5}  ({} pieces/box, {} open slots in last box)",
        plan.boxes, params.pieces_per_box, plan.last_box_slack
    );
    println!(
        "  Cartons: {:>5}  ({} boxes/carton)",
        plan.cartons, params.boxes_per_carton
    );
}
