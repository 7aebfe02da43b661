//! Color-distribution command.

use clap::Args;

use crate::calc::{compute_distribution, parse_dimension};
use crate::cli::common::{CliError, CliResult};
use crate::models::Design;

/// Compute the per-color piece distribution for a design and grid size
#[derive(Debug, Clone, Args)]
pub struct CalcArgs {
    /// Name of a stock design to use
    #[arg(long, value_name = "NAME", conflicts_with = "colors")]
    pub design: Option<String>,

    /// Ad hoc palette as comma-separated hex codes (e.g. "#FF0000,#00FF00")
    #[arg(long, value_name = "HEX,...")]
    pub colors: Option<String>,

    /// Grid width in pieces
    #[arg(long, value_name = "N")]
    pub width: String,

    /// Grid height in pieces
    #[arg(long, value_name = "N")]
    pub height: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl CalcArgs {
    /// Execute the calc command
    pub fn execute(&self) -> CliResult<()> {
        let design = self.resolve_design()?;

        let width = parse_dimension("Width", &self.width)
            .map_err(|e| CliError::validation(e.to_string()))?;
        let height = parse_dimension("Height", &self.height)
            .map_err(|e| CliError::validation(e.to_string()))?;
        let total = width
            .checked_mul(height)
            .ok_or_else(|| CliError::validation("Grid is too large"))?;

        let dist = compute_distribution(design.colors(), total)
            .map_err(|e| CliError::validation(e.to_string()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&dist)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
        } else {
            println!(
                "{}: {}x{} = {} pieces across {} colors",
                design.name, width, height, total, dist.color_count
            );
            println!(
                "Base {} per color, {} color(s) adjusted by {}",
                dist.base_pieces_per_color, dist.adjustment_count, dist.adjustment_type
            );
            for share in &dist.distribution {
                println!("  {}  {:>6}", share.color, share.count);
            }
        }

        Ok(())
    }

    /// Resolves the palette from `--design` or `--colors`.
    fn resolve_design(&self) -> CliResult<Design> {
        if let Some(list) = &self.colors {
            return Design::from_hex_list("Ad hoc palette", list)
                .map_err(|e| CliError::validation(e.to_string()));
        }

        let name = self
            .design
            .as_deref()
            .ok_or_else(|| CliError::validation("Either --design or --colors is required"))?;

        Design::stock_catalog()
            .into_iter()
            .find(|design| design.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known = Design::stock_catalog()
                    .iter()
                    .map(|d| d.name.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                CliError::validation(format!("Unknown design '{name}'. Stock designs: {known}"))
            })
    }
}
