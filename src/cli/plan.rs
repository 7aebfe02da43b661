//! Production planning command.

use chrono::Utc;
use clap::Args;

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::services::{compute_plan, OrderStore};

/// Plan production days for the open orders
#[derive(Debug, Clone, Args)]
pub struct PlanArgs {
    /// Daily piece capacity (defaults to the configured shop capacity)
    #[arg(long, value_name = "N")]
    pub capacity: Option<u32>,

    /// First production day (YYYY-MM-DD, defaults to today)
    #[arg(long, value_name = "DATE")]
    pub start: Option<String>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    /// Execute the plan command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e}")))?;
        let orders_path = config
            .orders_file_path()
            .map_err(|e| CliError::io(e.to_string()))?;
        let store = OrderStore::open(orders_path)
            .map_err(|e| CliError::io(format!("Failed to open order store: {e}")))?;

        let capacity = self.capacity.unwrap_or(config.shop.daily_capacity);
        let start = self
            .start
            .as_deref()
            .map(|s| {
                s.parse::<chrono::NaiveDate>().map_err(|_| {
                    CliError::validation(format!("Invalid start date '{s}'. Expected YYYY-MM-DD"))
                })
            })
            .transpose()?
            .unwrap_or_else(|| Utc::now().date_naive());

        let plan = compute_plan(&store.open_orders(), capacity, start)
            .map_err(|e| CliError::validation(e.to_string()))?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&plan)
                    .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
            );
            return Ok(());
        }

        if plan.days.is_empty() {
            println!("No open orders to plan.");
            return Ok(());
        }

        println!(
            "Plan from {} at {} pieces/day:",
            plan.start_date, plan.daily_capacity
        );
        for day in &plan.days {
            println!("{}  (slack {})", day.date, day.slack);
            for assignment in &day.assignments {
                println!("    {:<20} {:>6} pcs", assignment.customer, assignment.pieces);
            }
        }

        println!("\nForecast:");
        for forecast in &plan.forecasts {
            let flag = if forecast.late { "  LATE" } else { "" };
            let due = forecast
                .due_date
                .map_or_else(|| "-".to_string(), |d| d.to_string());
            println!(
                "  {:<20} done {}  due {}{}",
                forecast.customer, forecast.completion_date, due, flag
            );
        }

        Ok(())
    }
}
