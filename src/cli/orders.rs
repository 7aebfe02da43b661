//! Order management commands.

use clap::{Args, Subcommand};
use uuid::Uuid;

use crate::cli::common::{CliError, CliResult};
use crate::config::Config;
use crate::models::{Order, OrderStatus};
use crate::services::OrderStore;

/// Manage production orders
#[derive(Debug, Clone, Args)]
pub struct OrdersArgs {
    /// Order operation to run
    #[command(subcommand)]
    pub action: OrdersAction,
}

/// Order operations.
#[derive(Debug, Clone, Subcommand)]
pub enum OrdersAction {
    /// List orders
    List {
        /// Only show orders with this status
        #[arg(long, value_name = "STATUS")]
        status: Option<String>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a new draft order
    Add {
        /// Customer name
        #[arg(long)]
        customer: String,

        /// Design name
        #[arg(long)]
        design: String,

        /// Grid width in pieces
        #[arg(long, value_name = "N")]
        width: u32,

        /// Grid height in pieces
        #[arg(long, value_name = "N")]
        height: u32,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        due: Option<String>,

        /// Output the created order as JSON
        #[arg(long)]
        json: bool,
    },
    /// Move an order to a new status
    Status {
        /// Order id
        #[arg(value_name = "ID")]
        id: String,

        /// Target status (draft, confirmed, in_production, completed, shipped, cancelled)
        #[arg(value_name = "STATUS")]
        status: String,
    },
    /// Remove an order
    Remove {
        /// Order id
        #[arg(value_name = "ID")]
        id: String,
    },
}

impl OrdersArgs {
    /// Execute the orders command
    pub fn execute(&self) -> CliResult<()> {
        let config = Config::load().map_err(|e| CliError::io(format!("Failed to load config: {e}")))?;
        let orders_path = config
            .orders_file_path()
            .map_err(|e| CliError::io(e.to_string()))?;
        let mut store = OrderStore::open(orders_path)
            .map_err(|e| CliError::io(format!("Failed to open order store: {e}")))?;

        match &self.action {
            OrdersAction::List { status, json } => {
                let filter = status
                    .as_deref()
                    .map(str::parse::<OrderStatus>)
                    .transpose()
                    .map_err(|e| CliError::validation(e.to_string()))?;

                let orders: Vec<&Order> = match filter {
                    Some(status) => store.list_by_status(status),
                    None => store.list().iter().collect(),
                };

                if *json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&orders)
                            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
                    );
                } else if orders.is_empty() {
                    println!("No orders.");
                } else {
                    for order in orders {
                        let due = order
                            .due_date
                            .map_or_else(|| "-".to_string(), |d| d.to_string());
                        println!(
                            "{}  {:<14} {:<20} {:>4}x{:<4} {:>7} pcs  due {}",
                            order.id,
                            order.status.to_string(),
                            order.customer,
                            order.width,
                            order.height,
                            order.total_pieces(),
                            due
                        );
                    }
                }
            }
            OrdersAction::Add {
                customer,
                design,
                width,
                height,
                due,
                json,
            } => {
                let due_date = due
                    .as_deref()
                    .map(|s| {
                        s.parse::<chrono::NaiveDate>().map_err(|_| {
                            CliError::validation(format!("Invalid due date '{s}'. Expected YYYY-MM-DD"))
                        })
                    })
                    .transpose()?;

                let order = Order::new(customer, design, *width, *height, due_date)
                    .map_err(|e| CliError::validation(e.to_string()))?;
                println!("{}", persist_new_order(&mut store, order, *json)?);
            }
            OrdersAction::Status { id, status } => {
                let id = parse_id(id)?;
                let status: OrderStatus = status
                    .parse()
                    .map_err(|e: anyhow::Error| CliError::validation(e.to_string()))?;

                let order = store
                    .set_status(id, status)
                    .map_err(|e| CliError::validation(e.to_string()))?;
                println!("Order {} is now {}", order.id, order.status);
            }
            OrdersAction::Remove { id } => {
                let id = parse_id(id)?;
                let removed = store
                    .remove(id)
                    .map_err(|e| CliError::validation(e.to_string()))?;
                println!("Removed order {} ({})", removed.id, removed.customer);
            }
        }

        Ok(())
    }
}

/// Saves a new order, returning the confirmation to print.
///
/// The order is persisted before any output is produced, so a failed write
/// never reports success.
fn persist_new_order(store: &mut OrderStore, order: Order, json: bool) -> CliResult<String> {
    let rendered = if json {
        serde_json::to_string_pretty(&order)
            .map_err(|e| CliError::io(format!("Failed to serialize JSON: {e}")))?
    } else {
        format!("Created order {}", order.id)
    };
    store
        .add(order)
        .map_err(|e| CliError::io(format!("Failed to save order: {e}")))?;
    Ok(rendered)
}

/// Parses an order id argument.
fn parse_id(raw: &str) -> CliResult<Uuid> {
    raw.parse()
        .map_err(|_| CliError::validation(format!("Invalid order id '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_persist_new_order_saves_before_reporting() {
        let temp = TempDir::new().unwrap();
        let mut store = OrderStore::open(temp.path().join("orders.json")).unwrap();
        let order = Order::new("Acme", "Sunset Mosaic", 4, 4, None).unwrap();
        let id = order.id;

        let message = persist_new_order(&mut store, order, false).unwrap();
        // The confirmation is only handed back once the store has the order.
        assert_eq!(message, format!("Created order {id}"));
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_persist_new_order_json_output() {
        let temp = TempDir::new().unwrap();
        let mut store = OrderStore::open(temp.path().join("orders.json")).unwrap();
        let order = Order::new("Acme", "Harbor Blues", 8, 8, None).unwrap();

        let rendered = persist_new_order(&mut store, order, true).unwrap();
        let parsed: Order = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.customer, "Acme");
        assert_eq!(store.list().len(), 1);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
    }
}
