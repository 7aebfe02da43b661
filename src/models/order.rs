//! Production orders and their status lifecycle.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a production order.
///
/// The legal transitions form a straight line from `Draft` to `Shipped`,
/// with `Cancelled` reachable from every state except `Shipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order entered but not yet confirmed by the customer.
    Draft,
    /// Confirmed and waiting for a production slot.
    Confirmed,
    /// Currently on the production floor.
    InProduction,
    /// Production finished, awaiting shipment.
    Completed,
    /// Shipped to the customer. Terminal.
    Shipped,
    /// Cancelled. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Returns true if `next` is a legal transition from this status.
    #[must_use]
    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::{Cancelled, Completed, Confirmed, Draft, InProduction, Shipped};
        match (self, next) {
            (Draft, Confirmed)
            | (Confirmed, InProduction)
            | (InProduction, Completed)
            | (Completed, Shipped) => true,
            (Draft | Confirmed | InProduction | Completed, Cancelled) => true,
            _ => false,
        }
    }

    /// Returns true if the order still consumes production capacity.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, OrderStatus::Confirmed | OrderStatus::InProduction)
    }

    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Shipped | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::InProduction => "In production",
            OrderStatus::Completed => "Completed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(OrderStatus::Draft),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "in_production" | "in-production" | "production" => Ok(OrderStatus::InProduction),
            "completed" => Ok(OrderStatus::Completed),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => anyhow::bail!(
                "Unknown order status '{other}'. Expected one of: draft, confirmed, \
                 in_production, completed, shipped, cancelled"
            ),
        }
    }
}

/// A production order for one design at a given grid size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order id.
    pub id: Uuid,
    /// Customer name.
    pub customer: String,
    /// Name of the design being produced.
    pub design: String,
    /// Pieces along the horizontal axis.
    pub width: u32,
    /// Pieces along the vertical axis.
    pub height: u32,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Requested completion date, if the customer set one.
    pub due_date: Option<NaiveDate>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new draft order.
    ///
    /// # Errors
    ///
    /// Returns an error if either grid dimension is zero, or if the grid
    /// holds more pieces than the count can represent.
    pub fn new(
        customer: impl Into<String>,
        design: impl Into<String>,
        width: u32,
        height: u32,
        due_date: Option<NaiveDate>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            anyhow::bail!("Order grid dimensions must be positive (got {width}x{height})");
        }
        if width.checked_mul(height).is_none() {
            anyhow::bail!("Order grid is too large ({width}x{height} exceeds the piece limit)");
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            customer: customer.into(),
            design: design.into(),
            width,
            height,
            status: OrderStatus::Draft,
            due_date,
            created_at: now,
            updated_at: now,
        })
    }

    /// Total number of pieces the order requires.
    ///
    /// `new` rejects grids whose product overflows; saturation only guards
    /// against hand-edited store files.
    #[must_use]
    pub const fn total_pieces(&self) -> u32 {
        self.width.saturating_mul(self.height)
    }

    /// Moves the order to a new status, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not legal.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            anyhow::bail!(
                "Illegal status transition: {} -> {} for order {}",
                self.status,
                next,
                self.id
            );
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
