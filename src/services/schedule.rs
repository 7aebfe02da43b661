//! Production planner: greedy day-by-day capacity packing.
//!
//! Given the open orders and a daily piece capacity, the planner lays the
//! orders front-to-back onto consecutive production days. An order may span
//! days; a day may hold pieces from several orders. The input ordering is
//! totalized (due date, then creation time, then id) so the plan is fully
//! deterministic.

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Order;

/// Pieces of one order produced on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAssignment {
    /// Order the pieces belong to.
    pub order_id: Uuid,
    /// Customer, carried for display.
    pub customer: String,
    /// Pieces of this order produced on this day.
    pub pieces: u32,
}

/// One production day in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDay {
    /// Calendar date of the production day.
    pub date: NaiveDate,
    /// Assignments worked on this day, in plan order.
    pub assignments: Vec<DayAssignment>,
    /// Pieces of the daily capacity left unused.
    pub slack: u32,
}

/// Completion forecast for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForecast {
    /// Order id.
    pub order_id: Uuid,
    /// Customer, carried for display.
    pub customer: String,
    /// Total pieces in the order.
    pub total_pieces: u32,
    /// Day the last piece is produced.
    pub completion_date: NaiveDate,
    /// Requested due date, if any.
    pub due_date: Option<NaiveDate>,
    /// True if the completion date is after the due date.
    pub late: bool,
}

/// A complete production plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// Daily piece capacity the plan was computed with.
    pub daily_capacity: u32,
    /// First production day.
    pub start_date: NaiveDate,
    /// Day-by-day assignments. Empty when there are no open orders.
    pub days: Vec<PlanDay>,
    /// Per-order completion forecast, in scheduling order.
    pub forecasts: Vec<OrderForecast>,
}

impl ProductionPlan {
    /// Forecasts that land after their due date.
    #[must_use]
    pub fn late_orders(&self) -> Vec<&OrderForecast> {
        self.forecasts.iter().filter(|f| f.late).collect()
    }
}

/// Computes a production plan for the given orders.
///
/// Orders are scheduled by due date (orders without one go last), ties
/// broken by creation time, then id.
///
/// # Errors
///
/// Returns an error if `daily_capacity` is zero.
pub fn compute_plan(
    orders: &[&Order],
    daily_capacity: u32,
    start_date: NaiveDate,
) -> Result<ProductionPlan> {
    if daily_capacity == 0 {
        anyhow::bail!("Daily capacity must be positive");
    }

    let mut queue: Vec<&Order> = orders.to_vec();
    queue.sort_by(|a, b| {
        // None due dates sort after every concrete date.
        let due = match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        };
        due.then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });

    let mut days: Vec<PlanDay> = Vec::new();
    let mut forecasts: Vec<OrderForecast> = Vec::new();
    let mut day_index: i64 = 0;
    let mut remaining_today = daily_capacity;

    for order in queue {
        let mut remaining_pieces = order.total_pieces();
        let mut completion_date = start_date;

        while remaining_pieces > 0 {
            if remaining_today == 0 {
                day_index += 1;
                remaining_today = daily_capacity;
            }

            let date = start_date + Duration::days(day_index);
            let produced = remaining_pieces.min(remaining_today);
            remaining_pieces -= produced;
            remaining_today -= produced;
            completion_date = date;

            if days.last().is_none_or(|day| day.date != date) {
                days.push(PlanDay {
                    date,
                    assignments: Vec::new(),
                    slack: 0,
                });
            }
            if let Some(day) = days.last_mut() {
                day.assignments.push(DayAssignment {
                    order_id: order.id,
                    customer: order.customer.clone(),
                    pieces: produced,
                });
            }
        }

        forecasts.push(OrderForecast {
            order_id: order.id,
            customer: order.customer.clone(),
            total_pieces: order.total_pieces(),
            completion_date,
            due_date: order.due_date,
            late: order.due_date.is_some_and(|due| completion_date > due),
        });
    }

    // Slack only means something on the last day; earlier days are full by
    // construction. Still, compute it per day from the assignments.
    for day in &mut days {
        let used: u32 = day.assignments.iter().map(|a| a.pieces).sum();
        day.slack = daily_capacity - used;
    }

    Ok(ProductionPlan {
        daily_capacity,
        start_date,
        days,
        forecasts,
    })
}
