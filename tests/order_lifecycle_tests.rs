//! Integration tests for the order store and production planner: persistence
//! across reopen, lifecycle enforcement, and planning from the stored book.

use chrono::NaiveDate;
use opsdeck::models::{Order, OrderStatus};
use opsdeck::services::{compute_plan, OrderStore};
use tempfile::TempDir;

fn order(customer: &str, width: u32, height: u32, due: Option<&str>) -> Order {
    let due_date = due.map(|s| s.parse::<NaiveDate>().unwrap());
    Order::new(customer, "Harbor Blues", width, height, due_date).unwrap()
}

#[test]
fn test_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json");

    let id = {
        let mut store = OrderStore::open(&path).unwrap();
        let order = order("Acme", 10, 10, Some("2026-09-15"));
        let id = order.id;
        store.add(order).unwrap();
        store.set_status(id, OrderStatus::Confirmed).unwrap();
        assert_eq!(store.revision(), 2);
        id
    };

    let store = OrderStore::open(&path).unwrap();
    assert_eq!(store.revision(), 2);
    let reloaded = store.get(id).unwrap();
    assert_eq!(reloaded.customer, "Acme");
    assert_eq!(reloaded.status, OrderStatus::Confirmed);
    assert_eq!(
        reloaded.due_date,
        Some("2026-09-15".parse::<NaiveDate>().unwrap())
    );
}

#[test]
fn test_illegal_transition_leaves_store_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.json");
    let mut store = OrderStore::open(&path).unwrap();

    let o = order("Acme", 5, 5, None);
    let id = o.id;
    store.add(o).unwrap();
    let revision = store.revision();

    // Draft cannot jump straight to Shipped
    assert!(store.set_status(id, OrderStatus::Shipped).is_err());
    assert_eq!(store.revision(), revision);
    assert_eq!(store.get(id).unwrap().status, OrderStatus::Draft);
}

#[test]
fn test_cancelled_orders_leave_the_plan() {
    let dir = TempDir::new().unwrap();
    let mut store = OrderStore::open(dir.path().join("orders.json")).unwrap();

    let keep = order("Keeper", 10, 10, None);
    let drop = order("Dropper", 10, 10, None);
    let keep_id = keep.id;
    let drop_id = drop.id;
    store.add(keep).unwrap();
    store.add(drop).unwrap();
    store.set_status(keep_id, OrderStatus::Confirmed).unwrap();
    store.set_status(drop_id, OrderStatus::Confirmed).unwrap();
    store.set_status(drop_id, OrderStatus::Cancelled).unwrap();

    let open = store.open_orders();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].customer, "Keeper");
}

#[test]
fn test_plan_from_stored_orders_flags_late_work() {
    let dir = TempDir::new().unwrap();
    let mut store = OrderStore::open(dir.path().join("orders.json")).unwrap();

    // 200 pieces due tomorrow, but only 50/day of capacity
    let o = order("Tight", 20, 10, Some("2026-08-25"));
    let id = o.id;
    store.add(o).unwrap();
    store.set_status(id, OrderStatus::Confirmed).unwrap();

    let start: NaiveDate = "2026-08-24".parse().unwrap();
    let plan = compute_plan(&store.open_orders(), 50, start).unwrap();

    assert_eq!(plan.days.len(), 4);
    assert_eq!(plan.forecasts.len(), 1);
    assert!(plan.forecasts[0].late);
    assert_eq!(plan.late_orders().len(), 1);

    let produced: u32 = plan
        .days
        .iter()
        .flat_map(|d| d.assignments.iter())
        .map(|a| a.pieces)
        .sum();
    assert_eq!(produced, 200);
}

#[test]
fn test_due_dates_drive_production_order() {
    let dir = TempDir::new().unwrap();
    let mut store = OrderStore::open(dir.path().join("orders.json")).unwrap();

    let later = order("Later", 10, 10, Some("2026-09-30"));
    let sooner = order("Sooner", 10, 10, Some("2026-09-01"));
    let undated = order("Undated", 10, 10, None);
    for o in [later, sooner, undated] {
        let id = o.id;
        store.add(o).unwrap();
        store.set_status(id, OrderStatus::Confirmed).unwrap();
    }

    let start: NaiveDate = "2026-08-24".parse().unwrap();
    let plan = compute_plan(&store.open_orders(), 1000, start).unwrap();

    let sequence: Vec<&str> = plan.days[0]
        .assignments
        .iter()
        .map(|a| a.customer.as_str())
        .collect();
    assert_eq!(sequence, vec!["Sooner", "Later", "Undated"]);
}
