//! Order repository backed by a JSON document.
//!
//! All order persistence goes through `OrderStore` so file paths, atomic
//! writes, and error messages stay consistent. The store keeps a revision
//! counter that is bumped on every mutation; panels and API clients compare
//! revisions to detect staleness instead of re-reading the whole document.
//! Consistency is last-write-wins, nothing stronger.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{Order, OrderStatus};

/// On-disk document holding every order plus the revision counter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct OrderDocument {
    /// Monotonically increasing change counter.
    revision: u64,
    /// All orders, in insertion order.
    orders: Vec<Order>,
}

/// File-backed order repository.
#[derive(Debug)]
pub struct OrderStore {
    path: PathBuf,
    document: OrderDocument,
}

impl OrderStore {
    /// Opens the store at `path`, creating an empty document if the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read order file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse order file: {}", path.display()))?
        } else {
            OrderDocument::default()
        };
        Ok(Self { path, document })
    }

    /// Current revision. Bumped by every successful mutation.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.document.revision
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All orders in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Order] {
        &self.document.orders
    }

    /// Orders matching the given status.
    #[must_use]
    pub fn list_by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.document
            .orders
            .iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Orders that still consume production capacity (confirmed or in
    /// production), the planner's input set.
    #[must_use]
    pub fn open_orders(&self) -> Vec<&Order> {
        self.document
            .orders
            .iter()
            .filter(|order| order.status.is_open())
            .collect()
    }

    /// Looks up an order by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Order> {
        self.document.orders.iter().find(|order| order.id == id)
    }

    /// Adds a new order and persists the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn add(&mut self, order: Order) -> Result<()> {
        self.document.orders.push(order);
        self.commit()
    }

    /// Replaces an existing order wholesale and persists the document.
    ///
    /// # Errors
    ///
    /// Returns an error if no order with that id exists or the write fails.
    pub fn update(&mut self, order: Order) -> Result<()> {
        let slot = self
            .document
            .orders
            .iter_mut()
            .find(|existing| existing.id == order.id)
            .with_context(|| format!("No order with id {}", order.id))?;
        *slot = order;
        self.commit()
    }

    /// Moves an order to a new status, validating the transition, and
    /// persists the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown, the transition is illegal,
    /// or the write fails.
    pub fn set_status(&mut self, id: Uuid, status: OrderStatus) -> Result<&Order> {
        let index = self
            .document
            .orders
            .iter()
            .position(|order| order.id == id)
            .with_context(|| format!("No order with id {id}"))?;
        self.document.orders[index].transition_to(status)?;
        self.commit()?;
        Ok(&self.document.orders[index])
    }

    /// Removes an order and persists the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is unknown or the write fails.
    pub fn remove(&mut self, id: Uuid) -> Result<Order> {
        let index = self
            .document
            .orders
            .iter()
            .position(|order| order.id == id)
            .with_context(|| format!("No order with id {id}"))?;
        let removed = self.document.orders.remove(index);
        self.commit()?;
        Ok(removed)
    }

    /// Bumps the revision and writes the document atomically.
    ///
    /// Uses the temp file + rename pattern so the file is never left in a
    /// corrupted state.
    fn commit(&mut self) -> Result<()> {
        self.document.revision += 1;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create data directory: {}", parent.display())
            })?;
        }

        let content = serde_json::to_string_pretty(&self.document)
            .context("Failed to serialize order document")?;

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp order file: {}", temp_path.display())
        })?;
        fs::rename(&temp_path, &self.path).with_context(|| {
            format!("Failed to rename temp order file to: {}", self.path.display())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> OrderStore {
        OrderStore::open(dir.path().join("orders.json")).unwrap()
    }

    fn sample_order() -> Order {
        Order::new("Acme Corp", "Sunset Mosaic", 10, 8, None).unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.revision(), 0);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_add_and_reload() {
        let dir = TempDir::new().unwrap();
        let order = sample_order();
        let id = order.id;

        let mut store = store_in(&dir);
        store.add(order).unwrap();
        assert_eq!(store.revision(), 1);

        let reloaded = store_in(&dir);
        assert_eq!(reloaded.revision(), 1);
        assert_eq!(reloaded.get(id).unwrap().customer, "Acme Corp");
    }

    #[test]
    fn test_revision_bumps_on_every_mutation() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let order = sample_order();
        let id = order.id;
        store.add(order).unwrap();
        store.set_status(id, OrderStatus::Confirmed).unwrap();
        store.remove(id).unwrap();
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_set_status_validates_transition() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let order = sample_order();
        let id = order.id;
        store.add(order).unwrap();

        // Draft cannot jump straight to Completed.
        assert!(store.set_status(id, OrderStatus::Completed).is_err());
        // Failed transition must not bump the revision.
        assert_eq!(store.revision(), 1);

        let updated = store.set_status(id, OrderStatus::Confirmed).unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);
    }

    #[test]
    fn test_unknown_id_errors() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let ghost = Uuid::new_v4();
        assert!(store.set_status(ghost, OrderStatus::Confirmed).is_err());
        assert!(store.remove(ghost).is_err());
        assert!(store.get(ghost).is_none());
    }

    #[test]
    fn test_update_replaces_order() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let mut order = sample_order();
        let id = order.id;
        store.add(order.clone()).unwrap();

        order.customer = "Globex".to_string();
        store.update(order).unwrap();
        assert_eq!(store.get(id).unwrap().customer, "Globex");
    }

    #[test]
    fn test_filters() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        let a = sample_order();
        let b = sample_order();
        let b_id = b.id;
        store.add(a).unwrap();
        store.add(b).unwrap();
        store.set_status(b_id, OrderStatus::Confirmed).unwrap();

        assert_eq!(store.list_by_status(OrderStatus::Draft).len(), 1);
        assert_eq!(store.list_by_status(OrderStatus::Confirmed).len(), 1);
        assert_eq!(store.open_orders().len(), 1);
        assert_eq!(store.open_orders()[0].id, b_id);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("orders.json");
        fs::write(&path, "not json").unwrap();
        assert!(OrderStore::open(&path).is_err());
    }
}
