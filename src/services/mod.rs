//! Service layer for business logic.
//!
//! This module contains services that encapsulate persistence and planning
//! logic and coordinate between different parts of the application.

pub mod orders;
pub mod schedule;

// Re-export commonly used types and functions
pub use orders::OrderStore;
pub use schedule::{compute_plan, ProductionPlan};
