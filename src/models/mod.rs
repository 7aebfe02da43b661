//! Data models for designs, orders, and piece distributions.
//!
//! This module contains all the core data structures used throughout the application.
//! Models are designed to be independent of UI and business logic.

pub mod color;
pub mod design;
pub mod distribution;
pub mod order;

// Re-export all model types
pub use color::PieceColor;
pub use design::Design;
pub use distribution::{AdjustmentType, ColorDistribution, ColorShare};
pub use order::{Order, OrderStatus};
