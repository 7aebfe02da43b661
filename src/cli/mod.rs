//! CLI command handlers for Opsdeck.
//!
//! This module provides headless, scriptable access to Opsdeck's core
//! functionality for automation, testing, and CI/CD integration.

pub mod calc;
pub mod common;
pub mod orders;
pub mod plan;
#[cfg(feature = "web")]
pub mod serve;
pub mod setup;

// Re-export types used by main.rs and tests
pub use calc::CalcArgs;
pub use common::ExitCode;
pub use orders::OrdersArgs;
pub use plan::PlanArgs;
#[cfg(feature = "web")]
pub use serve::ServeArgs;
pub use setup::SetupArgs;
