//! Opsdeck Library
//!
//! This library provides core functionality for the Opsdeck manufacturing
//! dashboard: color distribution apportionment, setup and packaging math,
//! the order book, production planning, and device connectivity.

// Module declarations
pub mod calc;
pub mod cli;
pub mod config;
pub mod constants;
pub mod device;
pub mod models;
pub mod services;
pub mod tui;
#[cfg(feature = "web")]
pub mod web;
