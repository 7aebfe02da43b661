//! Pure calculators: color apportionment and setup/packaging math.

pub mod apportionment;
pub mod setup;

pub use apportionment::{compute_distribution, parse_dimension};
pub use setup::{compute_setup, SetupParams, SetupPlan};
