//! Typed command vocabulary for the embedded device controllers.
//!
//! The pick-and-place machine, the RoboTyler paint robot, and the defect
//! router each accept a closed set of commands. They are modeled as tagged
//! serde enums so the wire format is explicit JSON and every dispatch site
//! is an exhaustive `match` instead of a string-keyed table.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The device controllers the dashboard can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    /// Pick-and-place machine placing pieces onto the grid.
    PickPlace,
    /// "RoboTyler" paint robot.
    PaintRobot,
    /// Defect-ejection router.
    Router,
}

impl DeviceKind {
    /// All known device kinds, in display order.
    pub const ALL: [DeviceKind; 3] = [
        DeviceKind::PickPlace,
        DeviceKind::PaintRobot,
        DeviceKind::Router,
    ];
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DeviceKind::PickPlace => "Pick & Place",
            DeviceKind::PaintRobot => "RoboTyler",
            DeviceKind::Router => "Router",
        };
        write!(f, "{label}")
    }
}

impl std::str::FromStr for DeviceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pick_place" | "pick-place" | "pickplace" => Ok(DeviceKind::PickPlace),
            "paint_robot" | "paint-robot" | "robotyler" => Ok(DeviceKind::PaintRobot),
            "router" => Ok(DeviceKind::Router),
            other => anyhow::bail!(
                "Unknown device '{other}'. Expected one of: pick_place, paint_robot, router"
            ),
        }
    }
}

/// Commands understood by the pick-and-place machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum PickPlaceCommand {
    /// Home all axes.
    Home,
    /// Pause after the current placement.
    Pause,
    /// Resume a paused run.
    Resume,
    /// Place a piece at a grid cell.
    Place {
        /// Grid row.
        row: u32,
        /// Grid column.
        col: u32,
    },
    /// Abort the run and park the head.
    Abort,
}

/// Commands understood by the RoboTyler paint robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum TylerCommand {
    /// Prime the spray lines.
    Prime,
    /// Start a spray pass over the current tray.
    StartPass {
        /// Hex color being sprayed, for the operator log.
        color: String,
    },
    /// Stop spraying immediately.
    Stop,
    /// Run the nozzle-cleaning cycle.
    Clean,
}

/// Commands understood by the defect-ejection router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RouterCommand {
    /// Arm the ejector.
    Arm,
    /// Disarm the ejector.
    Disarm,
    /// Eject the piece currently in the gate.
    Eject,
    /// Set the defect-detection sensitivity (0-100).
    SetSensitivity {
        /// Sensitivity percentage.
        percent: u8,
    },
}

/// A command addressed to a specific device, as sent over the wire.
///
/// Serializes as `{"device": "...", "payload": {"command": "...", ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "device", content = "payload", rename_all = "snake_case")]
pub enum CommandEnvelope {
    /// Command for the pick-and-place machine.
    PickPlace(PickPlaceCommand),
    /// Command for the paint robot.
    PaintRobot(TylerCommand),
    /// Command for the defect router.
    Router(RouterCommand),
}

impl CommandEnvelope {
    /// The device this command is addressed to.
    #[must_use]
    pub const fn device(&self) -> DeviceKind {
        match self {
            CommandEnvelope::PickPlace(_) => DeviceKind::PickPlace,
            CommandEnvelope::PaintRobot(_) => DeviceKind::PaintRobot,
            CommandEnvelope::Router(_) => DeviceKind::Router,
        }
    }

    /// Validates command parameters that the type system cannot enforce.
    ///
    /// # Errors
    ///
    /// Returns an error for out-of-range parameters.
    pub fn validate(&self) -> Result<()> {
        match self {
            CommandEnvelope::Router(RouterCommand::SetSensitivity { percent }) => {
                if *percent > 100 {
                    anyhow::bail!("Sensitivity must be 0-100 (got {percent})");
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
