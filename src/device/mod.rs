//! Device connectivity: reconnect state machine and command vocabulary.

pub mod commands;
pub mod manager;
pub mod reconnect;

pub use commands::{CommandEnvelope, DeviceKind, PickPlaceCommand, RouterCommand, TylerCommand};
pub use manager::{DeviceManager, DeviceTransport, TcpJsonTransport};
pub use reconnect::{DeviceLink, LinkAction, LinkState, ReconnectPolicy};
