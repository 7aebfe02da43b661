//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calc::SetupParams;
use crate::device::ReconnectPolicy;

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding the order data file. Defaults to the platform data
    /// directory when unset.
    pub data_dir: Option<PathBuf>,
}

/// Shop floor configuration: material constants and production capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Pieces the floor can produce per day.
    pub daily_capacity: u32,
    /// Setup/packaging material constants.
    #[serde(default)]
    pub setup: SetupParams,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            daily_capacity: 2000,
            setup: SetupParams::default(),
        }
    }
}

/// Device connectivity configuration.
///
/// Endpoints are the WebSocket URLs of the embedded controllers; the delay
/// fields tune the shared reconnect state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Pick-and-place controller endpoint.
    pub pick_place_url: String,
    /// RoboTyler paint robot endpoint.
    pub paint_robot_url: String,
    /// Defect router endpoint.
    pub router_url: String,
    /// Backoff delay before the first reconnect attempt, in milliseconds.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Upper bound on the backoff delay, in milliseconds.
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Heartbeat interval while connected, in seconds.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

/// Default first-retry delay (500ms).
fn default_base_delay_ms() -> u64 {
    500
}

/// Default backoff cap (30s).
fn default_max_delay_ms() -> u64 {
    30_000
}

/// Default heartbeat interval (5s).
fn default_heartbeat_secs() -> u64 {
    5
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            pick_place_url: "ws://pickplace.local:9100/control".to_string(),
            paint_robot_url: "ws://robotyler.local:9100/control".to_string(),
            router_url: "ws://router.local:9100/control".to_string(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

impl DeviceConfig {
    /// Builds the reconnect policy described by this configuration.
    #[must_use]
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs),
            // Give a device three missed heartbeats before declaring it dead.
            heartbeat_timeout: Duration::from_secs(self.heartbeat_secs * 3),
            ..ReconnectPolicy::default()
        }
    }
}

/// UI preferences configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Display help on startup
    pub show_help_on_startup: bool,
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help_on_startup: true,
            theme_mode: ThemeMode::default(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Opsdeck/config.toml`
/// - macOS: `~/Library/Application Support/Opsdeck/config.toml`
/// - Windows: `%APPDATA%\Opsdeck\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Shop floor settings
    #[serde(default)]
    pub shop: ShopConfig,
    /// Device connectivity settings
    #[serde(default)]
    pub devices: DeviceConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_file_path()
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("Opsdeck");

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolves the directory holding order data.
    ///
    /// Uses `paths.data_dir` when set, otherwise the platform data
    /// directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.paths.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .context("Failed to determine data directory")?
            .join("Opsdeck");
        Ok(data_dir)
    }

    /// Full path of the order data file.
    pub fn orders_file_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("orders.json"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using temp file + rename for atomicity.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, path).context(format!(
            "Failed to rename temp config file to: {}",
            path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - `data_dir` parent exists when an explicit directory is set
    /// - shop capacity and setup constants are positive
    /// - backoff delays are sane (base <= max, both positive)
    pub fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.paths.data_dir {
            if let Some(parent) = data_dir.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    anyhow::bail!(
                        "Data directory parent does not exist: {}",
                        parent.display()
                    );
                }
            }
        }

        if self.shop.daily_capacity == 0 {
            anyhow::bail!("Shop daily_capacity must be positive");
        }
        self.shop.setup.validate()?;

        if self.devices.base_delay_ms == 0 {
            anyhow::bail!("Device base_delay_ms must be positive");
        }
        if self.devices.max_delay_ms < self.devices.base_delay_ms {
            anyhow::bail!("Device max_delay_ms must be >= base_delay_ms");
        }
        if self.devices.heartbeat_secs == 0 {
            anyhow::bail!("Device heartbeat_secs must be positive");
        }

        Ok(())
    }
}
