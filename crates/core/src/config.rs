//! Bridge configuration, constructed explicitly and passed down.
//!
//! There is deliberately no process-wide configuration getter: callers build
//! a [`BridgeConfig`] (from CLI flags, a file, or defaults) and hand it to
//! the surface constructor.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default WinAppDriver listening port.
pub const DEFAULT_DRIVER_PORT: u16 = 4723;

/// Default WinAppDriver install location.
pub const DEFAULT_DRIVER_PATH: &str =
	r"C:\Program Files (x86)\Windows Application Driver\WinAppDriver.exe";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
	pub driver: DriverConfig,
	pub input: InputConfig,
}

/// Settings for the UI Automation driver and its fallback policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
	/// Attempt UI Automation at all. `false` forces coordinate-only mode.
	pub enabled: bool,
	pub path: PathBuf,
	pub port: u16,
	/// Launch the driver executable on connect.
	pub auto_start: bool,
	/// Per-request timeout for protocol calls, in milliseconds.
	pub timeout_ms: u64,
	/// Inject at coordinates when a transport error interrupts element
	/// resolution, instead of surfacing the error to the caller.
	pub fallback_on_failure: bool,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			path: PathBuf::from(DEFAULT_DRIVER_PATH),
			port: DEFAULT_DRIVER_PORT,
			auto_start: true,
			timeout_ms: 10_000,
			fallback_on_failure: true,
		}
	}
}

impl DriverConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

/// Pacing for synthesized input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
	/// Settle pause after each injected click, in milliseconds.
	pub click_pause_ms: u64,
	/// Delay between typed characters, in milliseconds. Zero sends the whole
	/// string in one call.
	pub typing_interval_ms: u64,
}

impl Default for InputConfig {
	fn default() -> Self {
		Self {
			click_pause_ms: 100,
			typing_interval_ms: 0,
		}
	}
}
