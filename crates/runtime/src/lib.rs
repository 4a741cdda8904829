//! WinAppDriver process lifecycle: launch, readiness probing, teardown.

use std::path::PathBuf;

pub mod probe;
pub mod process;
pub mod supervisor;

pub use probe::{DriverStatus, fetch_driver_status};
pub use supervisor::DriverSupervisor;

/// Errors from driver process management.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
	#[error("failed to spawn driver at {path}: {source}")]
	Spawn {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("driver exited during startup (status: {status})")]
	EarlyExit { status: std::process::ExitStatus },

	#[error("driver endpoint not reachable on port {port}: {reason}")]
	NotReady { port: u16, reason: String },

	#[error("status probe failed: {0}")]
	Probe(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
