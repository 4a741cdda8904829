//! Lifecycle of the external driver executable.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::probe::fetch_driver_status;
use crate::process::port_available;
use crate::{Result, RuntimeError};

/// Interval between readiness probes after spawning the driver. The HTTP
/// listener is not guaranteed up when the process is, so startup polls
/// instead of sleeping a fixed delay.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);
const READY_MAX_ATTEMPTS: u32 = 10;
const PROBE_TIMEOUT: Duration = Duration::from_millis(400);
const STOP_WAIT: Duration = Duration::from_secs(5);

/// Owns the driver executable's process handle for one automation run.
///
/// The child process belongs exclusively to the supervisor that spawned it;
/// at most one driver is started per input surface.
pub struct DriverSupervisor {
	path: PathBuf,
	port: u16,
	child: Option<Child>,
}

impl DriverSupervisor {
	pub fn new(path: impl Into<PathBuf>, port: u16) -> Self {
		Self {
			path: path.into(),
			port,
			child: None,
		}
	}

	/// Returns `true` while a spawned child process is owned.
	pub fn is_running(&self) -> bool {
		self.child.is_some()
	}

	/// Launches the driver and waits for its HTTP listener to come up.
	///
	/// Returns `Ok(true)` when the endpoint should be reachable - either the
	/// spawned child answered the status probe, or the port was already
	/// served by an externally managed driver. A missing executable is a
	/// soft failure (`Ok(false)`): the caller logs and continues with
	/// coordinate injection only.
	pub async fn start(&mut self) -> Result<bool> {
		if self.child.is_some() {
			return Ok(true);
		}

		if !port_available(self.port) {
			debug!(
				target = "wad.driver",
				port = self.port,
				"port already served; assuming externally managed driver"
			);
			return Ok(true);
		}

		if !self.path.exists() {
			warn!(
				target = "wad.driver",
				path = %self.path.display(),
				"driver executable not found; continuing without UI Automation"
			);
			return Ok(false);
		}

		let mut child = Command::new(&self.path)
			.stdin(Stdio::null())
			.stdout(Stdio::null())
			.stderr(Stdio::null())
			.spawn()
			.map_err(|source| RuntimeError::Spawn {
				path: self.path.clone(),
				source,
			})?;

		let mut last_reason = "endpoint not reachable".to_string();
		for _ in 0..READY_MAX_ATTEMPTS {
			tokio::time::sleep(READY_POLL_INTERVAL).await;

			if let Ok(Some(status)) = child.try_wait() {
				return Err(RuntimeError::EarlyExit { status });
			}

			match fetch_driver_status(self.port, PROBE_TIMEOUT).await {
				Ok(_) => {
					debug!(target = "wad.driver", port = self.port, "driver ready");
					self.child = Some(child);
					return Ok(true);
				}
				Err(err) => last_reason = err.to_string(),
			}
		}

		// The listener never came up; reclaim the process before reporting.
		let _ = child.start_kill();
		let _ = child.wait().await;
		Err(RuntimeError::NotReady {
			port: self.port,
			reason: last_reason,
		})
	}

	/// Terminates the driver and waits a bounded time for it to exit.
	///
	/// Never fails: an already-exited child or an expired wait are logged and
	/// treated as successful-enough cleanup.
	pub async fn stop(&mut self) {
		let Some(mut child) = self.child.take() else {
			return;
		};

		if let Err(err) = child.start_kill() {
			debug!(target = "wad.driver", error = %err, "driver already exited");
		}

		match tokio::time::timeout(STOP_WAIT, child.wait()).await {
			Ok(Ok(status)) => debug!(target = "wad.driver", %status, "driver stopped"),
			Ok(Err(err)) => debug!(target = "wad.driver", error = %err, "driver wait failed"),
			Err(_) => warn!(
				target = "wad.driver",
				"driver did not exit within {}s; proceeding", STOP_WAIT.as_secs()
			),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn free_port() -> u16 {
		let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
		listener.local_addr().unwrap().port()
	}

	#[cfg(unix)]
	fn system_binary(name: &str) -> Option<PathBuf> {
		["/bin", "/usr/bin"]
			.iter()
			.map(|dir| PathBuf::from(dir).join(name))
			.find(|path| path.exists())
	}

	#[tokio::test]
	async fn missing_executable_is_a_soft_failure() {
		let mut supervisor = DriverSupervisor::new("/nonexistent/WinAppDriver.exe", free_port());
		assert!(!supervisor.start().await.unwrap());
		assert!(!supervisor.is_running());
	}

	#[tokio::test]
	async fn busy_port_means_external_driver() {
		let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
		let port = listener.local_addr().unwrap().port();

		let mut supervisor = DriverSupervisor::new("/nonexistent/WinAppDriver.exe", port);
		assert!(supervisor.start().await.unwrap());
		assert!(!supervisor.is_running());
	}

	#[tokio::test]
	async fn stop_without_child_is_a_noop() {
		let mut supervisor = DriverSupervisor::new("/nonexistent/WinAppDriver.exe", free_port());
		supervisor.stop().await;
		supervisor.stop().await;
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn child_dying_during_startup_is_early_exit() {
		let Some(path) = system_binary("false") else {
			return;
		};

		let mut supervisor = DriverSupervisor::new(path, free_port());
		let err = supervisor.start().await.unwrap_err();
		assert!(matches!(err, RuntimeError::EarlyExit { .. }));
		assert!(!supervisor.is_running());
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn silent_child_times_out_as_not_ready() {
		// `yes` keeps running but never opens the port.
		let Some(path) = system_binary("yes") else {
			return;
		};

		let mut supervisor = DriverSupervisor::new(path, free_port());
		let err = supervisor.start().await.unwrap_err();
		assert!(matches!(err, RuntimeError::NotReady { .. }));
		assert!(!supervisor.is_running());
	}
}
