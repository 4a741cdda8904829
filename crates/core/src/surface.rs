//! Desktop control strategies and the per-call fallback router.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};
use wad_runtime::DriverSupervisor;

use crate::backend::{InputBackend, MouseButton, ScreenInfo, Screenshot};
use crate::client::DriverClient;
use crate::config::BridgeConfig;
use crate::error::{Error, Result};

/// Connection lifecycle of a surface instance.
///
/// Whether the structured driver path is live is a sub-flag of `Connected`
/// (see [`AutomationSurface::driver_active`]); the surface is usable either
/// way. Teardown always passes through `Disconnecting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
	Disconnected,
	Connecting,
	Connected,
	Disconnecting,
}

/// Capability interface over one controlled desktop.
///
/// One logical caller per instance; concurrent calls on the same surface are
/// not a supported configuration.
#[async_trait]
pub trait DesktopSurface: Send {
	async fn connect(&mut self) -> Result<()>;

	/// Safe to call in any state, including after a partially completed
	/// connect; every acquired resource gets a release attempt.
	async fn disconnect(&mut self) -> Result<()>;

	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()>;
	async fn double_click(&self, x: i32, y: i32) -> Result<()>;
	async fn type_text(&self, text: &str) -> Result<()>;
	async fn press_key(&self, key: &str) -> Result<()>;
	async fn hotkey(&self, keys: &[String]) -> Result<()>;
	async fn screenshot(&self) -> Result<Screenshot>;
	async fn screen_info(&self) -> Result<ScreenInfo>;
	fn is_connected(&self) -> bool;
}

/// Builds the strategy for a configuration: UI-Automation-preferred when the
/// driver is enabled, coordinate-only otherwise.
pub fn surface_for(config: BridgeConfig, backend: Arc<dyn InputBackend>) -> Box<dyn DesktopSurface> {
	if config.driver.enabled {
		Box::new(AutomationSurface::new(config, backend))
	} else {
		Box::new(CoordinateSurface::new(backend))
	}
}

/// Strategy that never consults UI Automation: every spatial operation is
/// raw coordinate injection.
pub struct CoordinateSurface {
	backend: Arc<dyn InputBackend>,
	state: SurfaceState,
}

impl CoordinateSurface {
	pub fn new(backend: Arc<dyn InputBackend>) -> Self {
		Self {
			backend,
			state: SurfaceState::Disconnected,
		}
	}

	fn ensure_connected(&self) -> Result<()> {
		match self.state {
			SurfaceState::Connected => Ok(()),
			_ => Err(Error::NotConnected),
		}
	}
}

#[async_trait]
impl DesktopSurface for CoordinateSurface {
	async fn connect(&mut self) -> Result<()> {
		self.state = SurfaceState::Connecting;
		self.state = SurfaceState::Connected;
		Ok(())
	}

	async fn disconnect(&mut self) -> Result<()> {
		self.state = SurfaceState::Disconnecting;
		self.state = SurfaceState::Disconnected;
		Ok(())
	}

	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()> {
		self.ensure_connected()?;
		self.backend.click(x, y, button).await
	}

	async fn double_click(&self, x: i32, y: i32) -> Result<()> {
		self.ensure_connected()?;
		self.backend.double_click(x, y).await
	}

	async fn type_text(&self, text: &str) -> Result<()> {
		self.ensure_connected()?;
		self.backend.type_text(text).await
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		self.ensure_connected()?;
		self.backend.press_key(key).await
	}

	async fn hotkey(&self, keys: &[String]) -> Result<()> {
		self.ensure_connected()?;
		self.backend.hotkey(keys).await
	}

	async fn screenshot(&self) -> Result<Screenshot> {
		self.ensure_connected()?;
		self.backend.screenshot().await
	}

	async fn screen_info(&self) -> Result<ScreenInfo> {
		self.ensure_connected()?;
		self.backend.screen_info().await
	}

	fn is_connected(&self) -> bool {
		self.state == SurfaceState::Connected
	}
}

/// Strategy preferring structured element clicks, with per-call fallback to
/// coordinate injection.
///
/// Left-clicks try element resolution through the driver session first; a
/// miss injects silently, a transport error injects or propagates according
/// to [`DriverConfig::fallback_on_failure`](crate::config::DriverConfig).
/// Everything non-spatial goes straight to the injection backend - the
/// structured layer has no text or key primitives.
pub struct AutomationSurface {
	config: BridgeConfig,
	backend: Arc<dyn InputBackend>,
	client: Option<DriverClient>,
	supervisor: Option<DriverSupervisor>,
	state: SurfaceState,
}

impl AutomationSurface {
	pub fn new(config: BridgeConfig, backend: Arc<dyn InputBackend>) -> Self {
		Self {
			config,
			backend,
			client: None,
			supervisor: None,
			state: SurfaceState::Disconnected,
		}
	}

	/// Whether the structured driver path is live for this run. The surface
	/// stays fully usable when it is not.
	pub fn driver_active(&self) -> bool {
		self.client.as_ref().is_some_and(|c| c.session_id().is_some())
	}

	fn ensure_connected(&self) -> Result<()> {
		match self.state {
			SurfaceState::Connected => Ok(()),
			_ => Err(Error::NotConnected),
		}
	}

	/// Attempts a driver-side click. `Ok(true)` means the element path
	/// handled it; `Ok(false)` means no element was found and the caller
	/// should inject.
	async fn try_element_click(
		&self,
		client: &DriverClient,
		x: i32,
		y: i32,
		double: bool,
	) -> Result<bool> {
		let Some(element) = client.element_from_point(x, y).await? else {
			debug!(target = "wad", x, y, "no element at point; injecting");
			return Ok(false);
		};

		if double {
			element.double_click().await?;
		} else {
			element.click().await?;
		}
		debug!(target = "wad", x, y, double, "element click dispatched");
		Ok(true)
	}

	/// Per-call routing. Resolution fully completes (found, miss, or error)
	/// before any fallback injection; the two paths never run concurrently
	/// for one call.
	async fn route(&self, x: i32, y: i32, button: MouseButton, double: bool) -> Result<()> {
		// The structured path only defines left-click semantics.
		if button == MouseButton::Left {
			if let Some(client) = &self.client {
				match self.try_element_click(client, x, y, double).await {
					Ok(true) => return Ok(()),
					Ok(false) => {}
					Err(err) if self.config.driver.fallback_on_failure => {
						warn!(
							target = "wad",
							error = %err,
							"driver click failed; falling back to injection"
						);
					}
					Err(err) => return Err(err),
				}
			}
		}

		if double {
			self.backend.double_click(x, y).await
		} else {
			self.backend.click(x, y, button).await
		}
	}
}

#[async_trait]
impl DesktopSurface for AutomationSurface {
	async fn connect(&mut self) -> Result<()> {
		self.state = SurfaceState::Connecting;

		if self.config.driver.enabled {
			if self.config.driver.auto_start {
				let mut supervisor =
					DriverSupervisor::new(self.config.driver.path.clone(), self.config.driver.port);
				match supervisor.start().await {
					Ok(true) => self.supervisor = Some(supervisor),
					Ok(false) => {}
					Err(err) => {
						warn!(
							target = "wad",
							error = %err,
							"driver failed to start; continuing with coordinate injection"
						);
					}
				}
			}

			let mut client = DriverClient::new(
				self.config.driver.port,
				Duration::from_millis(self.config.driver.timeout_ms),
			);
			match client.create_session().await {
				Ok(()) => {
					info!(
						target = "wad",
						port = self.config.driver.port,
						"UI Automation session established"
					);
					self.client = Some(client);
				}
				// No mid-run retry: element resolution stays off until the
				// next connect.
				Err(err) => {
					warn!(
						target = "wad",
						error = %err,
						"driver unavailable; using coordinate injection only"
					);
				}
			}
		}

		self.state = SurfaceState::Connected;
		Ok(())
	}

	async fn disconnect(&mut self) -> Result<()> {
		self.state = SurfaceState::Disconnecting;

		// Order matters: protocol session first, then the driver process.
		// Each step runs even if an earlier one failed.
		if let Some(mut client) = self.client.take() {
			client.close_session().await;
		}

		if let Some(mut supervisor) = self.supervisor.take() {
			supervisor.stop().await;
		}

		self.state = SurfaceState::Disconnected;
		Ok(())
	}

	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()> {
		self.ensure_connected()?;
		self.route(x, y, button, false).await
	}

	async fn double_click(&self, x: i32, y: i32) -> Result<()> {
		self.ensure_connected()?;
		self.route(x, y, MouseButton::Left, true).await
	}

	async fn type_text(&self, text: &str) -> Result<()> {
		self.ensure_connected()?;
		self.backend.type_text(text).await
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		self.ensure_connected()?;
		self.backend.press_key(key).await
	}

	async fn hotkey(&self, keys: &[String]) -> Result<()> {
		self.ensure_connected()?;
		self.backend.hotkey(keys).await
	}

	async fn screenshot(&self) -> Result<Screenshot> {
		self.ensure_connected()?;
		self.backend.screenshot().await
	}

	async fn screen_info(&self) -> Result<ScreenInfo> {
		self.ensure_connected()?;
		self.backend.screen_info().await
	}

	fn is_connected(&self) -> bool {
		self.state == SurfaceState::Connected
	}
}
