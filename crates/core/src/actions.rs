//! High-level actions with structured outcomes.
//!
//! Wraps a surface so callers (CLI, agents) get a report for every action -
//! a success flag plus details or an error message, never a silent no-op.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::backend::MouseButton;
use crate::error::Result;
use crate::surface::DesktopSurface;

/// Settle pauses for the Start-menu launch sequence.
const LAUNCH_MENU_DELAY: Duration = Duration::from_millis(500);
const LAUNCH_TYPE_DELAY: Duration = Duration::from_millis(300);
const LAUNCH_START_DELAY: Duration = Duration::from_millis(1000);

/// Outcome of one action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
	pub success: bool,
	pub action: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ActionReport {
	fn ok(action: &str, details: serde_json::Value) -> Self {
		Self {
			success: true,
			action: action.to_string(),
			details: Some(details),
			error: None,
		}
	}

	fn failed(action: &str, error: impl std::fmt::Display) -> Self {
		Self {
			success: false,
			action: action.to_string(),
			details: None,
			error: Some(error.to_string()),
		}
	}
}

/// Drives a surface and folds failures into reports.
pub struct Actions {
	surface: Box<dyn DesktopSurface>,
	screenshots_dir: PathBuf,
}

impl Actions {
	pub fn new(surface: Box<dyn DesktopSurface>, screenshots_dir: impl Into<PathBuf>) -> Self {
		Self {
			surface,
			screenshots_dir: screenshots_dir.into(),
		}
	}

	pub fn surface(&self) -> &dyn DesktopSurface {
		self.surface.as_ref()
	}

	pub async fn connect(&mut self) -> Result<()> {
		self.surface.connect().await
	}

	pub async fn disconnect(&mut self) -> Result<()> {
		self.surface.disconnect().await
	}

	pub async fn click(&self, x: i32, y: i32, button: MouseButton, double: bool) -> ActionReport {
		let action = if double { "double_click" } else { "click" };
		let outcome = if double {
			self.surface.double_click(x, y).await
		} else {
			self.surface.click(x, y, button).await
		};

		match outcome {
			Ok(()) => ActionReport::ok(action, json!({"x": x, "y": y, "button": button})),
			Err(err) => ActionReport::failed(action, err),
		}
	}

	pub async fn type_text(&self, text: &str) -> ActionReport {
		match self.surface.type_text(text).await {
			Ok(()) => ActionReport::ok("type_text", json!({"length": text.chars().count()})),
			Err(err) => ActionReport::failed("type_text", err),
		}
	}

	pub async fn press_key(&self, key: &str) -> ActionReport {
		match self.surface.press_key(key).await {
			Ok(()) => ActionReport::ok("press_key", json!({"key": key})),
			Err(err) => ActionReport::failed("press_key", err),
		}
	}

	pub async fn hotkey(&self, keys: &[String]) -> ActionReport {
		match self.surface.hotkey(keys).await {
			Ok(()) => ActionReport::ok("hotkey", json!({"keys": keys})),
			Err(err) => ActionReport::failed("hotkey", err),
		}
	}

	/// Captures the primary monitor. With `output` the PNG goes to that path;
	/// with `save` alone it goes to a timestamped file under the configured
	/// screenshots directory.
	pub async fn screenshot(&self, save: bool, output: Option<&Path>) -> ActionReport {
		let shot = match self.surface.screenshot().await {
			Ok(shot) => shot,
			Err(err) => return ActionReport::failed("screenshot", err),
		};

		let mut details = json!({"width": shot.width, "height": shot.height});

		let target = match output {
			Some(path) => Some(path.to_path_buf()),
			None if save => Some(self.screenshots_dir.join(format!("screenshot_{}.png", now_millis()))),
			None => None,
		};

		if let Some(path) = target {
			if let Some(parent) = path.parent() {
				if let Err(err) = tokio::fs::create_dir_all(parent).await {
					return ActionReport::failed("screenshot", err);
				}
			}
			if let Err(err) = tokio::fs::write(&path, &shot.png).await {
				return ActionReport::failed("screenshot", err);
			}
			debug!(target = "wad", path = %path.display(), "screenshot saved");
			details["path"] = json!(path);
		}

		ActionReport::ok("screenshot", details)
	}

	/// Launches an application through Start-menu search: open the menu,
	/// type the name, press enter, with settle pauses between steps.
	pub async fn launch(&self, app: &str) -> ActionReport {
		let sequence = async {
			self.surface.press_key("win").await?;
			tokio::time::sleep(LAUNCH_MENU_DELAY).await;
			self.surface.type_text(app).await?;
			tokio::time::sleep(LAUNCH_TYPE_DELAY).await;
			self.surface.press_key("enter").await?;
			tokio::time::sleep(LAUNCH_START_DELAY).await;
			Ok::<_, crate::Error>(())
		};

		match sequence.await {
			Ok(()) => ActionReport::ok("launch", json!({"app": app})),
			Err(err) => ActionReport::failed("launch", err),
		}
	}

	/// Sleeps for the given duration and reports it.
	pub async fn wait(&self, duration: Duration) -> ActionReport {
		tokio::time::sleep(duration).await;
		ActionReport::ok("wait", json!({"seconds": duration.as_secs_f64()}))
	}
}

fn now_millis() -> u128 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::backend::{InputBackend, RecordedCall, RecordingBackend};
	use crate::surface::CoordinateSurface;

	async fn recording_actions(dir: &Path) -> (Actions, Arc<RecordingBackend>) {
		let backend = Arc::new(RecordingBackend::new());
		let mut actions = Actions::new(
			Box::new(CoordinateSurface::new(
				Arc::clone(&backend) as Arc<dyn InputBackend>
			)),
			dir,
		);
		actions.connect().await.unwrap();
		(actions, backend)
	}

	#[tokio::test]
	async fn click_report_carries_coordinates() {
		let dir = tempfile::tempdir().unwrap();
		let (actions, backend) = recording_actions(dir.path()).await;

		let report = actions.click(11, 22, MouseButton::Right, false).await;
		assert!(report.success);
		assert_eq!(report.action, "click");
		assert_eq!(report.details.unwrap()["button"], "right");
		assert_eq!(
			backend.calls(),
			vec![RecordedCall::Click {
				x: 11,
				y: 22,
				button: MouseButton::Right
			}]
		);
	}

	#[tokio::test]
	async fn failures_become_reports_not_panics() {
		let backend = Arc::new(RecordingBackend::new());
		// Never connected: every action must fail with a structured report.
		let actions = Actions::new(
			Box::new(CoordinateSurface::new(backend as Arc<dyn InputBackend>)),
			"screenshots",
		);

		let report = actions.type_text("hello").await;
		assert!(!report.success);
		assert_eq!(report.error.as_deref(), Some("not connected"));
	}

	#[tokio::test]
	async fn screenshot_saves_to_explicit_output() {
		let dir = tempfile::tempdir().unwrap();
		let (actions, _) = recording_actions(dir.path()).await;

		let output = dir.path().join("frame.png");
		let report = actions.screenshot(false, Some(&output)).await;
		assert!(report.success);
		assert!(output.exists());
		assert_eq!(report.details.unwrap()["width"], 1920);
	}

	#[tokio::test]
	async fn screenshot_save_flag_uses_timestamped_name() {
		let dir = tempfile::tempdir().unwrap();
		let (actions, _) = recording_actions(dir.path()).await;

		let report = actions.screenshot(true, None).await;
		assert!(report.success);
		let saved: PathBuf =
			serde_json::from_value(report.details.unwrap()["path"].clone()).unwrap();
		assert!(saved.starts_with(dir.path()));
		assert!(saved.file_name().unwrap().to_str().unwrap().starts_with("screenshot_"));
	}

	#[tokio::test]
	async fn launch_presses_menu_types_name_presses_enter() {
		let dir = tempfile::tempdir().unwrap();
		let (actions, backend) = recording_actions(dir.path()).await;

		let report = actions.launch("Calculator").await;
		assert!(report.success);
		assert_eq!(
			backend.calls(),
			vec![
				RecordedCall::PressKey("win".to_string()),
				RecordedCall::TypeText("Calculator".to_string()),
				RecordedCall::PressKey("enter".to_string()),
			]
		);
	}
}
