//! Injection and capture subsystem behind a capability interface.
//!
//! Everything here works on raw screen coordinates, independent of UI
//! structure. The real backend drives the OS through enigo (input) and
//! screenshots (capture); the recording backend stands in for it in tests
//! and dry runs.

use std::io::Cursor;
use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use screenshots::Screen;
use screenshots::image::ImageOutputFormat;
use serde::{Deserialize, Serialize};

use crate::config::InputConfig;
use crate::error::{Error, Result};

/// Settle delay between moving the pointer and pressing a button.
const MOVE_SETTLE: Duration = Duration::from_millis(50);

/// Pause between the two clicks of an injected double-click.
const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(50);

/// Mouse buttons understood by the injection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
	Left,
	Right,
	Middle,
}

impl From<MouseButton> for Button {
	fn from(button: MouseButton) -> Self {
		match button {
			MouseButton::Left => Button::Left,
			MouseButton::Right => Button::Right,
			MouseButton::Middle => Button::Middle,
		}
	}
}

impl std::str::FromStr for MouseButton {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		match s.to_ascii_lowercase().as_str() {
			"left" => Ok(MouseButton::Left),
			"right" => Ok(MouseButton::Right),
			"middle" => Ok(MouseButton::Middle),
			other => Err(Error::Injection(format!("unknown mouse button: {other}"))),
		}
	}
}

impl std::fmt::Display for MouseButton {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			MouseButton::Left => write!(f, "left"),
			MouseButton::Right => write!(f, "right"),
			MouseButton::Middle => write!(f, "middle"),
		}
	}
}

/// Captured frame from the primary monitor, PNG-encoded.
#[derive(Debug, Clone)]
pub struct Screenshot {
	pub png: Vec<u8>,
	pub width: u32,
	pub height: u32,
}

impl Screenshot {
	/// Encodes the PNG bytes as base64 for data transport.
	pub fn to_base64(&self) -> String {
		use base64::Engine;
		base64::engine::general_purpose::STANDARD.encode(&self.png)
	}
}

/// Primary monitor bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScreenInfo {
	pub width: u32,
	pub height: u32,
}

/// Synthesizes input and captures the screen at raw coordinates.
#[async_trait]
pub trait InputBackend: Send + Sync {
	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()>;
	async fn double_click(&self, x: i32, y: i32) -> Result<()>;
	async fn type_text(&self, text: &str) -> Result<()>;
	async fn press_key(&self, key: &str) -> Result<()>;
	async fn hotkey(&self, keys: &[String]) -> Result<()>;
	async fn screenshot(&self) -> Result<Screenshot>;
	async fn screen_info(&self) -> Result<ScreenInfo>;
}

/// Backend driving the OS through enigo and screenshots.
///
/// enigo handles are not `Send` on every platform, so each call constructs
/// its controller inside the blocking task rather than holding one.
pub struct NativeBackend {
	config: InputConfig,
}

impl NativeBackend {
	pub fn new(config: InputConfig) -> Self {
		Self { config }
	}
}

#[async_trait]
impl InputBackend for NativeBackend {
	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()> {
		let pause = Duration::from_millis(self.config.click_pause_ms);
		run_blocking(move || {
			let mut enigo = new_controller()?;
			enigo.move_mouse(x, y, Coordinate::Abs).map_err(stringify)?;
			thread::sleep(MOVE_SETTLE);
			enigo.button(button.into(), Direction::Click).map_err(stringify)?;
			thread::sleep(pause);
			Ok(())
		})
		.await
		.map_err(Error::Injection)
	}

	async fn double_click(&self, x: i32, y: i32) -> Result<()> {
		let pause = Duration::from_millis(self.config.click_pause_ms);
		run_blocking(move || {
			let mut enigo = new_controller()?;
			enigo.move_mouse(x, y, Coordinate::Abs).map_err(stringify)?;
			thread::sleep(MOVE_SETTLE);
			enigo.button(Button::Left, Direction::Click).map_err(stringify)?;
			thread::sleep(DOUBLE_CLICK_GAP);
			enigo.button(Button::Left, Direction::Click).map_err(stringify)?;
			thread::sleep(pause);
			Ok(())
		})
		.await
		.map_err(Error::Injection)
	}

	async fn type_text(&self, text: &str) -> Result<()> {
		let text = text.to_string();
		let interval = Duration::from_millis(self.config.typing_interval_ms);
		run_blocking(move || {
			let mut enigo = new_controller()?;
			if interval.is_zero() {
				return enigo.text(&text).map_err(stringify);
			}
			for ch in text.chars() {
				enigo.key(Key::Unicode(ch), Direction::Click).map_err(stringify)?;
				thread::sleep(interval);
			}
			Ok(())
		})
		.await
		.map_err(Error::Injection)
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		let parsed = parse_key(key)?;
		run_blocking(move || {
			let mut enigo = new_controller()?;
			enigo.key(parsed, Direction::Click).map_err(stringify)
		})
		.await
		.map_err(Error::Injection)
	}

	async fn hotkey(&self, keys: &[String]) -> Result<()> {
		let parsed = keys.iter().map(|k| parse_key(k)).collect::<Result<Vec<_>>>()?;
		run_blocking(move || {
			let mut enigo = new_controller()?;

			// Hold every modifier, tap the final key, release in reverse.
			for key in parsed.iter().take(parsed.len().saturating_sub(1)) {
				enigo.key(*key, Direction::Press).map_err(stringify)?;
			}
			if let Some(last) = parsed.last() {
				enigo.key(*last, Direction::Click).map_err(stringify)?;
			}
			for key in parsed.iter().rev().skip(1) {
				enigo.key(*key, Direction::Release).map_err(stringify)?;
			}

			Ok(())
		})
		.await
		.map_err(Error::Injection)
	}

	async fn screenshot(&self) -> Result<Screenshot> {
		run_blocking(|| {
			let screen = primary_screen()?;
			let image = screen.capture().map_err(stringify)?;
			let (width, height) = (image.width(), image.height());

			let mut buffer = Cursor::new(Vec::new());
			image.write_to(&mut buffer, ImageOutputFormat::Png).map_err(stringify)?;

			Ok(Screenshot {
				png: buffer.into_inner(),
				width,
				height,
			})
		})
		.await
		.map_err(Error::Screenshot)
	}

	async fn screen_info(&self) -> Result<ScreenInfo> {
		run_blocking(|| {
			let screen = primary_screen()?;
			Ok(ScreenInfo {
				width: screen.display_info.width,
				height: screen.display_info.height,
			})
		})
		.await
		.map_err(Error::Screenshot)
	}
}

/// Runs a blocking OS call on the worker pool so the cooperative scheduler
/// is never stalled by input synthesis or capture.
async fn run_blocking<F, T>(f: F) -> std::result::Result<T, String>
where
	F: FnOnce() -> std::result::Result<T, String> + Send + 'static,
	T: Send + 'static,
{
	tokio::task::spawn_blocking(f).await.map_err(|e| e.to_string())?
}

fn new_controller() -> std::result::Result<Enigo, String> {
	Enigo::new(&Settings::default()).map_err(|e| format!("input controller unavailable: {e}"))
}

fn primary_screen() -> std::result::Result<Screen, String> {
	let screens = Screen::all().map_err(|e| e.to_string())?;
	screens
		.into_iter()
		.find(|s| s.display_info.is_primary)
		.or_else(|| Screen::all().ok()?.into_iter().next())
		.ok_or_else(|| "no monitor found".to_string())
}

fn stringify<E: std::fmt::Display>(err: E) -> String {
	err.to_string()
}

/// Parses a key name into an enigo key. Named keys first, then any single
/// character falls through as a unicode keystroke.
fn parse_key(key: &str) -> Result<Key> {
	let parsed = match key.to_ascii_lowercase().as_str() {
		"enter" | "return" => Key::Return,
		"tab" => Key::Tab,
		"space" => Key::Space,
		"backspace" => Key::Backspace,
		"delete" | "del" => Key::Delete,
		"escape" | "esc" => Key::Escape,
		"home" => Key::Home,
		"end" => Key::End,
		"pageup" => Key::PageUp,
		"pagedown" => Key::PageDown,
		"up" => Key::UpArrow,
		"down" => Key::DownArrow,
		"left" => Key::LeftArrow,
		"right" => Key::RightArrow,
		"ctrl" | "control" => Key::Control,
		"alt" => Key::Alt,
		"shift" => Key::Shift,
		"meta" | "cmd" | "command" | "win" | "super" => Key::Meta,
		"f1" => Key::F1,
		"f2" => Key::F2,
		"f3" => Key::F3,
		"f4" => Key::F4,
		"f5" => Key::F5,
		"f6" => Key::F6,
		"f7" => Key::F7,
		"f8" => Key::F8,
		"f9" => Key::F9,
		"f10" => Key::F10,
		"f11" => Key::F11,
		"f12" => Key::F12,
		s => {
			let mut chars = s.chars();
			match (chars.next(), chars.next()) {
				(Some(ch), None) => Key::Unicode(ch),
				_ => return Err(Error::InvalidKey(key.to_string())),
			}
		}
	};

	Ok(parsed)
}

/// Backend that records calls instead of touching the OS.
///
/// Stands in for the real subsystem in tests and `--dry-run` invocations;
/// spatial calls succeed and report canned screen data.
#[derive(Default)]
pub struct RecordingBackend {
	calls: parking_lot::Mutex<Vec<RecordedCall>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
	Click { x: i32, y: i32, button: MouseButton },
	DoubleClick { x: i32, y: i32 },
	TypeText(String),
	PressKey(String),
	Hotkey(Vec<String>),
	Screenshot,
}

impl RecordingBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Everything invoked so far, in call order.
	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}

	fn record(&self, call: RecordedCall) {
		self.calls.lock().push(call);
	}
}

#[async_trait]
impl InputBackend for RecordingBackend {
	async fn click(&self, x: i32, y: i32, button: MouseButton) -> Result<()> {
		self.record(RecordedCall::Click { x, y, button });
		Ok(())
	}

	async fn double_click(&self, x: i32, y: i32) -> Result<()> {
		self.record(RecordedCall::DoubleClick { x, y });
		Ok(())
	}

	async fn type_text(&self, text: &str) -> Result<()> {
		self.record(RecordedCall::TypeText(text.to_string()));
		Ok(())
	}

	async fn press_key(&self, key: &str) -> Result<()> {
		self.record(RecordedCall::PressKey(key.to_string()));
		Ok(())
	}

	async fn hotkey(&self, keys: &[String]) -> Result<()> {
		self.record(RecordedCall::Hotkey(keys.to_vec()));
		Ok(())
	}

	async fn screenshot(&self) -> Result<Screenshot> {
		self.record(RecordedCall::Screenshot);
		Ok(Screenshot {
			png: Vec::new(),
			width: 1920,
			height: 1080,
		})
	}

	async fn screen_info(&self) -> Result<ScreenInfo> {
		Ok(ScreenInfo {
			width: 1920,
			height: 1080,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn named_keys_parse() {
		assert!(matches!(parse_key("enter").unwrap(), Key::Return));
		assert!(matches!(parse_key("ESC").unwrap(), Key::Escape));
		assert!(matches!(parse_key("win").unwrap(), Key::Meta));
		assert!(matches!(parse_key("f5").unwrap(), Key::F5));
	}

	#[test]
	fn single_characters_parse_as_unicode() {
		assert!(matches!(parse_key("a").unwrap(), Key::Unicode('a')));
		assert!(matches!(parse_key("7").unwrap(), Key::Unicode('7')));
	}

	#[test]
	fn unknown_key_names_are_rejected() {
		assert!(matches!(parse_key("warpcore"), Err(Error::InvalidKey(_))));
		assert!(matches!(parse_key(""), Err(Error::InvalidKey(_))));
	}

	#[test]
	fn mouse_buttons_parse_from_strings() {
		assert_eq!("LEFT".parse::<MouseButton>().unwrap(), MouseButton::Left);
		assert_eq!("middle".parse::<MouseButton>().unwrap(), MouseButton::Middle);
		assert!("fourth".parse::<MouseButton>().is_err());
	}

	#[tokio::test]
	async fn recording_backend_captures_call_order() {
		let backend = RecordingBackend::new();
		backend.click(10, 20, MouseButton::Left).await.unwrap();
		backend.type_text("hi").await.unwrap();
		backend.hotkey(&["ctrl".to_string(), "c".to_string()]).await.unwrap();

		assert_eq!(
			backend.calls(),
			vec![
				RecordedCall::Click {
					x: 10,
					y: 20,
					button: MouseButton::Left
				},
				RecordedCall::TypeText("hi".to_string()),
				RecordedCall::Hotkey(vec!["ctrl".to_string(), "c".to_string()]),
			]
		);
	}

	#[test]
	fn screenshot_base64_encodes_the_png_bytes() {
		let shot = Screenshot {
			png: vec![1, 2, 3],
			width: 1,
			height: 1,
		};
		assert_eq!(shot.to_base64(), "AQID");
	}

	#[tokio::test]
	async fn recording_backend_reports_canned_screen() {
		let backend = RecordingBackend::new();
		let info = backend.screen_info().await.unwrap();
		assert_eq!((info.width, info.height), (1920, 1080));

		let shot = backend.screenshot().await.unwrap();
		assert_eq!((shot.width, shot.height), (1920, 1080));
		assert_eq!(backend.calls(), vec![RecordedCall::Screenshot]);
	}
}
