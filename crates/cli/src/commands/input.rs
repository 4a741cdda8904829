//! Keyboard input commands: type, key, hotkey.

use serde_json::Value;
use tracing::info;
use wad::Actions;

use crate::output::{CommandResult, ErrorCode, report_result};

pub async fn run_type(actions: &Actions, text: &str) -> CommandResult<Value> {
	info!(target = "wad", chars = text.chars().count(), "type text");
	report_result("type", actions.type_text(text).await, ErrorCode::InjectionFailed)
}

pub async fn run_key(actions: &Actions, key: &str) -> CommandResult<Value> {
	info!(target = "wad", key, "press key");
	report_result("key", actions.press_key(key).await, ErrorCode::InjectionFailed)
}

pub async fn run_hotkey(actions: &Actions, keys: &[String]) -> CommandResult<Value> {
	info!(target = "wad", keys = %keys.join("+"), "hotkey");
	report_result("hotkey", actions.hotkey(keys).await, ErrorCode::InjectionFailed)
}
