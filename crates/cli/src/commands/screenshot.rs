//! Capture the primary monitor.

use std::path::Path;

use serde_json::Value;
use tracing::info;
use wad::Actions;

use crate::output::{CommandResult, ErrorCode, report_result};

pub async fn run(actions: &Actions, output: &Path) -> CommandResult<Value> {
	info!(target = "wad", output = %output.display(), "screenshot");
	let report = actions.screenshot(false, Some(output)).await;
	report_result("screenshot", report, ErrorCode::ScreenshotFailed)
}
