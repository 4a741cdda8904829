//! Click at screen coordinates.

use serde_json::Value;
use tracing::info;
use wad::{Actions, MouseButton};

use crate::output::{CommandResult, ErrorCode, report_result};

pub async fn run(
	actions: &Actions,
	x: i32,
	y: i32,
	button: MouseButton,
	double: bool,
) -> CommandResult<Value> {
	info!(target = "wad", x, y, %button, double, "click");
	let report = actions.click(x, y, button, double).await;
	let command = if double { "double-click" } else { "click" };
	report_result(command, report, ErrorCode::InjectionFailed)
}
