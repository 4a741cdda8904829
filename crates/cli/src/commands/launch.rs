//! Launch an application through Start-menu search.

use serde_json::Value;
use tracing::info;
use wad::Actions;

use crate::output::{CommandResult, ErrorCode, report_result};

pub async fn run(actions: &Actions, app: &str) -> CommandResult<Value> {
	info!(target = "wad", app, "launch application");
	report_result("launch", actions.launch(app).await, ErrorCode::InjectionFailed)
}
