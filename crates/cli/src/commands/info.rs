//! Show primary monitor dimensions.

use serde_json::{Value, json};
use wad::Actions;

use crate::output::{CommandResult, ResultBuilder, error_code_for};

pub async fn run(actions: &Actions) -> CommandResult<Value> {
	let builder = ResultBuilder::new("info");
	match actions.surface().screen_info().await {
		Ok(info) => builder.data(json!({"width": info.width, "height": info.height})).build(),
		Err(err) => builder.error(error_code_for(&err), err.to_string()).build(),
	}
}
