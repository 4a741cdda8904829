//! Probe the driver's status endpoint.

use std::time::Duration;

use serde_json::{Value, json};
use wad::config::DEFAULT_DRIVER_PORT;
use wad_runtime::fetch_driver_status;

use crate::cli::Cli;
use crate::output::{CommandResult, ErrorCode, ResultBuilder};

const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

pub async fn run(cli: &Cli) -> CommandResult<Value> {
	let port = cli.port.unwrap_or(DEFAULT_DRIVER_PORT);
	let builder = ResultBuilder::new("status");

	match fetch_driver_status(port, STATUS_TIMEOUT).await {
		Ok(status) => builder
			.data(json!({
				"reachable": true,
				"port": port,
				"driverVersion": status.build.and_then(|b| b.version),
				"os": status.os.map(|os| json!({"name": os.name, "version": os.version})),
			}))
			.build(),
		Err(err) => builder.error(ErrorCode::DriverUnavailable, err.to_string()).build(),
	}
}
