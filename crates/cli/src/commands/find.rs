//! Look up a UI element and print its identity.

use serde_json::{Value, json};
use tracing::info;
use wad::DriverClient;
use wad::config::{DEFAULT_DRIVER_PORT, DriverConfig};

use crate::cli::Cli;
use crate::output::{CommandResult, ErrorCode, ResultBuilder, error_code_for};

pub async fn run(
	cli: &Cli,
	name: Option<&str>,
	automation_id: Option<&str>,
) -> CommandResult<Value> {
	let builder = ResultBuilder::new("find");

	let port = cli.port.unwrap_or(DEFAULT_DRIVER_PORT);
	let mut client = DriverClient::new(port, DriverConfig::default().timeout());

	if let Err(err) = client.create_session().await {
		return builder.error(error_code_for(&err), err.to_string()).build();
	}

	let lookup = match (name, automation_id) {
		(Some(name), _) => {
			info!(target = "wad", name, "find element by name");
			client.find_element_by_name(name).await
		}
		(None, Some(automation_id)) => {
			info!(target = "wad", automation_id, "find element by automation id");
			client.find_element_by_automation_id(automation_id).await
		}
		(None, None) => {
			client.close_session().await;
			return builder
				.error(ErrorCode::InvalidInput, "specify --name or --automation-id")
				.build();
		}
	};

	let result = match lookup {
		Ok(Some(element)) => {
			let control_type = element.control_type().await.unwrap_or_default();
			let element_name = element.get_attribute("Name").await.unwrap_or(None);
			builder
				.data(json!({
					"elementId": element.id(),
					"controlType": control_type,
					"name": element_name,
				}))
				.build()
		}
		Ok(None) => builder.error(ErrorCode::ElementNotFound, "no matching element").build(),
		Err(err) => builder.error(error_code_for(&err), err.to_string()).build(),
	};

	client.close_session().await;
	result
}
