//! Command dispatch: one surface per invocation, teardown always runs.

mod click;
mod find;
mod info;
mod input;
mod launch;
mod screenshot;
mod status;

use std::sync::Arc;

use tracing::warn;
use wad::{Actions, BridgeConfig, InputBackend, NativeBackend, RecordingBackend, surface_for};

use crate::cli::{Cli, Commands};
use crate::output::{CommandResult, OutputFormat, print_result};

/// Default directory for `--save`-style screenshot output.
const SCREENSHOTS_DIR: &str = "screenshots";

pub async fn dispatch(cli: Cli) -> anyhow::Result<()> {
	let format = cli.format;

	// These talk to the driver endpoint directly; no input surface needed.
	match &cli.command {
		Commands::Status => return finish(status::run(&cli).await, format),
		Commands::Find { name, automation_id } => {
			let result = find::run(&cli, name.as_deref(), automation_id.as_deref()).await;
			return finish(result, format);
		}
		_ => {}
	}

	let config = bridge_config(&cli);
	let backend: Arc<dyn InputBackend> = if cli.dry_run {
		Arc::new(RecordingBackend::new())
	} else {
		Arc::new(NativeBackend::new(config.input.clone()))
	};

	let mut actions = Actions::new(surface_for(config, backend), SCREENSHOTS_DIR);
	actions.connect().await?;

	let result = run_with_surface(&cli, &actions).await;

	// Teardown runs regardless of the command's outcome.
	if let Err(err) = actions.disconnect().await {
		warn!(target = "wad", error = %err, "disconnect failed");
	}

	finish(result, format)
}

async fn run_with_surface(cli: &Cli, actions: &Actions) -> CommandResult<serde_json::Value> {
	match &cli.command {
		Commands::Click { x, y, button, double } => {
			click::run(actions, *x, *y, (*button).into(), *double).await
		}
		Commands::Type { text } => input::run_type(actions, text).await,
		Commands::Key { key } => input::run_key(actions, key).await,
		Commands::Hotkey { keys } => input::run_hotkey(actions, keys).await,
		Commands::Screenshot { output } => screenshot::run(actions, output).await,
		Commands::Launch { app } => launch::run(actions, app).await,
		Commands::Info => info::run(actions).await,
		Commands::Status | Commands::Find { .. } => {
			unreachable!("handled before surface acquisition")
		}
	}
}

fn finish(result: CommandResult<serde_json::Value>, format: OutputFormat) -> anyhow::Result<()> {
	let ok = result.ok;
	print_result(&result, format);
	if ok {
		Ok(())
	} else {
		Err(anyhow::anyhow!("{} failed", result.command))
	}
}

fn bridge_config(cli: &Cli) -> BridgeConfig {
	let mut config = BridgeConfig::default();
	if cli.no_driver {
		config.driver.enabled = false;
	}
	if let Some(path) = &cli.driver_path {
		config.driver.path = path.clone();
	}
	if let Some(port) = cli.port {
		config.driver.port = port;
	}
	if cli.no_fallback {
		config.driver.fallback_on_failure = false;
	}
	config
}

#[cfg(test)]
mod tests {
	use clap::Parser;

	use super::*;

	#[test]
	fn flags_map_onto_driver_config() {
		let cli = Cli::try_parse_from(vec![
			"wad",
			"type",
			"hi",
			"--no-fallback",
			"--port",
			"9999",
			"--driver-path",
			"/opt/wad/WinAppDriver.exe",
		])
		.unwrap();

		let config = bridge_config(&cli);
		assert!(config.driver.enabled);
		assert!(!config.driver.fallback_on_failure);
		assert_eq!(config.driver.port, 9999);
		assert_eq!(config.driver.path, std::path::PathBuf::from("/opt/wad/WinAppDriver.exe"));
	}

	#[test]
	fn no_driver_disables_the_structured_path() {
		let cli = Cli::try_parse_from(vec!["wad", "type", "hi", "--no-driver"]).unwrap();
		assert!(!bridge_config(&cli).driver.enabled);
	}
}
