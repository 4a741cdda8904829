use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use wad::MouseButton;

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "wad")]
#[command(about = "Windows desktop automation - UI Automation clicks with coordinate fallback")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format for command results
	#[arg(long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Record actions instead of touching the desktop
	#[arg(long, global = true)]
	pub dry_run: bool,

	/// Skip the UI Automation driver entirely (coordinate injection only)
	#[arg(long, global = true)]
	pub no_driver: bool,

	/// Driver executable path
	#[arg(long, global = true, value_name = "FILE")]
	pub driver_path: Option<PathBuf>,

	/// Driver port
	#[arg(short, long, global = true)]
	pub port: Option<u16>,

	/// Surface element-resolution transport errors instead of falling back
	/// to injection
	#[arg(long, global = true)]
	pub no_fallback: bool,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Click at screen coordinates
	Click {
		x: i32,
		y: i32,
		/// Mouse button
		#[arg(short, long, value_enum, default_value = "left")]
		button: ButtonArg,
		/// Double-click instead of single click
		#[arg(long)]
		double: bool,
	},

	/// Type text into the focused element
	Type { text: String },

	/// Press a single key (enter, escape, tab, f5, a, ...)
	Key { key: String },

	/// Press a key combination (e.g. `wad hotkey ctrl c`)
	Hotkey {
		#[arg(required = true)]
		keys: Vec<String>,
	},

	/// Capture the primary monitor
	#[command(alias = "ss")]
	Screenshot {
		/// Output file path
		#[arg(short, long, default_value = "screenshot.png")]
		output: PathBuf,
	},

	/// Launch an application through Start-menu search
	Launch { app: String },

	/// Find a UI element and print its identity
	Find {
		/// Match on the element's Name property
		#[arg(long, conflicts_with = "automation_id")]
		name: Option<String>,
		/// Match on the element's AutomationId
		#[arg(long)]
		automation_id: Option<String>,
	},

	/// Probe the driver's status endpoint
	Status,

	/// Show primary monitor dimensions
	Info,
}

/// Mouse button argument.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ButtonArg {
	#[default]
	Left,
	Right,
	Middle,
}

impl From<ButtonArg> for MouseButton {
	fn from(button: ButtonArg) -> Self {
		match button {
			ButtonArg::Left => MouseButton::Left,
			ButtonArg::Right => MouseButton::Right,
			ButtonArg::Middle => MouseButton::Middle,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_click_command() {
		let args = vec!["wad", "click", "500", "300"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Click { x, y, button, double } => {
				assert_eq!((x, y), (500, 300));
				assert_eq!(button, ButtonArg::Left);
				assert!(!double);
			}
			_ => panic!("Expected Click command"),
		}
	}

	#[test]
	fn parse_click_with_button_and_double() {
		let args = vec!["wad", "click", "10", "20", "--button", "right", "--double"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Click { button, double, .. } => {
				assert_eq!(button, ButtonArg::Right);
				assert!(double);
			}
			_ => panic!("Expected Click command"),
		}
	}

	#[test]
	fn parse_negative_coordinates() {
		// Secondary monitors left of the primary produce negative X.
		let args = vec!["wad", "click", "--", "-100", "300"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Click { x, y, .. } => assert_eq!((x, y), (-100, 300)),
			_ => panic!("Expected Click command"),
		}
	}

	#[test]
	fn parse_hotkey_collects_all_keys() {
		let args = vec!["wad", "hotkey", "ctrl", "shift", "escape"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Hotkey { keys } => assert_eq!(keys, vec!["ctrl", "shift", "escape"]),
			_ => panic!("Expected Hotkey command"),
		}
	}

	#[test]
	fn parse_hotkey_requires_at_least_one_key() {
		let args = vec!["wad", "hotkey"];
		assert!(Cli::try_parse_from(args).is_err());
	}

	#[test]
	fn parse_screenshot_default_output() {
		let args = vec!["wad", "screenshot"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Screenshot { output } => {
				assert_eq!(output, PathBuf::from("screenshot.png"));
			}
			_ => panic!("Expected Screenshot command"),
		}
	}

	#[test]
	fn parse_screenshot_alias() {
		let args = vec!["wad", "ss", "-o", "/tmp/frame.png"];
		let cli = Cli::try_parse_from(args).unwrap();

		match cli.command {
			Commands::Screenshot { output } => {
				assert_eq!(output, PathBuf::from("/tmp/frame.png"));
			}
			_ => panic!("Expected Screenshot command"),
		}
	}

	#[test]
	fn find_name_conflicts_with_automation_id() {
		let args = vec!["wad", "find", "--name", "OK", "--automation-id", "btnOk"];
		assert!(Cli::try_parse_from(args).is_err());
	}

	#[test]
	fn global_flags_apply_after_subcommand() {
		let args = vec!["wad", "type", "hello", "--dry-run", "--no-driver", "-p", "9999"];
		let cli = Cli::try_parse_from(args).unwrap();
		assert!(cli.dry_run);
		assert!(cli.no_driver);
		assert_eq!(cli.port, Some(9999));
	}

	#[test]
	fn verbose_flag_counts() {
		let cli = Cli::try_parse_from(vec!["wad", "-vv", "status"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}

	#[test]
	fn invalid_command_fails() {
		let args = vec!["wad", "teleport", "10", "20"];
		assert!(Cli::try_parse_from(args).is_err());
	}
}
