//! Structured command output.
//!
//! Every command reports through one envelope: success flag, payload or
//! error, duration. Failures are never silent.

use std::io::{self, Write};
use std::time::Instant;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use wad::ActionReport;

/// The result envelope returned by all commands.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	DriverUnavailable,
	SessionError,
	TransportError,
	InjectionFailed,
	ScreenshotFailed,
	ElementNotFound,
	InvalidInput,
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::DriverUnavailable => write!(f, "DRIVER_UNAVAILABLE"),
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
			ErrorCode::InjectionFailed => write!(f, "INJECTION_FAILED"),
			ErrorCode::ScreenshotFailed => write!(f, "SCREENSHOT_FAILED"),
			ErrorCode::ElementNotFound => write!(f, "ELEMENT_NOT_FOUND"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

/// Maps typed core errors onto output codes.
pub fn error_code_for(err: &wad::Error) -> ErrorCode {
	match err {
		wad::Error::SessionCreation(_) | wad::Error::AlreadyConnected(_) => ErrorCode::SessionError,
		wad::Error::Transport(_) | wad::Error::NotConnected => ErrorCode::TransportError,
		wad::Error::Injection(_) | wad::Error::InvalidKey(_) => ErrorCode::InjectionFailed,
		wad::Error::Screenshot(_) => ErrorCode::ScreenshotFailed,
		wad::Error::Process(_) => ErrorCode::DriverUnavailable,
		wad::Error::Io(_) => ErrorCode::InternalError,
	}
}

/// Builder for constructing command results.
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
		}
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();
		CommandResult {
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			duration_ms: Some(self.start_time.elapsed().as_millis() as u64),
		}
	}
}

/// Folds an action report into the result envelope, tagging failures with
/// `code`.
pub fn report_result(command: &str, report: ActionReport, code: ErrorCode) -> CommandResult<Value> {
	let builder = ResultBuilder::new(command);
	if report.success {
		builder.data(report.details.unwrap_or(Value::Null)).build()
	} else {
		builder
			.error(code, report.error.unwrap_or_else(|| "unknown failure".to_string()))
			.build()
	}
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	Json,
	Text,
}

/// Print a command result to stdout in the selected format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => print_result_text(result),
	}
}

fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if result.ok {
		if let Some(ref data) = result.data {
			if let Ok(json) = serde_json::to_string_pretty(data) {
				let _ = writeln!(stdout, "{json}");
			}
		}
	} else if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
	}

	if let Some(duration_ms) = result.duration_ms {
		let _ = writeln!(stdout, "Completed in {duration_ms}ms");
	}
}
