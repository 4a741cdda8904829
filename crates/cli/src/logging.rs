//! Tracing setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Maps `-v` counts onto a default filter (warn, info, debug). An explicit
/// `RUST_LOG` wins over the flag.
pub fn init_logging(verbose: u8) {
	let default = match verbose {
		0 => "warn",
		1 => "wad=info,wad_runtime=info,wad_cli=info",
		_ => "debug",
	};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
