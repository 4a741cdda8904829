//! Error types shared across the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// The driver answered but refused or botched session setup. Callers
	/// degrade to coordinate injection for the rest of the run.
	#[error("session creation failed: {0}")]
	SessionCreation(String),

	/// Network failure, timeout, or malformed response on an open session.
	#[error("driver transport error: {0}")]
	Transport(String),

	/// A second `create_session` while one is active. An active session id
	/// is never silently replaced.
	#[error("a driver session is already active: {0}")]
	AlreadyConnected(String),

	#[error("not connected")]
	NotConnected,

	#[error("input injection failed: {0}")]
	Injection(String),

	#[error("screen capture failed: {0}")]
	Screenshot(String),

	#[error("unrecognized key name: {0}")]
	InvalidKey(String),

	#[error(transparent)]
	Process(#[from] wad_runtime::RuntimeError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
