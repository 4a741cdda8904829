//! Driver endpoint probing.

use std::time::Duration;

use serde::Deserialize;

use crate::{Result, RuntimeError};

/// `GET /status` response subset from the driver.
///
/// Every field is optional: the endpoint's only job here is proving the HTTP
/// listener is up, and older builds return sparser bodies.
#[derive(Debug, Default, Deserialize)]
pub struct DriverStatus {
	#[serde(default)]
	pub build: Option<BuildInfo>,
	#[serde(default)]
	pub os: Option<OsInfo>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BuildInfo {
	#[serde(default)]
	pub version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsInfo {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
}

/// Fetches `/status` from the driver on `port`.
pub async fn fetch_driver_status(port: u16, timeout: Duration) -> Result<DriverStatus> {
	let client = reqwest::Client::builder()
		.timeout(timeout)
		.build()
		.map_err(|e| RuntimeError::Probe(format!("failed to create HTTP client: {e}")))?;

	let url = format!("http://127.0.0.1:{port}/status");
	let response = client.get(&url).send().await.map_err(|e| RuntimeError::NotReady {
		port,
		reason: e.to_string(),
	})?;

	if !response.status().is_success() {
		return Err(RuntimeError::NotReady {
			port,
			reason: format!("unexpected status {}", response.status()),
		});
	}

	response
		.json::<DriverStatus>()
		.await
		.map_err(|e| RuntimeError::Probe(format!("failed to parse status response: {e}")))
}
