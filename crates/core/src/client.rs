//! REST client for the WinAppDriver session protocol.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use wad_protocol::{ElementLookup, ElementRef, FindElementRequest, NewSessionRequest, NewSessionValue, ValueEnvelope};

use crate::element::Element;
use crate::error::{Error, Result};

/// One authenticated connection to a locally running driver process.
///
/// The client owns its HTTP transport exclusively. The session id exists
/// only between a successful [`create_session`](Self::create_session) and
/// [`close_session`](Self::close_session); every other session operation
/// fails fast with [`Error::NotConnected`] outside that window.
pub struct DriverClient {
	base_url: String,
	timeout: Duration,
	session_id: Option<String>,
	http: Option<reqwest::Client>,
}

impl DriverClient {
	pub fn new(port: u16, timeout: Duration) -> Self {
		Self {
			base_url: format!("http://127.0.0.1:{port}"),
			timeout,
			session_id: None,
			http: None,
		}
	}

	/// The active session id, if any.
	pub fn session_id(&self) -> Option<&str> {
		self.session_id.as_deref()
	}

	/// Opens a desktop-root session for desktop-wide element discovery.
	///
	/// Callable once per session lifetime: a second call while connected
	/// returns [`Error::AlreadyConnected`] rather than replacing the id.
	pub async fn create_session(&mut self) -> Result<()> {
		if let Some(id) = &self.session_id {
			return Err(Error::AlreadyConnected(id.clone()));
		}

		let http = reqwest::Client::builder()
			.timeout(self.timeout)
			.build()
			.map_err(|e| Error::SessionCreation(e.to_string()))?;

		let response = http
			.post(format!("{}/session", self.base_url))
			.json(&NewSessionRequest::desktop_root())
			.send()
			.await
			.map_err(|e| Error::SessionCreation(e.to_string()))?;

		if !response.status().is_success() {
			return Err(Error::SessionCreation(format!(
				"driver rejected session: {}",
				response.status()
			)));
		}

		let body: ValueEnvelope<NewSessionValue> = response
			.json()
			.await
			.map_err(|e| Error::SessionCreation(format!("malformed session response: {e}")))?;

		let Some(id) = body.value.session_id.filter(|id| !id.is_empty()) else {
			return Err(Error::SessionCreation("response carried no session id".to_string()));
		};

		info!(target = "wad.session", session = %id, "driver session created");
		self.http = Some(http);
		self.session_id = Some(id);
		Ok(())
	}

	/// Resolves the UI element whose bounding rectangle contains the point.
	///
	/// `Ok(None)` is the expected miss: nothing at that point is a routine
	/// outcome, not a failure. Only transport problems surface as errors;
	/// whether those trigger injection fallback is the caller's policy.
	pub async fn element_from_point(&self, x: i32, y: i32) -> Result<Option<Element<'_>>> {
		self.find(FindElementRequest::at_point(x, y)).await
	}

	/// Looks up an element by its Name property.
	pub async fn find_element_by_name(&self, name: &str) -> Result<Option<Element<'_>>> {
		self.find(FindElementRequest::by_name(name)).await
	}

	/// Looks up an element by its AutomationId.
	pub async fn find_element_by_automation_id(
		&self,
		automation_id: &str,
	) -> Result<Option<Element<'_>>> {
		self.find(FindElementRequest::by_automation_id(automation_id)).await
	}

	async fn find(&self, request: FindElementRequest) -> Result<Option<Element<'_>>> {
		let (http, session_id) = self.transport()?;

		let response = http
			.post(format!("{}/session/{session_id}/element", self.base_url))
			.json(&request)
			.send()
			.await
			.map_err(transport_error)?;

		// Any non-200 is a miss, not a failure; the driver 404s lookups that
		// match nothing.
		if !response.status().is_success() {
			debug!(target = "wad.session", status = %response.status(), "no element matched");
			return Ok(None);
		}

		let body: ValueEnvelope<ElementRef> = response.json().await.map_err(transport_error)?;

		match body.value.resolve() {
			ElementLookup::Found(id) => {
				debug!(target = "wad.session", element = %id, "element resolved");
				Ok(Some(Element::new(self, id)))
			}
			ElementLookup::Absent => Ok(None),
		}
	}

	/// Tears down the session on the driver, best-effort.
	///
	/// A DELETE that fails or times out is swallowed: local state is cleared
	/// and the transport dropped regardless, so process shutdown can always
	/// proceed.
	pub async fn close_session(&mut self) {
		if let (Some(http), Some(id)) = (self.http.as_ref(), self.session_id.as_ref()) {
			if let Err(err) = http.delete(format!("{}/session/{id}", self.base_url)).send().await {
				debug!(
					target = "wad.session",
					error = %err,
					"session delete failed; dropping local state anyway"
				);
			}
		}

		self.http = None;
		if self.session_id.take().is_some() {
			info!(target = "wad.session", "driver session closed");
		}
	}

	pub(crate) async fn post_session(&self, path: &str, body: &impl Serialize) -> Result<()> {
		let (http, session_id) = self.transport()?;

		let response = http
			.post(format!("{}/session/{session_id}/{path}", self.base_url))
			.json(body)
			.send()
			.await
			.map_err(transport_error)?;

		if !response.status().is_success() {
			return Err(Error::Transport(format!(
				"{path}: unexpected status {}",
				response.status()
			)));
		}

		Ok(())
	}

	pub(crate) async fn get_session<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		let (http, session_id) = self.transport()?;

		let response = http
			.get(format!("{}/session/{session_id}/{path}", self.base_url))
			.send()
			.await
			.map_err(transport_error)?;

		if !response.status().is_success() {
			return Err(Error::Transport(format!(
				"{path}: unexpected status {}",
				response.status()
			)));
		}

		response.json().await.map_err(transport_error)
	}

	fn transport(&self) -> Result<(&reqwest::Client, &str)> {
		match (self.http.as_ref(), self.session_id.as_deref()) {
			(Some(http), Some(id)) => Ok((http, id)),
			_ => Err(Error::NotConnected),
		}
	}
}

fn transport_error(err: reqwest::Error) -> Error {
	if err.is_timeout() {
		Error::Transport(format!("request timed out: {err}"))
	} else {
		Error::Transport(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn operations_fail_fast_without_a_session() {
		let client = DriverClient::new(4723, Duration::from_secs(1));
		assert!(client.session_id().is_none());
		assert!(matches!(
			client.element_from_point(1, 2).await,
			Err(Error::NotConnected)
		));
		assert!(matches!(
			client.find_element_by_name("OK").await,
			Err(Error::NotConnected)
		));
	}

	#[tokio::test]
	async fn close_without_session_is_a_noop() {
		let mut client = DriverClient::new(4723, Duration::from_secs(1));
		client.close_session().await;
		assert!(client.session_id().is_none());
	}
}
