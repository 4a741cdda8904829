//! Remote element references scoped to one driver session.

use wad_protocol::{ActionsRequest, ValueEnvelope};

use crate::client::DriverClient;
use crate::error::Result;

/// A UI element resolved within a session.
///
/// The borrow ties the handle to its owning client: closing the session
/// needs exclusive access, so a live handle can never observe a closed one.
pub struct Element<'a> {
	client: &'a DriverClient,
	id: String,
}

impl<'a> Element<'a> {
	pub(crate) fn new(client: &'a DriverClient, id: String) -> Self {
		Self { client, id }
	}

	/// Opaque element id as reported by the driver.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Clicks the element through UI Automation.
	pub async fn click(&self) -> Result<()> {
		self.client
			.post_session(&format!("element/{}/click", self.id), &serde_json::json!({}))
			.await
	}

	/// Double-clicks via the generic pointer-action sequence; the driver has
	/// no native double-click endpoint.
	pub async fn double_click(&self) -> Result<()> {
		self.client
			.post_session("actions", &ActionsRequest::double_click(&self.id))
			.await
	}

	/// Reads an element attribute (Name, AutomationId, ClassName, ...).
	/// An absent attribute is `None`, not an error.
	pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
		let body: ValueEnvelope<Option<String>> = self
			.client
			.get_session(&format!("element/{}/attribute/{name}", self.id))
			.await?;
		Ok(body.value)
	}

	/// The element's control type (Button, Edit, Window, ...).
	pub async fn control_type(&self) -> Result<String> {
		let body: ValueEnvelope<Option<String>> = self
			.client
			.get_session(&format!("element/{}/name", self.id))
			.await?;
		Ok(body.value.unwrap_or_default())
	}
}
