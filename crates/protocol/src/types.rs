//! Session and element-lookup payloads.

use serde::{Deserialize, Serialize};

/// W3C WebDriver element identifier key.
pub const W3C_ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Legacy JsonWireProtocol element key. WinAppDriver predates the W3C spec
/// and still emits this one on most builds.
pub const LEGACY_ELEMENT_KEY: &str = "ELEMENT";

/// Envelope wrapping every driver response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEnvelope<T> {
	pub value: T,
}

/// `POST /session` request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
	pub capabilities: Capabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
	#[serde(rename = "alwaysMatch")]
	pub always_match: DesktopCapabilities,
}

#[derive(Debug, Clone, Serialize)]
pub struct DesktopCapabilities {
	#[serde(rename = "platformName")]
	pub platform_name: String,
	#[serde(rename = "appium:app")]
	pub app: String,
	#[serde(rename = "appium:deviceName")]
	pub device_name: String,
}

impl NewSessionRequest {
	/// Capabilities for a `Root` session: element discovery across the whole
	/// desktop rather than one attached application.
	pub fn desktop_root() -> Self {
		Self {
			capabilities: Capabilities {
				always_match: DesktopCapabilities {
					platform_name: "Windows".to_string(),
					app: "Root".to_string(),
					device_name: "WindowsPC".to_string(),
				},
			},
		}
	}
}

/// `POST /session` success body: `{"value":{"sessionId":"..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionValue {
	#[serde(rename = "sessionId")]
	pub session_id: Option<String>,
}

/// Locator strategies accepted by `POST /session/{id}/element`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LocatorStrategy {
	#[serde(rename = "xpath")]
	Xpath,
	#[serde(rename = "name")]
	Name,
	#[serde(rename = "accessibility id")]
	AccessibilityId,
}

/// `POST /session/{id}/element` request body.
#[derive(Debug, Clone, Serialize)]
pub struct FindElementRequest {
	pub using: LocatorStrategy,
	pub value: String,
}

impl FindElementRequest {
	/// Locator matching elements whose bounding rectangle contains the point.
	pub fn at_point(x: i32, y: i32) -> Self {
		Self {
			using: LocatorStrategy::Xpath,
			value: format!(
				"//*[contains(@BoundingRectangle, '{x}') and contains(@BoundingRectangle, '{y}')]"
			),
		}
	}

	/// Locator matching on the element's Name property.
	pub fn by_name(name: &str) -> Self {
		Self {
			using: LocatorStrategy::Name,
			value: name.to_string(),
		}
	}

	/// Locator matching on the element's AutomationId.
	pub fn by_automation_id(automation_id: &str) -> Self {
		Self {
			using: LocatorStrategy::AccessibilityId,
			value: automation_id.to_string(),
		}
	}
}

/// Element reference as it appears on the wire.
///
/// The driver mixes the legacy JsonWire key with the W3C key depending on
/// build; both are modeled so a valid response is never misread as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "ELEMENT")]
	pub legacy: Option<String>,
	#[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
	pub w3c: Option<String>,
}

/// Typed outcome of an element-lookup response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementLookup {
	Found(String),
	Absent,
}

impl ElementRef {
	/// Resolves the element id, probing the legacy key before the W3C key.
	pub fn resolve(&self) -> ElementLookup {
		match self.legacy.as_deref().or(self.w3c.as_deref()) {
			Some(id) if !id.is_empty() => ElementLookup::Found(id.to_string()),
			_ => ElementLookup::Absent,
		}
	}
}
