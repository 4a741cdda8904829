//! W3C pointer-action sequences.
//!
//! WinAppDriver has no native double-click endpoint, so double-clicks are
//! synthesized through the generic `POST /session/{id}/actions` interface.

use serde::{Deserialize, Serialize};

/// Pause between the two click pairs of a synthesized double-click. Tuned to
/// land inside OS double-click timing thresholds, not arbitrary.
pub const DOUBLE_CLICK_PAUSE_MS: u64 = 50;

const PRIMARY_BUTTON: u8 = 0;

/// `POST /session/{id}/actions` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsRequest {
	pub actions: Vec<ActionSequence>,
}

/// One input source's action timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSequence {
	#[serde(rename = "type")]
	pub kind: String,
	pub id: String,
	pub actions: Vec<PointerAction>,
}

/// A single step in a pointer timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PointerAction {
	PointerMove { origin: ElementOrigin },
	PointerDown { button: u8 },
	PointerUp { button: u8 },
	Pause { duration: u64 },
}

/// Pointer-move origin addressing an element by its W3C identifier key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementOrigin {
	#[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
	pub element: String,
}

impl ActionsRequest {
	/// Synthesized double-click on an element: move to its origin, then two
	/// press/release pairs separated by [`DOUBLE_CLICK_PAUSE_MS`].
	pub fn double_click(element_id: &str) -> Self {
		Self {
			actions: vec![ActionSequence {
				kind: "pointer".to_string(),
				id: "mouse".to_string(),
				actions: vec![
					PointerAction::PointerMove {
						origin: ElementOrigin {
							element: element_id.to_string(),
						},
					},
					PointerAction::PointerDown {
						button: PRIMARY_BUTTON,
					},
					PointerAction::PointerUp {
						button: PRIMARY_BUTTON,
					},
					PointerAction::Pause {
						duration: DOUBLE_CLICK_PAUSE_MS,
					},
					PointerAction::PointerDown {
						button: PRIMARY_BUTTON,
					},
					PointerAction::PointerUp {
						button: PRIMARY_BUTTON,
					},
				],
			}],
		}
	}
}
