//! In-process fake WinAppDriver for integration tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const SESSION_ID: &str = "abc-1";

/// What the fake returns for element lookups.
#[derive(Debug, Clone, Copy)]
pub enum LookupMode {
	/// 200 with the legacy `ELEMENT` key.
	LegacyKey(&'static str),
	/// 200 with the W3C identifier key only.
	W3cKey(&'static str),
	/// 404, the driver's no-match answer.
	NoMatch,
	/// 200 with an empty value object.
	EmptyValue,
	/// 200 with a body that is not JSON, to simulate transport failure.
	Garbage,
}

/// Requests the fake observed, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
	CreateSession,
	FindElement(Value),
	ElementClick(String),
	Actions(Value),
	DeleteSession(String),
}

struct DriverState {
	lookup: Mutex<LookupMode>,
	reject_sessions: AtomicBool,
	attribute: Mutex<Option<String>>,
	requests: Mutex<Vec<Observed>>,
}

pub struct FakeDriver {
	pub port: u16,
	state: Arc<DriverState>,
	server: tokio::task::JoinHandle<()>,
}

impl FakeDriver {
	pub async fn start() -> Self {
		let state = Arc::new(DriverState {
			lookup: Mutex::new(LookupMode::NoMatch),
			reject_sessions: AtomicBool::new(false),
			attribute: Mutex::new(None),
			requests: Mutex::new(Vec::new()),
		});

		let app = Router::new()
			.route("/session", post(create_session))
			.route("/session/{sid}", delete(delete_session))
			.route("/session/{sid}/element", post(find_element))
			.route("/session/{sid}/element/{eid}/click", post(element_click))
			.route("/session/{sid}/element/{eid}/attribute/{name}", axum::routing::get(get_attribute))
			.route("/session/{sid}/element/{eid}/name", axum::routing::get(get_control_type))
			.route("/session/{sid}/actions", post(post_actions))
			.with_state(Arc::clone(&state));

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
		let port = listener.local_addr().unwrap().port();
		let server = tokio::spawn(async move {
			axum::serve(listener, app).await.unwrap();
		});

		Self { port, state, server }
	}

	/// Drops the listener so further requests fail at the transport level.
	pub fn shutdown(&self) {
		self.server.abort();
	}

	pub fn set_lookup(&self, mode: LookupMode) {
		*self.state.lookup.lock() = mode;
	}

	pub fn reject_sessions(&self) {
		self.state.reject_sessions.store(true, Ordering::SeqCst);
	}

	pub fn set_attribute(&self, value: Option<&str>) {
		*self.state.attribute.lock() = value.map(str::to_string);
	}

	pub fn observed(&self) -> Vec<Observed> {
		self.state.requests.lock().clone()
	}

	pub fn element_lookups(&self) -> usize {
		self.observed()
			.iter()
			.filter(|r| matches!(r, Observed::FindElement(_)))
			.count()
	}

	pub fn clicked_elements(&self) -> Vec<String> {
		self.observed()
			.into_iter()
			.filter_map(|r| match r {
				Observed::ElementClick(id) => Some(id),
				_ => None,
			})
			.collect()
	}
}

async fn create_session(State(state): State<Arc<DriverState>>) -> Response {
	state.requests.lock().push(Observed::CreateSession);
	if state.reject_sessions.load(Ordering::SeqCst) {
		return (
			StatusCode::INTERNAL_SERVER_ERROR,
			axum::Json(json!({"value": {"error": "session not created"}})),
		)
			.into_response();
	}
	axum::Json(json!({"value": {"sessionId": SESSION_ID}})).into_response()
}

async fn delete_session(
	State(state): State<Arc<DriverState>>,
	Path(sid): Path<String>,
) -> Response {
	state.requests.lock().push(Observed::DeleteSession(sid));
	axum::Json(json!({"value": null})).into_response()
}

async fn find_element(
	State(state): State<Arc<DriverState>>,
	Path(_sid): Path<String>,
	axum::Json(body): axum::Json<Value>,
) -> Response {
	state.requests.lock().push(Observed::FindElement(body));
	let mode = *state.lookup.lock();
	match mode {
		LookupMode::LegacyKey(id) => {
			axum::Json(json!({"value": {"ELEMENT": id}})).into_response()
		}
		LookupMode::W3cKey(id) => {
			axum::Json(json!({"value": {"element-6066-11e4-a52e-4f735466cecf": id}}))
				.into_response()
		}
		LookupMode::NoMatch => (
			StatusCode::NOT_FOUND,
			axum::Json(json!({"value": {"error": "no such element"}})),
		)
			.into_response(),
		LookupMode::EmptyValue => axum::Json(json!({"value": {}})).into_response(),
		LookupMode::Garbage => (StatusCode::OK, "definitely not json").into_response(),
	}
}

async fn element_click(
	State(state): State<Arc<DriverState>>,
	Path((_sid, eid)): Path<(String, String)>,
) -> Response {
	state.requests.lock().push(Observed::ElementClick(eid));
	axum::Json(json!({"value": null})).into_response()
}

async fn get_attribute(
	State(state): State<Arc<DriverState>>,
	Path((_sid, _eid, _name)): Path<(String, String, String)>,
) -> Response {
	let value = state.attribute.lock().clone();
	axum::Json(json!({"value": value})).into_response()
}

async fn get_control_type(Path((_sid, _eid)): Path<(String, String)>) -> Response {
	axum::Json(json!({"value": "Button"})).into_response()
}

async fn post_actions(
	State(state): State<Arc<DriverState>>,
	Path(_sid): Path<String>,
	axum::Json(body): axum::Json<Value>,
) -> Response {
	state.requests.lock().push(Observed::Actions(body));
	axum::Json(json!({"value": null})).into_response()
}
