//! WinAppDriver-backed desktop control with coordinate-injection fallback.
//!
//! The crate layers three pieces:
//! * [`DriverClient`] speaks the WebDriver-style JSON/HTTP protocol to a
//!   locally running WinAppDriver and hands out borrow-scoped [`Element`]
//!   handles.
//! * [`backend::InputBackend`] synthesizes mouse/keyboard events and captures
//!   the screen at raw coordinates, independent of UI structure.
//! * [`surface::DesktopSurface`] is the capability interface callers use; the
//!   [`surface::AutomationSurface`] strategy routes each left-click through
//!   element resolution and falls back to injection per call, while
//!   [`surface::CoordinateSurface`] never consults the driver.

pub mod actions;
pub mod backend;
pub mod client;
pub mod config;
pub mod element;
pub mod error;
pub mod surface;

pub use actions::{ActionReport, Actions};
pub use backend::{InputBackend, MouseButton, NativeBackend, RecordingBackend, ScreenInfo, Screenshot};
pub use client::DriverClient;
pub use config::{BridgeConfig, DriverConfig, InputConfig};
pub use element::Element;
pub use error::{Error, Result};
pub use surface::{AutomationSurface, CoordinateSurface, DesktopSurface, SurfaceState, surface_for};
