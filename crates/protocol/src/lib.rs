//! Wire types for the WinAppDriver protocol.
//!
//! This crate contains the serde-serializable types used for communication
//! with a WinAppDriver process over JSON/HTTP. These types represent the
//! "protocol layer" - the shapes of data as they appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization
//! * 1:1 with protocol: Match the driver's WebDriver-flavored wire format,
//!   including its legacy JsonWireProtocol leftovers
//! * Stable: Changes only when the wire protocol changes
//!
//! Higher-level ergonomic APIs are built on top of these types in `wad-rs`.

pub mod actions;
pub mod types;

pub use actions::*;
pub use types::*;
