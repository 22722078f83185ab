//! Host-plugin integration: widgets, heartbeat and the session context
//!
//! The plugin host calls into this layer three ways: once at startup, on
//! every inbound widget command, and on every periodic heartbeat tick. All
//! three funnel into [`session::PluginSession`], which owns the device and
//! serializes access to it.

pub mod heartbeat;
pub mod host;
pub mod session;
pub mod units;

pub use heartbeat::{CommandBuffer, Heartbeat};
pub use host::{HostRuntime, WidgetKind, WidgetSpec, WidgetValue};
pub use session::PluginSession;
pub use units::{unit_ids, Unit};
