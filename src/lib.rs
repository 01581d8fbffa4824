//! Keeps native overlays (camera, button, cover-view, ...) in lockstep with
//! the webview placeholders that stand in for them.
//!
//! A [`LifecycleDriver`] owns one overlay: it inserts it when the placeholder
//! attaches, sends an update whenever a rebuilt [`Snapshot`] differs from the
//! last applied one, and removes it on detach. Calls go through a [`Bridge`];
//! failures are absorbed and reported on the placeholder's `binderror` event.

pub mod adapter;
pub mod bridge;
pub mod channel_bridge;
pub mod components;
pub mod config;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod events;
pub mod protocol;
pub mod registry;
pub mod snapshot;

pub use crate::adapter::ShadowAdapter;
pub use crate::bridge::Bridge;
pub use crate::channel_bridge::ChannelBridge;
pub use crate::config::{SyncConfig, SyncPolicy};
pub use crate::descriptor::ShadowDescriptor;
pub use crate::driver::{LifecycleDriver, Phase, ShadowContext};
pub use crate::error::{BridgeError, SnapshotError};
pub use crate::events::{ERROR_EVENT, EventRouter, EventSink};
pub use crate::protocol::{HOST_TO_NATIVE_CAP, HostEnvelope, NATIVE_TO_HOST_CAP, NativeEnvelope};
pub use crate::registry::{CallbackRegistry, KindRegistry};
pub use crate::snapshot::{Geometry, Snapshot, SnapshotBuilder, SnapshotValue};
pub use serde_json;
