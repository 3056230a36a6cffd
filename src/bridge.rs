//! Bridge abstraction over the two lighting-backend API generations.
//!
//! The control core only ever sees the [`Bridge`] trait: four capability
//! operations plus a startup health check. The v1 flat API and the v2
//! resource-graph API each get a concrete implementation, and any knowledge of
//! which generation is active stays inside this module.

use crate::config::{ApiGeneration, Config};
use crate::error::Result;
use async_trait::async_trait;

pub mod v1;
pub mod v2;

pub use v1::V1Bridge;
pub use v2::V2Bridge;

/// Maximum brightness on the bridge's native scale.
pub const BRIGHTNESS_MAX: u8 = 254;

/// Last-known or desired power/brightness of the controlled light group.
///
/// Brightness is on the native 0..=254 scale regardless of what the active
/// backend speaks on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupState {
    pub on: bool,
    pub brightness: u8,
}

/// Desired state for a group write.
///
/// `brightness: None` means "power change only, leave brightness alone".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateUpdate {
    pub on: bool,
    pub brightness: Option<u8>,
}

/// Capability contract presented to the control core.
///
/// Implementations must not retry: callers decide how to handle a failed call.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Read the current state of the target light group.
    async fn get_group_state(&self) -> Result<GroupState>;

    /// Write a new state to the target light group.
    async fn set_group_state(&self, update: &StateUpdate) -> Result<()>;

    /// Recall a stored scene by identifier.
    async fn recall_scene(&self, scene_id: &str) -> Result<()>;

    /// Enable or disable automatic dynamics on a scene.
    ///
    /// Returns `Unsupported` on backend generations without the capability;
    /// the caller decides whether that is benign.
    async fn set_dynamics(&self, scene_id: &str, enabled: bool) -> Result<()>;

    /// Cheap reachability check, called once at startup before the event loop.
    async fn verify(&self) -> Result<()>;
}

/// Construct the bridge implementation selected by configuration and verify
/// it is reachable.
pub async fn connect(config: &Config) -> Result<Box<dyn Bridge>> {
    let bridge: Box<dyn Bridge> = match config.api {
        ApiGeneration::V1 => Box::new(V1Bridge::new(config)?),
        ApiGeneration::V2 => Box::new(V2Bridge::new(config)?),
    };
    bridge.verify().await?;
    Ok(bridge)
}

/// Convert a native 0..=254 brightness to the percent scale used by the
/// resource-graph API.
pub(crate) fn native_to_percent(native: u8) -> f64 {
    f64::from(native) / f64::from(BRIGHTNESS_MAX) * 100.0
}

/// Convert a percent brightness back to the native 0..=254 scale.
pub(crate) fn percent_to_native(percent: f64) -> u8 {
    let native = (percent / 100.0 * f64::from(BRIGHTNESS_MAX)).round();
    native.clamp(0.0, f64::from(BRIGHTNESS_MAX)) as u8
}
