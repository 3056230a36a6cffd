//! Action dispatcher and interaction state.
//!
//! The [`Dispatcher`] owns the only mutable state in the process: the current
//! scene index and the dynamics flag. It is held by exactly one task, so
//! action handling is strictly sequential and needs no locking. Index and
//! flag updates are optimistic: they happen before the bridge call and are
//! not rolled back if the call fails, so local state can diverge from the
//! bridge after a failure.

use crate::bridge::{Bridge, StateUpdate, BRIGHTNESS_MAX};
use crate::input::Action;
use log::{info, warn};

/// Brightness change applied by one dim/brighten step.
pub const BRIGHTNESS_STEP: u8 = 25;

/// Saturating clamp onto the native brightness scale.
fn clamp_brightness(value: i32) -> u8 {
    value.clamp(0, i32::from(BRIGHTNESS_MAX)) as u8
}

/// Advance a scene index forward by one, wrapping modulo the list length.
/// `len` must be non-zero.
fn advance_index(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// Maps semantic actions onto bridge calls, owning the interaction state.
pub struct Dispatcher {
    bridge: Box<dyn Bridge>,
    scenes: Vec<String>,
    scene_index: usize,
    dynamics_enabled: bool,
}

impl Dispatcher {
    /// Build a dispatcher over the given bridge and scene list. Dynamics
    /// start enabled.
    pub fn new(bridge: Box<dyn Bridge>, scenes: Vec<String>) -> Self {
        Self {
            bridge,
            scenes,
            scene_index: 0,
            dynamics_enabled: true,
        }
    }

    /// Current scene index, meaningful only when the scene list is non-empty.
    pub fn scene_index(&self) -> usize {
        self.scene_index
    }

    /// Whether scene dynamics are currently enabled.
    pub fn dynamics_enabled(&self) -> bool {
        self.dynamics_enabled
    }

    /// Perform one action. Errors are contained here: logged and discarded,
    /// never propagated to the event loop.
    pub async fn handle(&mut self, action: Action) {
        match action {
            Action::TogglePower => self.toggle_power().await,
            Action::Dim => self.adjust_brightness(-i32::from(BRIGHTNESS_STEP)).await,
            Action::Brighten => self.adjust_brightness(i32::from(BRIGHTNESS_STEP)).await,
            Action::RotateScene => self.rotate_scene().await,
            Action::ToggleDynamics => self.toggle_dynamics().await,
        }
    }

    async fn toggle_power(&mut self) {
        let current = match self.bridge.get_group_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!("Error reading group state: {err}");
                return;
            }
        };

        info!(
            "Toggling group {}",
            if current.on { "off" } else { "on" }
        );
        let update = StateUpdate {
            on: !current.on,
            brightness: None,
        };
        if let Err(err) = self.bridge.set_group_state(&update).await {
            warn!("Error toggling group: {err}");
        }
    }

    async fn adjust_brightness(&mut self, delta: i32) {
        let current = match self.bridge.get_group_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!("Error reading group state: {err}");
                return;
            }
        };

        let target = clamp_brightness(i32::from(current.brightness) + delta);
        info!(
            "Adjusting brightness from {} to {}",
            current.brightness, target
        );
        let update = StateUpdate {
            on: true,
            brightness: Some(target),
        };
        if let Err(err) = self.bridge.set_group_state(&update).await {
            warn!("Error adjusting brightness: {err}");
        }
    }

    async fn rotate_scene(&mut self) {
        if self.scenes.is_empty() {
            info!("No scenes configured");
            return;
        }

        // Optimistic: the index stays advanced even if the recall fails.
        self.scene_index = advance_index(self.scene_index, self.scenes.len());
        let scene_id = self.scenes[self.scene_index].clone();

        info!("Recalling scene {scene_id} (index {})", self.scene_index);
        if let Err(err) = self.bridge.recall_scene(&scene_id).await {
            warn!("Error recalling scene {scene_id}: {err}");
        }
    }

    async fn toggle_dynamics(&mut self) {
        if self.scenes.is_empty() {
            info!("No scenes configured");
            return;
        }

        // Optimistic: the flag stays flipped even if the call fails.
        self.dynamics_enabled = !self.dynamics_enabled;
        let scene_id = self.scenes[self.scene_index].clone();

        match self
            .bridge
            .set_dynamics(&scene_id, self.dynamics_enabled)
            .await
        {
            Ok(()) => info!(
                "Scene {scene_id} dynamics {}",
                if self.dynamics_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            ),
            Err(err) if err.is_unsupported() => {
                info!("Scene dynamics not offered by this bridge API")
            }
            Err(err) => warn!("Error setting dynamics on scene {scene_id}: {err}"),
        }
    }
}
