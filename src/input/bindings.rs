//! Static mapping from raw key codes to semantic actions.
//!
//! The knob and scene-button codes are fixed properties of the physical
//! device (`sudo evtest` shows them); only the primary toggle code is
//! configurable.

/// Knob turned left: dim. (F18 on the device)
pub const KNOB_LEFT: u16 = 188;
/// Knob turned right: brighten. (F19 on the device)
pub const KNOB_RIGHT: u16 = 189;
/// Left scene button: toggle scene dynamics.
pub const SCENE_DYNAMICS: u16 = 185;
/// Right scene button: advance to and recall the next scene.
pub const SCENE_NEXT: u16 = 186;

/// Semantic actions the dispatcher can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePower,
    Dim,
    Brighten,
    RotateScene,
    ToggleDynamics,
}

/// Fixed code-to-action mapping, built once at startup.
#[derive(Debug, Clone, Copy)]
pub struct ActionBindings {
    toggle_code: u16,
}

impl ActionBindings {
    /// Build the bindings with the configured primary toggle code.
    pub fn new(toggle_code: u16) -> Self {
        Self { toggle_code }
    }

    /// Resolve a raw key code to its bound action. Unbound codes resolve to
    /// `None` and are silently ignored by the event loop.
    pub fn resolve(&self, code: u16) -> Option<Action> {
        if code == self.toggle_code {
            return Some(Action::TogglePower);
        }
        match code {
            KNOB_LEFT => Some(Action::Dim),
            KNOB_RIGHT => Some(Action::Brighten),
            SCENE_NEXT => Some(Action::RotateScene),
            SCENE_DYNAMICS => Some(Action::ToggleDynamics),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOGGLE_CODE;

    #[test]
    fn fixed_codes_resolve_to_their_actions() {
        let bindings = ActionBindings::new(DEFAULT_TOGGLE_CODE);
        assert_eq!(bindings.resolve(KNOB_LEFT), Some(Action::Dim));
        assert_eq!(bindings.resolve(KNOB_RIGHT), Some(Action::Brighten));
        assert_eq!(bindings.resolve(SCENE_NEXT), Some(Action::RotateScene));
        assert_eq!(bindings.resolve(SCENE_DYNAMICS), Some(Action::ToggleDynamics));
        assert_eq!(
            bindings.resolve(DEFAULT_TOGGLE_CODE),
            Some(Action::TogglePower)
        );
    }

    #[test]
    fn unbound_codes_resolve_to_none() {
        let bindings = ActionBindings::new(DEFAULT_TOGGLE_CODE);
        assert_eq!(bindings.resolve(30), None); // KEY_A
        assert_eq!(bindings.resolve(0), None);
    }

    #[test]
    fn custom_toggle_code_takes_precedence() {
        let bindings = ActionBindings::new(67);
        assert_eq!(bindings.resolve(67), Some(Action::TogglePower));
        assert_eq!(bindings.resolve(DEFAULT_TOGGLE_CODE), None);
    }
}
