//! # huedial - Rotary-Knob Lighting Bridge Daemon
//!
//! A small daemon that turns key presses from a rotary knob and scene buttons
//! (a kernel evdev device) into state changes on a Hue-style lighting bridge,
//! speaking either the v1 flat HTTP API or the v2 resource-graph HTTP API.
//!
//! ## Architecture
//!
//! The library is organized into focused modules:
//!
//! - [`error`] - Centralized error types and handling
//! - [`config`] - Process configuration (flags, environment, defaults)
//! - [`bridge`] - Capability trait over the two bridge API generations
//! - [`input`] - Device-event source and key-code-to-action bindings
//! - [`dispatch`] - Action dispatcher owning the interaction state
//! - [`app`] - Event loop and component coordination

// Core modules
pub mod bridge;
pub mod config;
pub mod error;

// Input and control
pub mod dispatch;
pub mod input;

// Orchestration
pub mod app;

// Re-export commonly used types for convenience
pub use error::{HuedialError, Result};

// Public API surface for external usage
pub use app::Application;
pub use bridge::{Bridge, GroupState, StateUpdate};
pub use dispatch::Dispatcher;
pub use input::{Action, ActionBindings};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
