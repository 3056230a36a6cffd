//! Input-device handling.
//!
//! [`raw`] collects events from the kernel input node and exposes them behind
//! the [`EventSource`] trait; [`bindings`] resolves raw key codes into the
//! semantic actions the dispatcher understands.

pub mod bindings;
pub mod raw;

pub use bindings::{Action, ActionBindings};
pub use raw::{EvdevSource, EventSource, RawEvent};
