//! Low-level input collection: blocking reads from an evdev node, translated
//! into primitive events the event loop can filter and forward.

use crate::error::{HuedialError, Result};
use evdev::Device;
use std::collections::VecDeque;
use std::path::Path;

/// Kernel event class for key/button events (EV_KEY).
pub const EV_KEY: u16 = 0x01;

/// Event value denoting a press-down transition (release is 0, autorepeat 2).
pub const KEY_PRESS: i32 = 1;

/// One raw event from the input device: `(class, code, value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub class: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    /// True for the only events the dispatcher cares about: a key-class event
    /// whose value denotes a press-down transition.
    pub fn is_key_press(&self) -> bool {
        self.class == EV_KEY && self.value == KEY_PRESS
    }
}

/// A live, in-order source of raw device events.
///
/// `next_event` blocks until the next event arrives. Implementations do no
/// filtering or coalescing; every event is surfaced exactly once.
pub trait EventSource: Send {
    fn next_event(&mut self) -> Result<RawEvent>;
}

/// [`EventSource`] backed by an evdev input node.
pub struct EvdevSource {
    device: Device,
    pending: VecDeque<RawEvent>,
}

impl EvdevSource {
    /// Open the input node at `path`. Failure here is fatal at startup.
    pub fn open(path: &Path) -> Result<Self> {
        let device = Device::open(path).map_err(|err| {
            HuedialError::device(format!("failed to open {}", path.display()), err)
        })?;

        Ok(Self {
            device,
            pending: VecDeque::new(),
        })
    }
}

impl EventSource for EvdevSource {
    fn next_event(&mut self) -> Result<RawEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(event);
            }

            // fetch_events blocks until the kernel delivers a batch; queue the
            // whole batch so ordering is preserved across calls.
            let events = self
                .device
                .fetch_events()
                .map_err(|err| HuedialError::device("failed to read events", err))?;

            for event in events {
                self.pending.push_back(RawEvent {
                    class: event.event_type().0,
                    code: event.code(),
                    value: event.value(),
                });
            }
        }
    }
}
