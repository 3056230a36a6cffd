//! Application orchestration layer.
//!
//! Wires the device source, action bindings and dispatcher together and runs
//! the event loop: one blocking input thread feeding one async consumer task
//! that owns all mutable state. Shutdown is signalled from outside via an
//! atomic flag; the loop itself runs for the lifetime of the process.

use crate::bridge;
use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::input::{ActionBindings, EvdevSource, EventSource};
use log::info;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;

pub mod runtime;

/// Application orchestrator: owns the components until `run` consumes them.
pub struct Application {
    dispatcher: Dispatcher,
    source: Box<dyn EventSource>,
    bindings: ActionBindings,
}

impl Application {
    /// Initialize all components. Failure here is fatal: an unreachable
    /// bridge or an unopenable input device stops the process before the
    /// event loop begins.
    pub async fn new(config: &Config) -> Result<Self> {
        let bridge = bridge::connect(config).await?;
        let source = EvdevSource::open(&config.device_path)?;
        if config.scenes.is_empty() {
            info!("No scenes configured; scene features disabled");
        }

        Ok(Self {
            dispatcher: Dispatcher::new(bridge, config.scenes.clone()),
            source: Box::new(source),
            bindings: ActionBindings::new(config.toggle_code),
        })
    }

    /// Run the event loop until the input thread ends or `shutdown` is set.
    ///
    /// The receiving side of the channel lives in this task, which is the
    /// sole owner of the dispatcher; actions are handled strictly in arrival
    /// order with no overlapping bridge calls.
    pub async fn run(self, shutdown: Arc<AtomicBool>) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _input_thread =
            runtime::spawn_input_thread(self.source, self.bindings, tx, shutdown);

        info!("Listening for input events");
        let mut dispatcher = self.dispatcher;
        while let Some(action) = rx.recv().await {
            dispatcher.handle(action).await;
        }
        Ok(())
    }
}
