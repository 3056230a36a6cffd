use crate::input::{Action, ActionBindings, EventSource};
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Spawn a blocking thread that reads device events and forwards bound key
/// presses onto a channel as actions.
///
/// Read errors are logged and the loop continues; a single corrupt read must
/// not end the session. Release/autorepeat events, non-key events and unbound
/// codes are dropped here and never reach the dispatcher.
pub fn spawn_input_thread(
    mut source: Box<dyn EventSource>,
    bindings: ActionBindings,
    tx: UnboundedSender<Action>,
    shutdown: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !shutdown.load(Ordering::SeqCst) {
            let event = match source.next_event() {
                Ok(event) => event,
                Err(err) => {
                    warn!("Error reading input event: {err}");
                    continue;
                }
            };

            if !event.is_key_press() {
                continue;
            }
            debug!("Key press: code={}", event.code);

            if let Some(action) = bindings.resolve(event.code) {
                if tx.send(action).is_err() {
                    // Consumer is gone; nothing left to do.
                    break;
                }
            }
        }
    })
}
