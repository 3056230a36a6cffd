//! End-to-end tests for the input-thread -> channel -> dispatcher pipeline,
//! using a scripted event source and a recording bridge in place of the real
//! device and network.

use async_trait::async_trait;
use huedial::app::runtime::spawn_input_thread;
use huedial::bridge::{Bridge, GroupState, StateUpdate};
use huedial::error::{HuedialError, Result};
use huedial::input::{bindings, Action, ActionBindings, EventSource, RawEvent};
use huedial::Dispatcher;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{timeout, Duration};

const TIMEOUT_MS: u64 = 500;
const EV_KEY: u16 = 0x01;
const EV_SYN: u16 = 0x00;
const TOGGLE_CODE: u16 = 187;

/// Event source that replays a fixed script, then blocks forever.
struct ScriptedSource {
    script: VecDeque<Result<RawEvent>>,
}

impl ScriptedSource {
    fn new(script: Vec<Result<RawEvent>>) -> Self {
        Self {
            script: script.into(),
        }
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> Result<RawEvent> {
        match self.script.pop_front() {
            Some(event) => event,
            None => loop {
                // Script exhausted; behave like a quiet device.
                std::thread::park();
            },
        }
    }
}

fn key(code: u16, value: i32) -> Result<RawEvent> {
    Ok(RawEvent {
        class: EV_KEY,
        code,
        value,
    })
}

async fn next_action(rx: &mut UnboundedReceiver<Action>) -> Action {
    timeout(Duration::from_millis(TIMEOUT_MS), rx.recv())
        .await
        .expect("action timed out")
        .expect("action channel closed unexpectedly")
}

fn spawn_pipeline(script: Vec<Result<RawEvent>>) -> UnboundedReceiver<Action> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    let shutdown = Arc::new(AtomicBool::new(false));
    spawn_input_thread(
        Box::new(ScriptedSource::new(script)),
        ActionBindings::new(TOGGLE_CODE),
        tx,
        shutdown,
    );
    rx
}

#[tokio::test]
async fn presses_are_forwarded_in_order() {
    let mut rx = spawn_pipeline(vec![
        key(TOGGLE_CODE, 1),
        key(bindings::KNOB_RIGHT, 1),
        key(bindings::SCENE_NEXT, 1),
    ]);

    assert_eq!(next_action(&mut rx).await, Action::TogglePower);
    assert_eq!(next_action(&mut rx).await, Action::Brighten);
    assert_eq!(next_action(&mut rx).await, Action::RotateScene);
}

#[tokio::test]
async fn releases_non_key_events_and_unbound_codes_are_dropped() {
    let mut rx = spawn_pipeline(vec![
        key(TOGGLE_CODE, 0),                // release
        key(TOGGLE_CODE, 2),                // autorepeat
        Ok(RawEvent {
            class: EV_SYN,
            code: 0,
            value: 1,
        }),                                 // non-key class
        key(30, 1),                         // unbound code (KEY_A)
        key(bindings::KNOB_LEFT, 1),        // the one qualifying press
    ]);

    assert_eq!(next_action(&mut rx).await, Action::Dim);
    assert!(
        timeout(Duration::from_millis(100), rx.recv()).await.is_err(),
        "no further actions expected"
    );
}

#[tokio::test]
async fn read_errors_do_not_end_the_session() {
    let mut rx = spawn_pipeline(vec![
        Err(HuedialError::device(
            "spurious read",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        )),
        key(bindings::KNOB_RIGHT, 1),
    ]);

    assert_eq!(next_action(&mut rx).await, Action::Brighten);
}

/// Bridge double used to observe the dispatcher from the outside.
struct RecordingBridge {
    state: GroupState,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Bridge for RecordingBridge {
    async fn get_group_state(&self) -> Result<GroupState> {
        self.calls.lock().unwrap().push("get".to_string());
        Ok(self.state)
    }

    async fn set_group_state(&self, update: &StateUpdate) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("set on={} bri={:?}", update.on, update.brightness));
        Ok(())
    }

    async fn recall_scene(&self, scene_id: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("recall {scene_id}"));
        Ok(())
    }

    async fn set_dynamics(&self, scene_id: &str, enabled: bool) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("dynamics {scene_id} {enabled}"));
        Ok(())
    }

    async fn verify(&self) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn full_pipeline_drives_the_bridge_in_press_order() {
    let mut rx = spawn_pipeline(vec![
        key(bindings::SCENE_NEXT, 1),
        key(bindings::SCENE_NEXT, 1),
        key(bindings::SCENE_DYNAMICS, 1),
        key(TOGGLE_CODE, 1),
    ]);

    let calls = Arc::new(Mutex::new(Vec::new()));
    let bridge = RecordingBridge {
        state: GroupState {
            on: true,
            brightness: 120,
        },
        calls: Arc::clone(&calls),
    };
    let mut dispatcher = Dispatcher::new(
        Box::new(bridge),
        vec!["s1".to_string(), "s2".to_string(), "s3".to_string()],
    );

    for _ in 0..4 {
        let action = next_action(&mut rx).await;
        dispatcher.handle(action).await;
    }

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "recall s2".to_string(),
            "recall s3".to_string(),
            "dynamics s3 false".to_string(),
            "get".to_string(),
            "set on=false bri=None".to_string(),
        ]
    );
    assert_eq!(dispatcher.scene_index(), 2);
    assert!(!dispatcher.dynamics_enabled());
}
