#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strongbox_helper::perception::snapshot::Element;
use strongbox_helper::{
    ActionKind, CursorPos, EntityHandle, HelperConfig, HelperError, HelperResult, PointerDevice, Rect,
};
use tokio::sync::Notify;

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Move(CursorPos),
    Down,
    Up,
}

/// Records every input; can hold the first press until released by the test
/// and can mutate the UI tree on release, like the game consuming a currency.
#[derive(Default)]
pub struct RecordingPointer {
    log: Mutex<Vec<Input>>,
    on_release: Mutex<Option<Box<dyn FnMut() + Send>>>,
    gate: Mutex<Option<Arc<Notify>>>,
    fail_presses: AtomicBool,
}

impl RecordingPointer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inputs(&self) -> Vec<Input> {
        self.log.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> usize {
        self.inputs().iter().filter(|i| **i == Input::Down).count()
    }

    pub fn on_release(&self, hook: impl FnMut() + Send + 'static) {
        *self.on_release.lock().unwrap() = Some(Box::new(hook));
    }

    /// Every later press errors before reaching the device.
    pub fn fail_presses(&self) {
        self.fail_presses.store(true, Ordering::SeqCst);
    }

    /// The next press waits until the returned notify fires.
    pub fn hold_next_press(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }
}

pub const START: CursorPos = CursorPos::new(640, 360);

#[async_trait]
impl PointerDevice for RecordingPointer {
    async fn position(&self) -> HelperResult<CursorPos> {
        Ok(START)
    }

    async fn move_to(&self, pos: CursorPos) -> HelperResult<()> {
        self.log.lock().unwrap().push(Input::Move(pos));
        Ok(())
    }

    async fn left_down(&self) -> HelperResult<()> {
        if self.fail_presses.load(Ordering::SeqCst) {
            return Err(HelperError::Input("button stuck".into()));
        }
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.log.lock().unwrap().push(Input::Down);
        Ok(())
    }

    async fn left_up(&self) -> HelperResult<()> {
        self.log.lock().unwrap().push(Input::Up);
        if let Some(hook) = self.on_release.lock().unwrap().as_mut() {
            hook();
        }
        Ok(())
    }
}

pub fn test_config() -> HelperConfig {
    let mut config = HelperConfig::default();
    config.timing = strongbox_helper::config::TimingConfig::IMMEDIATE;
    config
}

pub fn strongbox_entity(id: u64, distance: f32) -> EntityHandle {
    EntityHandle {
        id,
        metadata: "Metadata/Chests/StrongBoxes/StrongboxDivination".into(),
        distance_to_player: distance,
    }
}

/// Label subtree: name text plus one icon per action, laid out left to right.
/// Returns the root and the icons in `actions` order.
pub fn strongbox_label(name: &str, left: f32, actions: &[ActionKind]) -> (Arc<Element>, Vec<Arc<Element>>) {
    let root = Element::empty(Rect::new(left, 100.0, 240.0, 60.0));
    let header = Element::empty(Rect::new(left, 100.0, 240.0, 30.0))
        .with_children(vec![Element::labelled(name, Rect::new(left, 100.0, 240.0, 30.0))]);
    root.push_child(header);

    let icons: Vec<Arc<Element>> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let x = left + 8.0 + 40.0 * i as f32;
            Element::icon(action.asset_id(), Rect::new(x, 130.0, 32.0, 32.0))
        })
        .collect();
    for icon in &icons {
        root.push_child(icon.clone());
    }
    (root, icons)
}
