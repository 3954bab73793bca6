use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::agent_engine::state::CycleReport;
use crate::perception::types::CursorPos;
use crate::strongbox::kinds::{ActionKind, ContainerType};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HelperEvent {
    CycleStarted {
        cycle_id: uuid::Uuid,
    },
    ContainerSelected {
        cycle_id: uuid::Uuid,
        name: String,
        kind: Option<ContainerType>,
        distance: f32,
    },
    ActionChosen {
        cycle_id: uuid::Uuid,
        action: ActionKind,
    },
    Clicked {
        cycle_id: uuid::Uuid,
        action: ActionKind,
        at: CursorPos,
        click: u32,
    },
    CycleFinished {
        report: CycleReport,
    },
}

/// Fan-out of cycle progress to whoever is listening (overlay, logs, tests).
/// Sending never blocks and never fails the cycle.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<HelperEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HelperEvent> {
        self.tx.subscribe()
    }

    pub fn send(&self, event: HelperEvent) {
        // No subscribers is the normal case.
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
