use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::strongbox::kinds::{ActionKind, ContainerType};

/// Lifecycle phases of a dispatch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Idle = 0,
    Evaluating = 1,
    Triggering = 2,
}

impl CyclePhase {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => CyclePhase::Evaluating,
            2 => CyclePhase::Triggering,
            _ => CyclePhase::Idle,
        }
    }
}

/// Shared token guaranteeing at most one dispatch cycle in flight.
#[derive(Debug)]
pub struct CycleState {
    phase: AtomicU8,
}

impl CycleState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(CyclePhase::Idle as u8),
        }
    }

    pub fn phase(&self) -> CyclePhase {
        CyclePhase::from_u8(self.phase.load(Ordering::Acquire))
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == CyclePhase::Idle
    }

    /// Idle → Evaluating. `None` if a cycle is already running.
    pub fn try_begin(self: &Arc<Self>) -> Option<CycleGuard> {
        self.phase
            .compare_exchange(
                CyclePhase::Idle as u8,
                CyclePhase::Evaluating as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .ok()
            .map(|_| CycleGuard {
                state: Arc::clone(self),
            })
    }
}

impl Default for CycleState {
    fn default() -> Self {
        Self::new()
    }
}

/// Held by the running cycle; dropping it returns the state to Idle.
#[derive(Debug)]
pub struct CycleGuard {
    state: Arc<CycleState>,
}

impl CycleGuard {
    pub fn enter_triggering(&self) {
        self.state
            .phase
            .store(CyclePhase::Triggering as u8, Ordering::Release);
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.phase()
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.state
            .phase
            .store(CyclePhase::Idle as u8, Ordering::Release);
    }
}

/// Why the selected strongbox was left alone.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    UnknownType { name: String },
    TypeDisabled { kind: ContainerType },
    TooFar { distance: f32, max: f32 },
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CycleOutcome {
    NothingDetected,
    Rejected { reason: RejectReason },
    NoTrigger,
    /// The trigger disappeared after `clicks` clicks.
    Exhausted { action: ActionKind, clicks: u32 },
    /// The trigger was still there when the click cap was reached.
    CapExceeded { action: ActionKind, clicks: u32 },
    Failed { error: String },
}

/// Summary of one dispatch cycle.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CycleReport {
    pub cycle_id: uuid::Uuid,
    pub container: Option<String>,
    pub kind: Option<ContainerType>,
    pub outcome: CycleOutcome,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl CycleReport {
    pub fn clicks(&self) -> u32 {
        match self.outcome {
            CycleOutcome::Exhausted { clicks, .. } | CycleOutcome::CapExceeded { clicks, .. } => clicks,
            _ => 0,
        }
    }
}
