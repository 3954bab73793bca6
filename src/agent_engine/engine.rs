use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::agent_engine::event_bus::{EventBus, HelperEvent};
use crate::agent_engine::state::{CycleGuard, CycleOutcome, CyclePhase, CycleReport, CycleState};
use crate::config::{ConfigHandle, HelperConfig};
use crate::errors::HelperError;
use crate::executor::dispatcher::{evaluate, Decision, Dispatcher};
use crate::executor::input::PointerDevice;
use crate::perception::detection::{detect_candidates, select_nearest};
use crate::perception::traits::HostUi;
use crate::strongbox::classifier::classify;

/// What a frame callback did.
#[derive(Debug)]
pub enum FrameOutcome {
    /// The master switch is off.
    Disabled,
    /// A cycle is still running; this frame is skipped.
    Busy,
    Launched(JoinHandle<CycleReport>),
}

/// Entry point for the host: call [`HelperEngine::on_frame`] once per frame.
pub struct HelperEngine {
    host: Arc<dyn HostUi>,
    pointer: Arc<dyn PointerDevice>,
    config: ConfigHandle,
    state: Arc<CycleState>,
    events: EventBus,
    runtime: Handle,
}

impl HelperEngine {
    pub fn new(
        host: Arc<dyn HostUi>,
        pointer: Arc<dyn PointerDevice>,
        config: ConfigHandle,
        runtime: Handle,
    ) -> Self {
        Self {
            host,
            pointer,
            config,
            state: Arc::new(CycleState::new()),
            events: EventBus::new(),
            runtime,
        }
    }

    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    pub fn phase(&self) -> CyclePhase {
        self.state.phase()
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<HelperEvent> {
        self.events.subscribe()
    }

    /// Starts a background cycle unless the helper is disabled or a cycle is
    /// already in flight. Never blocks.
    pub fn on_frame(&self) -> FrameOutcome {
        let config = self.config.snapshot();
        if !config.general.enable {
            return FrameOutcome::Disabled;
        }

        let Some(guard) = self.state.try_begin() else {
            tracing::trace!("cycle in flight; frame skipped");
            return FrameOutcome::Busy;
        };

        let cycle = self.cycle(config);
        FrameOutcome::Launched(self.runtime.spawn(cycle.run(guard)))
    }

    /// Runs one cycle on the current task. `None` if the helper is disabled or
    /// another cycle holds the token.
    pub async fn run_once(&self) -> Option<CycleReport> {
        let config = self.config.snapshot();
        if !config.general.enable {
            return None;
        }
        let guard = self.state.try_begin()?;
        Some(self.cycle(config).run(guard).await)
    }

    fn cycle(&self, config: HelperConfig) -> Cycle {
        Cycle {
            id: uuid::Uuid::new_v4(),
            host: Arc::clone(&self.host),
            dispatcher: Dispatcher::new(Arc::clone(&self.pointer), self.events.clone()),
            events: self.events.clone(),
            config,
        }
    }
}

/// One Evaluating → Triggering run with everything it needs moved in.
struct Cycle {
    id: uuid::Uuid,
    host: Arc<dyn HostUi>,
    dispatcher: Dispatcher,
    events: EventBus,
    config: HelperConfig,
}

impl Cycle {
    async fn run(self, guard: CycleGuard) -> CycleReport {
        self.events.send(HelperEvent::CycleStarted { cycle_id: self.id });

        let mut report = CycleReport {
            cycle_id: self.id,
            container: None,
            kind: None,
            outcome: CycleOutcome::NothingDetected,
            finished_at: chrono::Utc::now(),
        };
        let outcome = self.execute(&guard, &mut report).await;
        report.outcome = outcome;
        report.finished_at = chrono::Utc::now();

        drop(guard);
        tracing::debug!(cycle = %self.id, outcome = ?report.outcome, "cycle finished");
        self.events.send(HelperEvent::CycleFinished {
            report: report.clone(),
        });
        report
    }

    async fn execute(&self, guard: &CycleGuard, report: &mut CycleReport) -> CycleOutcome {
        let candidates = detect_candidates(self.host.as_ref());
        let Some(group) = select_nearest(candidates) else {
            return CycleOutcome::NothingDetected;
        };
        let container = group.into_representative();
        let kind = classify(&container.name);
        report.container = Some(container.name.clone());
        report.kind = kind;

        tracing::debug!(
            cycle = %self.id,
            name = %container.name,
            ?kind,
            distance = container.distance(),
            "strongbox selected"
        );
        self.events.send(HelperEvent::ContainerSelected {
            cycle_id: self.id,
            name: container.name.clone(),
            kind,
            distance: container.distance(),
        });

        let (action, node) = match evaluate(&container, &self.config) {
            Decision::Rejected(reason) => {
                tracing::debug!(cycle = %self.id, ?reason, "strongbox rejected");
                return CycleOutcome::Rejected { reason };
            }
            Decision::NoTrigger => return CycleOutcome::NoTrigger,
            Decision::Trigger { action, node } => (action, node),
        };

        tracing::info!(cycle = %self.id, name = %container.name, %action, "applying currency");
        self.events.send(HelperEvent::ActionChosen {
            cycle_id: self.id,
            action,
        });
        guard.enter_triggering();

        let window_origin = match self.host.window_origin() {
            Ok(origin) => origin,
            Err(e) => {
                tracing::error!(cycle = %self.id, error = %e, "game window position unavailable");
                return CycleOutcome::Failed { error: e.to_string() };
            }
        };

        match self
            .dispatcher
            .trigger(self.id, &container, action, node, window_origin, &self.config)
            .await
        {
            Ok(clicks) => {
                tracing::info!(cycle = %self.id, %action, clicks, "currency exhausted");
                CycleOutcome::Exhausted { action, clicks }
            }
            Err(HelperError::ClickCapExceeded { action, clicks }) => {
                tracing::warn!(
                    cycle = %self.id,
                    %action,
                    clicks,
                    "currency button still present at click cap; giving up on this strongbox for now"
                );
                CycleOutcome::CapExceeded { action, clicks }
            }
            Err(e) => {
                tracing::error!(cycle = %self.id, %action, error = %e, "applying currency failed");
                CycleOutcome::Failed { error: e.to_string() }
            }
        }
    }
}
