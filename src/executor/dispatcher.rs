//! Picks the currency to apply to the selected strongbox and clicks it until
//! the label stops offering it.
use std::sync::Arc;

use crate::agent_engine::event_bus::{EventBus, HelperEvent};
use crate::agent_engine::loop_control::ClickLoop;
use crate::agent_engine::state::RejectReason;
use crate::config::HelperConfig;
use crate::errors::{HelperError, HelperResult};
use crate::executor::coordinator::rect_center_on_desktop;
use crate::executor::input::PointerDevice;
use crate::perception::detection::DetectedContainer;
use crate::perception::tree_search::find_by_asset;
use crate::perception::types::{NodeRef, Point};
use crate::strongbox::classifier::classify;
use crate::strongbox::kinds::ActionKind;

/// Result of evaluating one strongbox.
pub enum Decision {
    Rejected(RejectReason),
    /// Nothing enabled is currently offered on the label.
    NoTrigger,
    Trigger { action: ActionKind, node: NodeRef },
}

impl std::fmt::Debug for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Rejected(reason) => f.debug_tuple("Rejected").field(reason).finish(),
            Decision::NoTrigger => f.write_str("NoTrigger"),
            Decision::Trigger { action, node } => f
                .debug_struct("Trigger")
                .field("action", action)
                .field("node", &format_args!("{:#x}", node.address()))
                .finish(),
        }
    }
}

/// Decides what, if anything, to do with `container`.
///
/// Type and distance checks come before any currency lookup, so a rejected
/// strongbox costs no tree search.
pub fn evaluate(container: &DetectedContainer, config: &HelperConfig) -> Decision {
    let kind = classify(&container.name);
    let settings = &config.strongboxes;

    let Some(kind) = kind else {
        return Decision::Rejected(RejectReason::UnknownType {
            name: container.name.clone(),
        });
    };
    if !settings.is_type_enabled(Some(kind)) {
        return Decision::Rejected(RejectReason::TypeDisabled { kind });
    }
    let max = config.general.max_distance;
    let distance = container.distance();
    if !distance.is_finite() || distance > max {
        return Decision::Rejected(RejectReason::TooFar { distance, max });
    }

    for action in settings.enabled_actions(kind) {
        match find_by_asset(Some(&container.label), action.asset_id()) {
            Ok(Some(node)) => return Decision::Trigger { action, node },
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%action, error = %e, "currency lookup failed; treating as absent");
            }
        }
    }

    Decision::NoTrigger
}

/// Drives the pointer for one cycle.
pub struct Dispatcher {
    pointer: Arc<dyn PointerDevice>,
    events: EventBus,
}

impl Dispatcher {
    pub fn new(pointer: Arc<dyn PointerDevice>, events: EventBus) -> Self {
        Self { pointer, events }
    }

    /// Clicks `first` and keeps clicking while the label still shows a button
    /// for `action`. Returns the number of clicks.
    ///
    /// When `restore_cursor` is set the cursor goes back to where it started,
    /// whatever the loop's outcome.
    pub async fn trigger(
        &self,
        cycle_id: uuid::Uuid,
        container: &DetectedContainer,
        action: ActionKind,
        first: NodeRef,
        window_origin: Point,
        config: &HelperConfig,
    ) -> HelperResult<u32> {
        let restore_to = if config.general.restore_cursor {
            match self.pointer.position().await {
                Ok(pos) => Some(pos),
                Err(e) => {
                    tracing::warn!(error = %e, "could not read cursor position; it will not be restored");
                    None
                }
            }
        } else {
            None
        };

        let result = self
            .click_until_gone(cycle_id, container, action, first, window_origin, config)
            .await;

        if let Some(pos) = restore_to {
            if let Err(e) = self.pointer.move_to(pos).await {
                tracing::warn!(error = %e, x = pos.x, y = pos.y, "cursor restore failed");
            }
        }

        result
    }

    async fn click_until_gone(
        &self,
        cycle_id: uuid::Uuid,
        container: &DetectedContainer,
        action: ActionKind,
        first: NodeRef,
        window_origin: Point,
        config: &HelperConfig,
    ) -> HelperResult<u32> {
        let timing = &config.timing;
        let mut ctl = ClickLoop::new(config.general.max_clicks_per_cycle);
        let mut node = first;

        loop {
            let target = rect_center_on_desktop(&node.client_rect()?, window_origin);

            self.pointer.move_to(target).await?;
            tokio::time::sleep(timing.move_settle()).await;
            self.pointer.left_down().await?;
            tokio::time::sleep(timing.press_settle()).await;
            self.pointer.left_up().await?;
            tokio::time::sleep(timing.click_interval()).await;

            ctl.record_click();
            tracing::debug!(%action, x = target.x, y = target.y, click = ctl.clicks(), "clicked");
            self.events.send(HelperEvent::Clicked {
                cycle_id,
                action,
                at: target,
                click: ctl.clicks(),
            });

            match find_by_asset(Some(&container.label), action.asset_id()) {
                Ok(Some(next)) => {
                    if ctl.cap_reached() {
                        return Err(HelperError::ClickCapExceeded {
                            action,
                            clicks: ctl.clicks(),
                        });
                    }
                    node = next;
                }
                Ok(None) => return Ok(ctl.clicks()),
                Err(e) => {
                    // The label itself goes away once the strongbox is opened.
                    tracing::debug!(%action, error = %e, "label unreadable after click; stopping");
                    return Ok(ctl.clicks());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::config::TimingConfig;
    use crate::perception::snapshot::Element;
    use crate::perception::types::{CursorPos, EntityHandle, Rect};
    use crate::strongbox::kinds::{ActionFlags, ContainerType};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Input {
        Move(CursorPos),
        Down,
        Up,
    }

    /// Records input and optionally removes a node from the tree on release.
    #[derive(Default)]
    struct FakePointer {
        log: Mutex<Vec<Input>>,
        on_release: Mutex<Option<Box<dyn FnMut() + Send>>>,
    }

    impl FakePointer {
        fn inputs(&self) -> Vec<Input> {
            self.log.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PointerDevice for FakePointer {
        async fn position(&self) -> HelperResult<CursorPos> {
            Ok(CursorPos::new(5, 5))
        }

        async fn move_to(&self, pos: CursorPos) -> HelperResult<()> {
            self.log.lock().unwrap().push(Input::Move(pos));
            Ok(())
        }

        async fn left_down(&self) -> HelperResult<()> {
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

    fn config() -> HelperConfig {
        let mut config = HelperConfig::default();
        config.timing = TimingConfig::IMMEDIATE;
        config
    }

    fn container(name: &str, distance: f32, label: Arc<Element>) -> DetectedContainer {
        DetectedContainer {
            entity: EntityHandle {
                id: 1,
                metadata: "Metadata/Chests/StrongBoxes/Ornate".into(),
                distance_to_player: distance,
            },
            label,
            name: name.into(),
            anchor: Point::new(0.0, 0.0),
        }
    }

    fn label_with(actions: &[ActionKind]) -> Arc<Element> {
        let root = Element::empty(Rect::new(0.0, 0.0, 200.0, 40.0));
        root.push_child(Element::labelled("Ornate Strongbox", Rect::new(0.0, 0.0, 200.0, 20.0)));
        for (i, action) in actions.iter().enumerate() {
            let x = 10.0 + 30.0 * i as f32;
            root.push_child(Element::icon(action.asset_id(), Rect::new(x, 20.0, 20.0, 20.0)));
        }
        root
    }

    #[test]
    fn rejections_come_before_lookup() {
        let cfg = config();
        let label = label_with(&[ActionKind::Wisdom]);

        let d = evaluate(&container("Mystery Box", 10.0, label.clone()), &cfg);
        assert!(matches!(d, Decision::Rejected(RejectReason::UnknownType { .. })));

        let d = evaluate(&container("Ornate Strongbox", 60.0, label.clone()), &cfg);
        assert!(matches!(d, Decision::Rejected(RejectReason::TooFar { distance, max }) if distance == 60.0 && max == 50.0));

        let d = evaluate(&container("Ornate Strongbox", 50.0, label.clone()), &cfg);
        assert!(matches!(d, Decision::Trigger { action: ActionKind::Wisdom, .. }));

        let mut cfg = cfg;
        cfg.strongboxes.set_type_enabled(ContainerType::Ornate, false);
        let d = evaluate(&container("Ornate Strongbox", 10.0, label), &cfg);
        assert!(matches!(
            d,
            Decision::Rejected(RejectReason::TypeDisabled { kind: ContainerType::Ornate })
        ));
    }

    #[test]
    fn unreadable_distance_is_too_far() {
        let cfg = config();
        for distance in [f32::NAN, f32::INFINITY] {
            let d = evaluate(&container("Ornate Strongbox", distance, label_with(&[ActionKind::Wisdom])), &cfg);
            assert!(
                matches!(d, Decision::Rejected(RejectReason::TooFar { max, .. }) if max == 50.0),
                "{distance}: {d:?}"
            );
        }
    }

    #[test]
    fn first_enabled_visible_action_wins() {
        let mut cfg = config();
        let label = label_with(&[ActionKind::Regal, ActionKind::Augment, ActionKind::Exalted]);
        let boxed = container("Ornate Strongbox", 10.0, label);

        let d = evaluate(&boxed, &cfg);
        assert!(matches!(d, Decision::Trigger { action: ActionKind::Augment, .. }));

        cfg.strongboxes.set_action_enabled(ContainerType::Ornate, ActionKind::Augment, false);
        let d = evaluate(&boxed, &cfg);
        assert!(matches!(d, Decision::Trigger { action: ActionKind::Regal, .. }));

        *cfg.strongboxes.currencies.get_mut(ContainerType::Ornate) = ActionFlags::NONE;
        assert!(matches!(evaluate(&boxed, &cfg), Decision::NoTrigger));
    }

    #[tokio::test]
    async fn clicks_until_button_disappears_then_restores() {
        let cfg = config();
        let label = label_with(&[ActionKind::Alchemy]);
        let boxed = container("Ornate Strongbox", 10.0, label.clone());

        let pointer = Arc::new(FakePointer::default());
        let label_for_hook = label.clone();
        *pointer.on_release.lock().unwrap() = Some(Box::new(move || {
            label_for_hook.clear_children();
        }));

        let Decision::Trigger { action, node } = evaluate(&boxed, &cfg) else {
            panic!("expected a trigger");
        };
        let dispatcher = Dispatcher::new(pointer.clone(), EventBus::new());
        let clicks = dispatcher
            .trigger(uuid::Uuid::new_v4(), &boxed, action, node, Point::new(100.0, 200.0), &cfg)
            .await
            .unwrap();

        assert_eq!(clicks, 1);
        assert_eq!(
            pointer.inputs(),
            vec![
                Input::Move(CursorPos::new(120, 230)),
                Input::Down,
                Input::Up,
                Input::Move(CursorPos::new(5, 5)),
            ]
        );
    }

    #[tokio::test]
    async fn stuck_button_hits_the_cap() {
        let mut cfg = config();
        cfg.general.max_clicks_per_cycle = 3;
        cfg.general.restore_cursor = false;
        let label = label_with(&[ActionKind::Wisdom]);
        let boxed = container("Ornate Strongbox", 10.0, label);

        let pointer = Arc::new(FakePointer::default());
        let Decision::Trigger { action, node } = evaluate(&boxed, &cfg) else {
            panic!("expected a trigger");
        };
        let dispatcher = Dispatcher::new(pointer.clone(), EventBus::new());
        let err = dispatcher
            .trigger(uuid::Uuid::new_v4(), &boxed, action, node, Point::default(), &cfg)
            .await
            .unwrap_err();

        assert!(matches!(err, HelperError::ClickCapExceeded { action: ActionKind::Wisdom, clicks: 3 }));
        // Wisdom icon (10, 20, 20, 20); no restore move at the end.
        let click = [Input::Move(CursorPos::new(20, 30)), Input::Down, Input::Up];
        assert_eq!(pointer.inputs(), click.repeat(3));
    }
}
