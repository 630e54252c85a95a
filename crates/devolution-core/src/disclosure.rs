//! Exclusive-open accordion
//!
//! The accordion is either `Closed` or `OpenAt(k)`; `toggle` is its only
//! mutator. Each panel additionally runs its own phase machine so the
//! measure-then-animate open is explicit:
//!
//! ```text
//! Closed -> Measuring -> Animating(h) -> Open
//!    ^          |             |           |
//!    +--------- Closing <-----+-----------+
//! ```
//!
//! Height cannot be tweened to "auto", so opening first switches the panel to
//! auto height on the next frame, reads the pixel height and then tweens
//! 0 -> h. Cancelling during `Measuring` drops straight back to `Closed`.

use tracing::{debug, warn};

use crate::capability::MotionProfile;
use crate::config::MotionConfig;
use crate::content::FaqEntry;
use crate::motion::{AnimationHandle, Easing, Property, Props, Repeat, TransitionEngine, TweenOptions};
use crate::scene::{ElementId, Scene};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionState {
    Closed,
    OpenAt(usize),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelPhase {
    Closed,
    /// Waiting one frame for the natural height
    Measuring,
    Animating {
        height: f64,
        handle: Option<AnimationHandle>,
    },
    Open,
    Closing {
        handle: Option<AnimationHandle>,
    },
}

/// Elements of one FAQ card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemElements {
    pub card: ElementId,
    pub label: ElementId,
    pub icon: ElementId,
    pub content: ElementId,
}

impl ItemElements {
    fn all(&self) -> [ElementId; 4] {
        [self.card, self.label, self.icon, self.content]
    }
}

#[derive(Debug, Clone)]
pub struct DisclosureItem {
    pub entry: FaqEntry,
    pub elements: ItemElements,
    measured_height: Option<f64>,
    phase: PanelPhase,
}

impl DisclosureItem {
    pub fn new(entry: FaqEntry, elements: ItemElements) -> Self {
        Self {
            entry,
            elements,
            measured_height: None,
            phase: PanelPhase::Closed,
        }
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Natural content height captured by the most recent open
    pub fn measured_height(&self) -> Option<f64> {
        self.measured_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Opened {
        index: usize,
        displaced: Option<usize>,
    },
    Closed(usize),
    /// Torn down, out of range, or the item's elements are gone
    Ignored,
}

#[derive(Debug)]
pub struct DisclosureController {
    items: Vec<DisclosureItem>,
    state: AccordionState,
    config: MotionConfig,
    profile: MotionProfile,
    torn_down: bool,
}

impl DisclosureController {
    pub fn new(items: Vec<DisclosureItem>, config: MotionConfig, profile: MotionProfile) -> Self {
        Self {
            items,
            state: AccordionState::Closed,
            config,
            profile,
            torn_down: false,
        }
    }

    pub fn state(&self) -> AccordionState {
        self.state
    }

    pub fn open_index(&self) -> Option<usize> {
        match self.state {
            AccordionState::OpenAt(i) => Some(i),
            AccordionState::Closed => None,
        }
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.state == AccordionState::OpenAt(index)
    }

    pub fn items(&self) -> &[DisclosureItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self, index: usize) -> Option<PanelPhase> {
        self.items.get(index).map(|i| i.phase)
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Closed styling every card starts with
    pub fn apply_closed_styles(&self, scene: &mut Scene, engine: &mut TransitionEngine) {
        for item in &self.items {
            let el = item.elements;
            engine.set(scene, el.content, &Props::new().height(0.0).opacity(0.0));
            engine.set(scene, el.icon, &Props::new().rotation(0.0));
            engine.set(scene, el.label, &Props::new().color(self.config.label_color));
        }
    }

    /// Open `index`, or close it when it is already open
    ///
    /// Order matters: the old state is read, the displaced item starts
    /// closing, the new state is written, then the new item starts opening.
    pub fn toggle(
        &mut self,
        scene: &mut Scene,
        engine: &mut TransitionEngine,
        index: usize,
    ) -> ToggleOutcome {
        if self.torn_down {
            debug!(index, "toggle after teardown ignored");
            return ToggleOutcome::Ignored;
        }
        let Some(item) = self.items.get(index) else {
            debug!(index, "toggle out of range ignored");
            return ToggleOutcome::Ignored;
        };
        if !item.elements.all().iter().all(|el| scene.contains(*el)) {
            debug!(index, "toggle on unresolved item ignored");
            return ToggleOutcome::Ignored;
        }

        match self.state {
            AccordionState::OpenAt(open) if open == index => {
                self.close(scene, engine, index, self.config.close_duration_ms);
                self.state = AccordionState::Closed;
                debug!(index, "accordion closed");
                ToggleOutcome::Closed(index)
            }
            previous => {
                let displaced = match previous {
                    AccordionState::OpenAt(open) => {
                        self.close(scene, engine, open, self.config.close_previous_duration_ms);
                        Some(open)
                    }
                    AccordionState::Closed => None,
                };
                self.state = AccordionState::OpenAt(index);
                self.open(scene, engine, index);
                debug!(index, ?displaced, "accordion opened");
                ToggleOutcome::Opened { index, displaced }
            }
        }
    }

    /// Second half of the open: measure panels waiting for it and start
    /// their height tween
    pub fn on_frame(&mut self, scene: &mut Scene, engine: &mut TransitionEngine) {
        if self.torn_down {
            return;
        }
        for index in 0..self.items.len() {
            if self.items[index].phase != PanelPhase::Measuring {
                continue;
            }
            let content = self.items[index].elements.content;
            match scene.measure_auto_height(content) {
                Some(height) => {
                    let handle = engine.animate(
                        scene,
                        content,
                        Some(&Props::new().height(0.0).opacity(0.0)),
                        &Props::new().height(height).opacity(1.0),
                        TweenOptions::millis(self.config.open_duration_ms)
                            .easing(Easing::Power2Out),
                    );
                    let item = &mut self.items[index];
                    item.measured_height = Some(height);
                    item.phase = match handle {
                        Some(handle) => PanelPhase::Animating {
                            height,
                            handle: Some(handle),
                        },
                        None => PanelPhase::Open,
                    };
                }
                None => {
                    warn!(index, "panel vanished while measuring, falling back to closed");
                    self.items[index].phase = PanelPhase::Closed;
                    if self.state == AccordionState::OpenAt(index) {
                        self.state = AccordionState::Closed;
                        self.restore_header(scene, engine, index);
                    }
                }
            }
        }
    }

    /// Advance panel phases when their height tween finishes
    pub fn on_finished(&mut self, handle: AnimationHandle) -> bool {
        for item in self.items.iter_mut() {
            match item.phase {
                PanelPhase::Animating {
                    handle: Some(h), ..
                } if h == handle => {
                    item.phase = PanelPhase::Open;
                    return true;
                }
                PanelPhase::Closing { handle: Some(h) } if h == handle => {
                    item.phase = PanelPhase::Closed;
                    return true;
                }
                _ => {}
            }
        }
        false
    }

    /// Stop every tween on every card and freeze the state
    pub fn teardown(&mut self, engine: &mut TransitionEngine) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        for item in &self.items {
            for el in item.elements.all() {
                engine.kill_all(el);
            }
        }
        debug!(state = ?self.state, "accordion torn down");
    }

    fn close(
        &mut self,
        scene: &mut Scene,
        engine: &mut TransitionEngine,
        index: usize,
        duration_ms: u64,
    ) {
        let Some(item) = self.items.get(index) else {
            return;
        };
        let content = item.elements.content;

        let phase = if item.phase == PanelPhase::Measuring {
            engine.set(scene, content, &Props::new().height(0.0).opacity(0.0));
            PanelPhase::Closed
        } else {
            let handle = engine.animate(
                scene,
                content,
                None,
                &Props::new().height(0.0).opacity(0.0),
                TweenOptions::millis(duration_ms).easing(Easing::Power2InOut),
            );
            match handle {
                Some(handle) => PanelPhase::Closing {
                    handle: Some(handle),
                },
                None => PanelPhase::Closed,
            }
        };
        self.items[index].phase = phase;
        self.restore_header(scene, engine, index);
    }

    fn open(&mut self, scene: &mut Scene, engine: &mut TransitionEngine, index: usize) {
        let config = &self.config;
        let el = self.items[index].elements;

        // a close still in flight must not keep writing the panel
        engine.release(el.content, [Property::Height, Property::Opacity]);

        engine.animate(
            scene,
            el.icon,
            None,
            &Props::new().rotation(config.icon_open_degrees),
            TweenOptions::millis(config.icon_open_duration_ms)
                .easing(Easing::BackOut(config.icon_overshoot)),
        );
        engine.animate(
            scene,
            el.label,
            None,
            &Props::new().color(config.emphasis_color),
            TweenOptions::millis(config.label_duration_ms).easing(Easing::Power1Out),
        );
        if self.profile.bounce() {
            engine.animate(
                scene,
                el.card,
                Some(&Props::new().scale(1.0)),
                &Props::new().scale(config.bounce_scale),
                TweenOptions::millis(config.bounce_duration_ms)
                    .easing(Easing::Power2Out)
                    .repeat(Repeat::Count(1))
                    .yoyo(true),
            );
        }
        self.items[index].phase = PanelPhase::Measuring;
    }

    /// Icon back to its closed orientation, label back to its default color
    fn restore_header(&self, scene: &mut Scene, engine: &mut TransitionEngine, index: usize) {
        let el = self.items[index].elements;
        engine.animate(
            scene,
            el.icon,
            None,
            &Props::new().rotation(0.0),
            TweenOptions::millis(self.config.icon_close_duration_ms).easing(Easing::Power2Out),
        );
        engine.animate(
            scene,
            el.label,
            None,
            &Props::new().color(self.config.label_color),
            TweenOptions::millis(self.config.label_duration_ms).easing(Easing::Power1Out),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::content::default_faq;
    use crate::motion::Rgb;
    use crate::scene::VisualState;

    const ANSWER_HEIGHT: f64 = 96.0;

    struct Fixture {
        scene: Scene,
        engine: TransitionEngine,
        accordion: DisclosureController,
        clock: Duration,
    }

    fn fixture(profile: MotionProfile) -> Fixture {
        let mut scene = Scene::new();
        let items = default_faq()
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let elements = ItemElements {
                    card: scene.insert(format!("card[{}]", i)),
                    label: scene.insert(format!("label[{}]", i)),
                    icon: scene.insert(format!("icon[{}]", i)),
                    content: scene.insert(format!("content[{}]", i)),
                };
                scene.set_natural_height(elements.content, ANSWER_HEIGHT + i as f64);
                DisclosureItem::new(entry, elements)
            })
            .collect();
        let mut engine = TransitionEngine::new();
        let accordion = DisclosureController::new(items, MotionConfig::default(), profile);
        accordion.apply_closed_styles(&mut scene, &mut engine);
        Fixture {
            scene,
            engine,
            accordion,
            clock: Duration::ZERO,
        }
    }

    impl Fixture {
        fn toggle(&mut self, index: usize) -> ToggleOutcome {
            self.accordion.toggle(&mut self.scene, &mut self.engine, index)
        }

        fn frame(&mut self, step_ms: u64) {
            self.clock += Duration::from_millis(step_ms);
            self.accordion.on_frame(&mut self.scene, &mut self.engine);
            for done in self.engine.tick(&mut self.scene, self.clock) {
                self.accordion.on_finished(done);
            }
        }

        fn settle(&mut self) {
            for _ in 0..120 {
                self.frame(16);
            }
        }

        fn el(&self, index: usize) -> ItemElements {
            self.accordion.items()[index].elements
        }

        fn visual(&self, el: ElementId) -> VisualState {
            *self.scene.visual(el).unwrap()
        }

        fn panel_height(&self, index: usize) -> f64 {
            self.scene.get(self.el(index).content).unwrap().resolved_height()
        }

        fn visible_panels(&self) -> Vec<usize> {
            (0..self.accordion.len())
                .filter(|i| self.panel_height(*i) > 0.0)
                .collect()
        }

        fn snapshot(&self) -> Vec<(VisualState, VisualState, VisualState, VisualState)> {
            (0..self.accordion.len())
                .map(|i| {
                    let el = self.el(i);
                    (
                        self.visual(el.card),
                        self.visual(el.label),
                        self.visual(el.icon),
                        self.visual(el.content),
                    )
                })
                .collect()
        }
    }

    #[test]
    fn test_open_runs_measure_then_animate() {
        let mut f = fixture(MotionProfile::Full);
        assert_eq!(
            f.toggle(1),
            ToggleOutcome::Opened {
                index: 1,
                displaced: None
            }
        );
        assert_eq!(f.accordion.phase(1), Some(PanelPhase::Measuring));
        assert_eq!(f.panel_height(1), 0.0);

        f.frame(16);
        assert!(matches!(
            f.accordion.phase(1),
            Some(PanelPhase::Animating { height, .. }) if height == ANSWER_HEIGHT + 1.0
        ));
        f.settle();
        assert_eq!(f.accordion.phase(1), Some(PanelPhase::Open));
        assert_eq!(f.panel_height(1), ANSWER_HEIGHT + 1.0);
        assert_eq!(f.accordion.items()[1].measured_height(), Some(ANSWER_HEIGHT + 1.0));

        let el = f.el(1);
        assert_eq!(f.visual(el.content).opacity, 1.0);
        assert_eq!(f.visual(el.icon).rotation, 180.0);
        assert_eq!(f.visual(el.label).color, Rgb::new(0x8b, 0x5c, 0xf6));
        assert_eq!(f.visual(el.card).scale, 1.0);
    }

    #[test]
    fn test_bounce_peaks_then_settles() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(0);
        f.frame(16);
        f.frame(120);
        assert!(f.visual(f.el(0).card).scale > 1.0);
        f.settle();
        assert_eq!(f.visual(f.el(0).card).scale, 1.0);
    }

    #[test]
    fn test_toggle_twice_restores_exact_state() {
        let mut f = fixture(MotionProfile::Full);
        let before = f.snapshot();
        f.toggle(2);
        f.settle();
        f.toggle(2);
        f.settle();
        assert_eq!(f.accordion.state(), AccordionState::Closed);
        assert_eq!(f.snapshot(), before);
    }

    #[test]
    fn test_sequence_zero_two_two_ends_closed() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(0);
        f.settle();
        f.toggle(2);
        f.settle();
        assert_eq!(f.toggle(2), ToggleOutcome::Closed(2));
        f.settle();
        assert_eq!(f.accordion.open_index(), None);
        assert!(f.visible_panels().is_empty());
        for i in 0..4 {
            assert_eq!(f.accordion.phase(i), Some(PanelPhase::Closed));
        }
    }

    #[test]
    fn test_opening_another_item_closes_previous() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(1);
        f.settle();
        assert!(f.accordion.is_open(1));
        assert_eq!(f.visible_panels(), vec![1]);

        assert_eq!(
            f.toggle(3),
            ToggleOutcome::Opened {
                index: 3,
                displaced: Some(1)
            }
        );
        assert!(f.accordion.is_open(3));
        assert!(!f.accordion.is_open(1));
        f.settle();
        assert_eq!(f.visible_panels(), vec![3]);
        assert_eq!(f.visual(f.el(1).icon).rotation, 0.0);
        assert_eq!(f.visual(f.el(1).label).color, Rgb::BLACK);
    }

    #[test]
    fn test_at_most_one_open_for_any_sequence() {
        let mut f = fixture(MotionProfile::Full);
        let sequence = [0, 1, 1, 3, 2, 2, 2, 0, 3, 3, 1, 0, 0];
        for (step, index) in sequence.into_iter().enumerate() {
            f.toggle(index);
            for _ in 0..(step % 4) {
                f.frame(16);
                let open = (0..4).filter(|i| f.accordion.is_open(*i)).count();
                assert!(open <= 1);
            }
        }
        f.settle();
        assert!(f.visible_panels().len() <= 1);
        assert_eq!(f.visible_panels(), f.accordion.open_index().into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_rapid_double_click_does_not_stack() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(0);
        f.frame(16);
        f.frame(16);
        f.toggle(0);
        f.frame(16);
        f.toggle(0);
        f.frame(16);

        let el = f.el(0);
        for target in el.all() {
            assert!(f.engine.active_on(target) <= 3);
        }
        assert!(f.engine.owner(el.icon, Property::Rotation).is_some());
        f.settle();
        assert!(f.accordion.is_open(0));
        assert_eq!(f.visual(el.icon).rotation, 180.0);
        assert_eq!(f.panel_height(0), ANSWER_HEIGHT);
    }

    #[test]
    fn test_cancel_while_measuring_falls_back_to_closed() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(2);
        assert_eq!(f.accordion.phase(2), Some(PanelPhase::Measuring));
        assert_eq!(f.toggle(2), ToggleOutcome::Closed(2));
        assert_eq!(f.accordion.phase(2), Some(PanelPhase::Closed));
        f.settle();
        assert_eq!(f.panel_height(2), 0.0);
        assert_eq!(f.visual(f.el(2).content).opacity, 0.0);
    }

    #[test]
    fn test_panel_removed_before_measure_reverts_state() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(1);
        let content = f.el(1).content;
        f.scene.remove(content);
        f.frame(16);
        assert_eq!(f.accordion.state(), AccordionState::Closed);
        assert_eq!(f.accordion.phase(1), Some(PanelPhase::Closed));
    }

    #[test]
    fn test_toggle_on_missing_item_is_noop() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(0);
        f.settle();
        let card = f.el(3).card;
        f.scene.remove(card);
        assert_eq!(f.toggle(3), ToggleOutcome::Ignored);
        assert_eq!(f.accordion.open_index(), Some(0));
        assert_eq!(f.toggle(9), ToggleOutcome::Ignored);
        assert_eq!(f.accordion.open_index(), Some(0));
    }

    #[test]
    fn test_teardown_freezes_state() {
        let mut f = fixture(MotionProfile::Full);
        f.toggle(0);
        f.frame(16);
        f.frame(16);
        f.accordion.teardown(&mut f.engine);
        assert_eq!(f.engine.active_count(), 0);

        assert_eq!(f.toggle(1), ToggleOutcome::Ignored);
        assert_eq!(f.accordion.open_index(), Some(0));
        let frozen = f.snapshot();
        f.settle();
        assert_eq!(f.snapshot(), frozen);
    }

    #[test]
    fn test_lite_profile_skips_bounce_but_still_opens() {
        let mut f = fixture(MotionProfile::Lite);
        f.toggle(0);
        f.frame(16);
        f.frame(60);
        assert_eq!(f.visual(f.el(0).card).scale, 1.0);
        assert_eq!(f.engine.owner(f.el(0).card, Property::Scale), None);
        f.settle();
        assert_eq!(f.panel_height(0), ANSWER_HEIGHT);
        assert_eq!(f.visual(f.el(0).icon).rotation, 180.0);
    }
}
