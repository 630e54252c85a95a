//! Scroll-gated entrance choreography
//!
//! A mount hides its targets, registers one-shot triggers with the viewport
//! observer, and plays each entrance when its cue arrives:
//!
//! - container: fade, rise, slight tilt and scale-up
//! - heading: left-to-right clip wipe
//! - item `i`: slide in from alternating sides, delayed by `i × stagger`
//! - decorations: staggered pop-in with overshoot, then an endless idle float
//!
//! Item delays come from the static index, never from the order in which
//! cues arrive.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Duration;

use tracing::{debug, info};

use crate::capability::MotionProfile;
use crate::config::MotionConfig;
use crate::motion::{AnimationHandle, Easing, Props, Repeat, TransitionEngine, TweenOptions};
use crate::scene::{ElementId, Scene};
use crate::viewport::{RegistrationId, TriggerMode, ViewportObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RevealStep {
    Container,
    Heading,
    Item(usize),
    Decorations,
}

/// Payload carried by viewport registrations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealCue {
    pub mount: MountHandle,
    pub step: RevealStep,
}

/// Elements a section hands over for its entrance
#[derive(Debug, Clone)]
pub struct RevealTargets {
    /// Element whose position gates the container entrance
    pub section: ElementId,
    pub container: ElementId,
    pub heading: Option<ElementId>,
    pub items: Vec<ElementId>,
    pub decorations: Vec<ElementId>,
}

impl RevealTargets {
    pub fn new(section: ElementId, container: ElementId) -> Self {
        Self {
            section,
            container,
            heading: None,
            items: Vec::new(),
            decorations: Vec::new(),
        }
    }

    pub fn with_heading(mut self, heading: ElementId) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_items(mut self, items: Vec<ElementId>) -> Self {
        self.items = items;
        self
    }

    pub fn with_decorations(mut self, decorations: Vec<ElementId>) -> Self {
        self.decorations = decorations;
        self
    }

    fn all(&self) -> impl Iterator<Item = ElementId> + '_ {
        [self.container]
            .into_iter()
            .chain(self.heading)
            .chain(self.items.iter().copied())
            .chain(self.decorations.iter().copied())
    }
}

#[derive(Debug)]
struct MountRecord {
    targets: RevealTargets,
    profile: MotionProfile,
    registrations: Vec<RegistrationId>,
    item_registrations: Vec<RegistrationId>,
    fired: BTreeSet<RevealStep>,
    settled_items: BTreeSet<usize>,
    /// Pop-in tweens whose completion starts an idle float
    pop_ins: HashMap<AnimationHandle, ElementId>,
    floats: Vec<AnimationHandle>,
}

#[derive(Debug)]
pub struct RevealChoreographer {
    config: MotionConfig,
    mounts: BTreeMap<MountHandle, MountRecord>,
    next_mount: u64,
}

impl RevealChoreographer {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            mounts: BTreeMap::new(),
            next_mount: 0,
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Hide the targets and register their entrance triggers
    pub fn mount(
        &mut self,
        scene: &mut Scene,
        engine: &mut TransitionEngine,
        observer: &mut ViewportObserver<RevealCue>,
        targets: RevealTargets,
        profile: MotionProfile,
    ) -> MountHandle {
        let handle = MountHandle(self.next_mount);
        self.next_mount += 1;

        engine.set(scene, targets.container, &self.container_hidden(profile));
        if let Some(heading) = targets.heading {
            engine.set(scene, heading, &heading_hidden());
        }
        for (index, item) in targets.items.iter().enumerate() {
            engine.set(scene, *item, &self.item_hidden(index, profile));
        }
        for decoration in &targets.decorations {
            engine.set(scene, *decoration, &decoration_hidden());
        }

        let cue = |step| RevealCue {
            mount: handle,
            step,
        };
        let mut registrations = vec![observer.observe(
            targets.section,
            self.config.container_threshold,
            cue(RevealStep::Container),
            TriggerMode::Once,
        )];
        if targets.heading.is_some() {
            registrations.push(observer.observe(
                targets.container,
                self.config.heading_threshold,
                cue(RevealStep::Heading),
                TriggerMode::Once,
            ));
        }
        if !targets.decorations.is_empty() {
            registrations.push(observer.observe(
                targets.container,
                self.config.heading_threshold,
                cue(RevealStep::Decorations),
                TriggerMode::Once,
            ));
        }
        let item_registrations: Vec<RegistrationId> = targets
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                observer.observe(
                    *item,
                    self.config.item_threshold,
                    cue(RevealStep::Item(index)),
                    TriggerMode::Once,
                )
            })
            .collect();

        info!(
            ?handle,
            items = targets.items.len(),
            decorations = targets.decorations.len(),
            ?profile,
            "reveal mounted"
        );

        self.mounts.insert(
            handle,
            MountRecord {
                targets,
                profile,
                registrations,
                item_registrations,
                fired: BTreeSet::new(),
                settled_items: BTreeSet::new(),
                pop_ins: HashMap::new(),
                floats: Vec::new(),
            },
        );
        handle
    }

    pub fn is_mounted(&self, handle: MountHandle) -> bool {
        self.mounts.contains_key(&handle)
    }

    pub fn has_fired(&self, handle: MountHandle, step: RevealStep) -> bool {
        self.mounts
            .get(&handle)
            .is_some_and(|m| m.fired.contains(&step))
    }

    /// Idle float loops currently owned by the mount
    pub fn floats(&self, handle: MountHandle) -> &[AnimationHandle] {
        self.mounts
            .get(&handle)
            .map(|m| m.floats.as_slice())
            .unwrap_or(&[])
    }

    /// Play the entrance a trigger asked for; cues of torn-down mounts are
    /// dropped
    pub fn on_cue(&mut self, scene: &mut Scene, engine: &mut TransitionEngine, cue: RevealCue) {
        let Some(mount) = self.mounts.get_mut(&cue.mount) else {
            debug!(?cue, "cue for unmounted reveal ignored");
            return;
        };
        if !mount.fired.insert(cue.step) {
            return;
        }
        let config = &self.config;
        let profile = mount.profile;

        match cue.step {
            RevealStep::Container => {
                let target = mount.targets.container;
                engine.animate(
                    scene,
                    target,
                    Some(&container_hidden(config, profile)),
                    &Props::new().opacity(1.0).y(0.0).rotate_x(0.0).scale(1.0),
                    TweenOptions::millis(config.container_duration_ms).easing(Easing::Power3Out),
                );
            }
            RevealStep::Heading => {
                if let Some(heading) = mount.targets.heading {
                    engine.animate(
                        scene,
                        heading,
                        Some(&heading_hidden()),
                        &Props::new().clip_reveal(1.0).opacity(1.0),
                        TweenOptions::millis(config.heading_duration_ms)
                            .easing(Easing::Power3InOut),
                    );
                }
            }
            RevealStep::Item(index) => {
                if mount.settled_items.contains(&index) {
                    return;
                }
                if let Some(item) = mount.targets.items.get(index).copied() {
                    engine.animate(
                        scene,
                        item,
                        Some(&item_hidden(config, index, profile)),
                        &Props::new().opacity(1.0).x(0.0).rotate_y(0.0),
                        TweenOptions::millis(config.item_duration_ms)
                            .easing(Easing::Power3Out)
                            .delay(config.stagger_delay(index)),
                    );
                }
            }
            RevealStep::Decorations => {
                for (k, decoration) in mount.targets.decorations.iter().enumerate() {
                    let delay = Duration::from_millis(
                        config.decoration_stagger_ms.saturating_mul(k as u64),
                    );
                    let handle = engine.animate(
                        scene,
                        *decoration,
                        Some(&decoration_hidden()),
                        &Props::new().scale(1.0).opacity(1.0),
                        TweenOptions::millis(config.decoration_duration_ms)
                            .easing(Easing::BackOut(config.decoration_overshoot))
                            .delay(delay),
                    );
                    if let (Some(handle), true) = (handle, profile.idle_loops()) {
                        mount.pop_ins.insert(handle, *decoration);
                    }
                }
            }
        }
        debug!(mount = ?cue.mount, step = ?cue.step, "entrance started");
    }

    /// Route a finished tween; pop-ins hand over to their idle float
    pub fn on_finished(
        &mut self,
        scene: &mut Scene,
        engine: &mut TransitionEngine,
        handle: AnimationHandle,
    ) {
        let config = &self.config;
        for mount in self.mounts.values_mut() {
            let Some(decoration) = mount.pop_ins.remove(&handle) else {
                continue;
            };
            let float = engine.animate(
                scene,
                decoration,
                None,
                &Props::new().y(-config.float_amplitude),
                TweenOptions::millis(config.float_period_ms)
                    .easing(Easing::Power2InOut)
                    .repeat(Repeat::Forever)
                    .yoyo(true),
            );
            mount.floats.extend(float);
            return;
        }
    }

    /// Hand item `index` over to its new owner: drop its pending trigger and
    /// land its entrance on the final state
    pub fn settle_item(
        &mut self,
        scene: &mut Scene,
        engine: &mut TransitionEngine,
        observer: &mut ViewportObserver<RevealCue>,
        handle: MountHandle,
        index: usize,
    ) {
        let Some(mount) = self.mounts.get_mut(&handle) else {
            return;
        };
        let Some(item) = mount.targets.items.get(index).copied() else {
            return;
        };
        if !mount.settled_items.insert(index) {
            return;
        }
        if let Some(id) = mount.item_registrations.get(index) {
            observer.release(*id);
        }
        engine.fast_forward(scene, item);
        engine.set(scene, item, &Props::new().opacity(1.0).x(0.0).rotate_y(0.0));
        debug!(?handle, index, "entrance settled for toggle");
    }

    /// Cancel every trigger and tween of the mount; safe to repeat
    pub fn teardown(
        &mut self,
        engine: &mut TransitionEngine,
        observer: &mut ViewportObserver<RevealCue>,
        handle: MountHandle,
    ) -> bool {
        let Some(mount) = self.mounts.remove(&handle) else {
            return false;
        };
        for id in mount.registrations.iter().chain(&mount.item_registrations) {
            observer.release(*id);
        }
        let killed: usize = mount.targets.all().map(|el| engine.kill_all(el)).sum();
        info!(?handle, killed, "reveal torn down");
        true
    }

    fn container_hidden(&self, profile: MotionProfile) -> Props {
        container_hidden(&self.config, profile)
    }

    fn item_hidden(&self, index: usize, profile: MotionProfile) -> Props {
        item_hidden(&self.config, index, profile)
    }
}

fn container_hidden(config: &MotionConfig, profile: MotionProfile) -> Props {
    let tilt = if profile.depth_effects() {
        config.container_tilt
    } else {
        0.0
    };
    Props::new()
        .opacity(0.0)
        .y(config.rise_offset)
        .rotate_x(tilt)
        .scale(config.container_scale)
}

fn heading_hidden() -> Props {
    Props::new().clip_reveal(0.0).opacity(0.0)
}

/// Even items enter from the left, odd from the right
fn item_hidden(config: &MotionConfig, index: usize, profile: MotionProfile) -> Props {
    let side = if index % 2 == 0 { -1.0 } else { 1.0 };
    let depth = if profile.depth_effects() {
        config.item_depth_rotation
    } else {
        0.0
    };
    Props::new()
        .opacity(0.0)
        .x(side * config.slide_offset)
        .rotate_y(side * depth)
}

fn decoration_hidden() -> Props {
    Props::new().scale(0.0).opacity(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    struct Fixture {
        scene: Scene,
        engine: TransitionEngine,
        observer: ViewportObserver<RevealCue>,
        choreographer: RevealChoreographer,
        targets: RevealTargets,
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn fixture(item_tops: &[f64]) -> Fixture {
        let mut scene = Scene::new();
        let section = scene.insert("section");
        let container = scene.insert("container");
        let heading = scene.insert("heading");
        scene.set_layout(section, 0.0, 600.0);
        scene.set_layout(container, 100.0, 500.0);
        scene.set_layout(heading, 20.0, 60.0);
        let items = item_tops
            .iter()
            .enumerate()
            .map(|(i, top)| {
                let id = scene.insert(format!("item[{}]", i));
                scene.set_layout(id, *top, 80.0);
                id
            })
            .collect();
        let decorations = (0..3).map(|i| scene.insert(format!("dot[{}]", i))).collect();
        let targets = RevealTargets::new(section, container)
            .with_heading(heading)
            .with_items(items)
            .with_decorations(decorations);
        Fixture {
            scene,
            engine: TransitionEngine::new(),
            observer: ViewportObserver::new(),
            choreographer: RevealChoreographer::new(MotionConfig::default()),
            targets,
        }
    }

    impl Fixture {
        fn mount(&mut self, profile: MotionProfile) -> MountHandle {
            self.choreographer.mount(
                &mut self.scene,
                &mut self.engine,
                &mut self.observer,
                self.targets.clone(),
                profile,
            )
        }

        fn frame(&mut self, viewport: Viewport, now: Duration) {
            for cue in self.observer.poll(&self.scene, viewport) {
                self.choreographer.on_cue(&mut self.scene, &mut self.engine, cue);
            }
            for done in self.engine.tick(&mut self.scene, now) {
                self.choreographer
                    .on_finished(&mut self.scene, &mut self.engine, done);
            }
        }

        fn opacity(&self, el: ElementId) -> f64 {
            self.scene.visual(el).unwrap().opacity
        }
    }

    #[test]
    fn test_mount_hides_targets() {
        let mut f = fixture(&[200.0, 300.0]);
        f.mount(MotionProfile::Full);
        let item0 = f.scene.visual(f.targets.items[0]).unwrap();
        assert_eq!(item0.opacity, 0.0);
        assert_eq!(item0.translate_x, -50.0);
        assert_eq!(item0.rotate_y, -5.0);
        let item1 = f.scene.visual(f.targets.items[1]).unwrap();
        assert_eq!(item1.translate_x, 50.0);
        let container = f.scene.visual(f.targets.container).unwrap();
        assert_eq!(container.translate_y, 80.0);
        assert_eq!(container.rotate_x, 10.0);
        assert_eq!(f.scene.visual(f.targets.heading.unwrap()).unwrap().clip_reveal, 0.0);
    }

    #[test]
    fn test_visible_at_mount_plays_without_scroll() {
        let mut f = fixture(&[200.0, 300.0]);
        let handle = f.mount(MotionProfile::Full);
        let viewport = Viewport::new(0.0, 800.0);
        f.frame(viewport, ms(0));
        assert!(f.choreographer.has_fired(handle, RevealStep::Container));
        assert!(f.choreographer.has_fired(handle, RevealStep::Item(1)));

        f.frame(viewport, ms(2000));
        assert_eq!(f.opacity(f.targets.container), 1.0);
        assert_eq!(f.opacity(f.targets.items[0]), 1.0);
        assert_eq!(f.opacity(f.targets.items[1]), 1.0);
        assert_eq!(f.scene.visual(f.targets.heading.unwrap()).unwrap().clip_reveal, 1.0);
    }

    #[test]
    fn test_below_fold_waits_for_scroll() {
        let mut f = fixture(&[200.0, 3000.0]);
        let handle = f.mount(MotionProfile::Full);
        f.frame(Viewport::new(0.0, 800.0), ms(0));
        assert!(!f.choreographer.has_fired(handle, RevealStep::Item(1)));
        f.frame(Viewport::new(0.0, 800.0), ms(3000));
        assert_eq!(f.opacity(f.targets.items[1]), 0.0);

        f.frame(Viewport::new(2500.0, 800.0), ms(3100));
        assert!(f.choreographer.has_fired(handle, RevealStep::Item(1)));
    }

    #[test]
    fn test_stagger_follows_index_not_arrival() {
        // item 2 sits above item 0 in the document, so its trigger fires first
        let mut f = fixture(&[2000.0, 2100.0, 200.0]);
        f.mount(MotionProfile::Full);
        f.frame(Viewport::new(0.0, 800.0), ms(0));
        f.frame(Viewport::new(1800.0, 800.0), ms(0));

        // item 2 waits 300ms, item 0 starts immediately
        f.frame(Viewport::new(1800.0, 800.0), ms(250));
        assert!(f.opacity(f.targets.items[0]) > 0.0);
        assert_eq!(f.opacity(f.targets.items[2]), 0.0);
        f.frame(Viewport::new(1800.0, 800.0), ms(400));
        assert!(f.opacity(f.targets.items[2]) > 0.0);
    }

    #[test]
    fn test_decorations_float_after_pop_in() {
        let mut f = fixture(&[200.0]);
        let handle = f.mount(MotionProfile::Full);
        let viewport = Viewport::new(0.0, 800.0);
        f.frame(viewport, ms(0));
        assert!(f.choreographer.floats(handle).is_empty());
        f.frame(viewport, ms(1000));
        assert_eq!(f.choreographer.floats(handle).len(), 3);
        assert_eq!(f.scene.visual(f.targets.decorations[2]).unwrap().scale, 1.0);

        f.frame(viewport, ms(1800));
        assert!(f.scene.visual(f.targets.decorations[0]).unwrap().translate_y < 0.0);
    }

    #[test]
    fn test_lite_profile_skips_idle_loops_and_depth() {
        let mut f = fixture(&[200.0]);
        let handle = f.mount(MotionProfile::Lite);
        assert_eq!(f.scene.visual(f.targets.items[0]).unwrap().rotate_y, 0.0);
        assert_eq!(f.scene.visual(f.targets.container).unwrap().rotate_x, 0.0);

        let viewport = Viewport::new(0.0, 800.0);
        f.frame(viewport, ms(0));
        f.frame(viewport, ms(5000));
        assert!(f.choreographer.floats(handle).is_empty());
        assert_eq!(f.engine.active_count(), 0);
        assert_eq!(f.opacity(f.targets.decorations[0]), 1.0);
        assert_eq!(f.opacity(f.targets.items[0]), 1.0);
    }

    #[test]
    fn test_teardown_is_final_and_idempotent() {
        let mut f = fixture(&[200.0, 3000.0]);
        let handle = f.mount(MotionProfile::Full);
        let viewport = Viewport::new(0.0, 800.0);
        f.frame(viewport, ms(0));
        f.frame(viewport, ms(100));
        let mid = f.opacity(f.targets.container);

        assert!(f.choreographer.teardown(&mut f.engine, &mut f.observer, handle));
        assert!(!f.choreographer.teardown(&mut f.engine, &mut f.observer, handle));
        assert!(f.observer.is_empty());
        assert_eq!(f.engine.active_count(), 0);

        f.frame(Viewport::new(2500.0, 800.0), ms(5000));
        assert_eq!(f.opacity(f.targets.container), mid);
        assert_eq!(f.opacity(f.targets.items[1]), 0.0);

        // a stale cue is dropped too
        f.choreographer.on_cue(
            &mut f.scene,
            &mut f.engine,
            RevealCue {
                mount: handle,
                step: RevealStep::Item(1),
            },
        );
        assert_eq!(f.engine.active_count(), 0);
    }

    #[test]
    fn test_settle_item_lands_entrance() {
        let mut f = fixture(&[200.0, 3000.0]);
        let handle = f.mount(MotionProfile::Full);
        let viewport = Viewport::new(0.0, 800.0);
        f.frame(viewport, ms(0));
        f.frame(viewport, ms(50));

        f.choreographer
            .settle_item(&mut f.scene, &mut f.engine, &mut f.observer, handle, 0);
        f.choreographer
            .settle_item(&mut f.scene, &mut f.engine, &mut f.observer, handle, 1);
        for item in &f.targets.items {
            let visual = f.scene.visual(*item).unwrap();
            assert_eq!(visual.opacity, 1.0);
            assert_eq!(visual.translate_x, 0.0);
        }

        // item 1's trigger was released: scrolling there replays nothing
        f.frame(Viewport::new(2500.0, 800.0), ms(100));
        assert!(!f.choreographer.has_fired(handle, RevealStep::Item(1)));
        assert_eq!(f.engine.active_on(f.targets.items[1]), 0);
    }
}
