//! L3 Molecular Layer: Transition engine
//!
//! Combines easing, timing and property values into running tweens. Each
//! `(element, property)` pair is a slot owned by at most one tween: starting a
//! tween on a slot strips that property from the previous owner, and a tween
//! left with no properties is cancelled. This is what keeps rapid re-clicks
//! from stacking rotations or fighting over a panel's height.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, trace, warn};

use super::easing::Easing;
use super::props::{Property, Props, Value};
use super::timing::cycle_position;
use crate::scene::{ElementId, Scene};

/// Token for a running tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationHandle(u64);

/// Extra cycles played after the first one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    Forever,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(0)
    }
}

impl Repeat {
    fn as_option(self) -> Option<u32> {
        match self {
            Repeat::Count(n) => Some(n),
            Repeat::Forever => None,
        }
    }
}

/// Timing options of a tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenOptions {
    pub duration: Duration,
    pub easing: Easing,
    pub delay: Duration,
    pub repeat: Repeat,
    /// Reverse direction on every other cycle
    pub yoyo: bool,
}

impl TweenOptions {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            easing: Easing::default(),
            delay: Duration::ZERO,
            repeat: Repeat::default(),
            yoyo: false,
        }
    }

    pub fn millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    #[error("non-finite value for {0:?}")]
    NonFinite(Property),

    #[error("value kind does not match property {0:?}")]
    KindMismatch(Property),

    #[error("tween has no target properties")]
    EmptyTween,

    #[error("endless tween needs a non-zero duration")]
    EndlessWithoutDuration,
}

#[derive(Debug, Clone)]
struct Track {
    property: Property,
    /// Captured from the element when the tween first renders, unless given
    from: Option<Value>,
    to: Value,
}

#[derive(Debug, Clone)]
struct Tween {
    target: ElementId,
    tracks: Vec<Track>,
    options: TweenOptions,
    /// Stage time at which the first cycle begins (after the delay)
    start: Duration,
}

/// Runs tweens against a [`Scene`] on a virtual clock
#[derive(Debug, Default)]
pub struct TransitionEngine {
    tweens: BTreeMap<AnimationHandle, Tween>,
    slots: HashMap<(ElementId, Property), AnimationHandle>,
    next_handle: u64,
    now: Duration,
    /// Handles that finished outside of `tick` (snapped or fast-forwarded)
    pending_done: Vec<(AnimationHandle, ElementId)>,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage time: the latest tick or [`advance_to`](Self::advance_to)
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward without rendering
    ///
    /// Tweens started between frames begin at this time instead of the last
    /// tick. The clock never runs backwards.
    pub fn advance_to(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn is_active(&self, handle: AnimationHandle) -> bool {
        self.tweens.contains_key(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    pub fn active_on(&self, target: ElementId) -> usize {
        self.tweens.values().filter(|t| t.target == target).count()
    }

    /// Tween currently driving `property` on `target`
    pub fn owner(&self, target: ElementId, property: Property) -> Option<AnimationHandle> {
        self.slots.get(&(target, property)).copied()
    }

    /// Start a tween, absorbing failures
    ///
    /// A missing target is a no-op and yields `None`. Malformed input is
    /// logged and the target jumps straight to its final values; the handle
    /// is then reported as finished on the next tick so state machines
    /// waiting on it still advance.
    pub fn animate(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        from: Option<&Props>,
        to: &Props,
        options: TweenOptions,
    ) -> Option<AnimationHandle> {
        if !scene.contains(target) {
            debug!(%target, "animate on missing element ignored");
            return None;
        }
        match self.try_animate(scene, target, from, to, options) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(%target, error = %e, "malformed tween, snapping to final state");
                self.release(target, to.properties());
                for (property, value) in to.iter() {
                    if value_is_valid(property, value) {
                        scene.write(target, property, value);
                    }
                }
                let handle = self.allocate();
                self.pending_done.push((handle, target));
                Some(handle)
            }
        }
    }

    /// Start a tween, reporting malformed input to the caller
    pub fn try_animate(
        &mut self,
        scene: &mut Scene,
        target: ElementId,
        from: Option<&Props>,
        to: &Props,
        options: TweenOptions,
    ) -> Result<AnimationHandle, MotionError> {
        validate(from, to, &options)?;

        self.release(target, to.properties());
        let handle = self.allocate();

        let tracks: Vec<Track> = to
            .iter()
            .map(|(property, value)| Track {
                property,
                from: from.and_then(|f| f.get(property)),
                to: value,
            })
            .collect();

        // fromTo renders its starting values right away, even while delayed
        if let Some(from) = from {
            for track in &tracks {
                if let Some(start) = from.get(track.property) {
                    scene.write(target, track.property, start);
                }
            }
        }

        let instant = options.duration.is_zero()
            && options.delay.is_zero()
            && options.repeat != Repeat::Forever;
        if instant {
            let end = end_progress(&options);
            for track in &tracks {
                let start = track.from.or_else(|| scene.read(target, track.property));
                if let Some(start) = start {
                    scene.write(target, track.property, end_value(start, track.to, end));
                }
            }
            self.pending_done.push((handle, target));
            return Ok(handle);
        }

        for track in &tracks {
            self.slots.insert((target, track.property), handle);
        }
        trace!(?handle, %target, props = tracks.len(), "tween started");
        self.tweens.insert(
            handle,
            Tween {
                target,
                tracks,
                options,
                start: self.now + options.delay,
            },
        );
        Ok(handle)
    }

    /// Apply values immediately, stopping any tween driving those properties
    pub fn set(&mut self, scene: &mut Scene, target: ElementId, props: &Props) -> bool {
        self.release(target, props.properties());
        scene.apply(target, props)
    }

    /// Strip the given properties from whichever tweens own them
    pub fn release(&mut self, target: ElementId, properties: impl IntoIterator<Item = Property>) {
        for property in properties {
            let Some(owner) = self.slots.remove(&(target, property)) else {
                continue;
            };
            let emptied = match self.tweens.get_mut(&owner) {
                Some(tween) => {
                    tween.tracks.retain(|t| t.property != property);
                    tween.tracks.is_empty()
                }
                None => false,
            };
            if emptied {
                self.tweens.remove(&owner);
                debug!(?owner, %target, "tween overridden");
            }
        }
    }

    /// Stop a single tween where it stands
    pub fn kill(&mut self, handle: AnimationHandle) -> bool {
        match self.tweens.remove(&handle) {
            Some(tween) => {
                self.clear_slots(handle, &tween);
                true
            }
            None => false,
        }
    }

    /// Stop every tween on `target` where it stands
    pub fn kill_all(&mut self, target: ElementId) -> usize {
        let handles: Vec<AnimationHandle> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.target == target)
            .map(|(h, _)| *h)
            .collect();
        for handle in &handles {
            self.kill(*handle);
        }
        self.pending_done.retain(|(_, t)| *t != target);
        handles.len()
    }

    /// Jump every finite tween on `target` to its final values
    ///
    /// Endless tweens are stopped where they stand. Fast-forwarded handles
    /// are reported as finished on the next tick.
    pub fn fast_forward(&mut self, scene: &mut Scene, target: ElementId) -> Vec<AnimationHandle> {
        let handles: Vec<AnimationHandle> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.target == target)
            .map(|(h, _)| *h)
            .collect();

        let mut finished = Vec::new();
        for handle in handles {
            let Some(tween) = self.tweens.remove(&handle) else {
                continue;
            };
            self.clear_slots(handle, &tween);
            if tween.options.repeat == Repeat::Forever {
                continue;
            }
            let end = end_progress(&tween.options);
            for track in &tween.tracks {
                let start = track.from.or_else(|| scene.read(target, track.property));
                if let Some(start) = start {
                    scene.write(target, track.property, end_value(start, track.to, end));
                }
            }
            finished.push(handle);
        }
        self.pending_done
            .extend(finished.iter().map(|handle| (*handle, target)));
        finished
    }

    /// Stop everything and forget pending completions
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.slots.clear();
        self.pending_done.clear();
    }

    /// Advance every tween to `now` and write the interpolated values
    ///
    /// Returns the handles that finished during this frame. Tweens whose
    /// target disappeared are dropped without being reported.
    pub fn tick(&mut self, scene: &mut Scene, now: Duration) -> Vec<AnimationHandle> {
        self.now = now;
        let mut finished: Vec<AnimationHandle> = std::mem::take(&mut self.pending_done)
            .into_iter()
            .map(|(handle, _)| handle)
            .collect();
        let mut dropped = Vec::new();

        for (handle, tween) in self.tweens.iter_mut() {
            if now < tween.start {
                continue;
            }
            let Some(element) = scene.get_mut(tween.target) else {
                dropped.push(*handle);
                continue;
            };

            for track in tween.tracks.iter_mut() {
                if track.from.is_none() {
                    track.from = Some(element.read(track.property));
                }
            }

            let position = cycle_position(
                now - tween.start,
                tween.options.duration,
                tween.options.repeat.as_option(),
                tween.options.yoyo,
            );

            for track in &tween.tracks {
                let from = track.from.unwrap_or(track.to);
                let value = if position.finished {
                    end_value(from, track.to, position.progress)
                } else {
                    from.interpolate(track.to, tween.options.easing.apply(position.progress))
                };
                element.write(track.property, value);
            }

            if position.finished {
                finished.push(*handle);
            }
        }

        for handle in dropped {
            if let Some(tween) = self.tweens.remove(&handle) {
                debug!(?handle, target = %tween.target, "tween dropped, element gone");
                self.clear_slots(handle, &tween);
            }
        }
        for handle in &finished {
            if let Some(tween) = self.tweens.remove(handle) {
                self.clear_slots(*handle, &tween);
            }
        }
        finished
    }

    fn allocate(&mut self) -> AnimationHandle {
        let handle = AnimationHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn clear_slots(&mut self, handle: AnimationHandle, tween: &Tween) {
        for track in &tween.tracks {
            let key = (tween.target, track.property);
            if self.slots.get(&key) == Some(&handle) {
                self.slots.remove(&key);
            }
        }
    }
}

fn end_progress(options: &TweenOptions) -> f64 {
    cycle_position(
        Duration::MAX,
        options.duration,
        options.repeat.as_option(),
        options.yoyo,
    )
    .progress
}

/// Exact end value, avoiding float drift so round trips land on the origin
fn end_value(from: Value, to: Value, progress: f64) -> Value {
    if progress >= 1.0 {
        to
    } else {
        from
    }
}

fn value_is_valid(property: Property, value: Value) -> bool {
    match value {
        Value::Scalar(v) => !property.is_color() && v.is_finite(),
        Value::Color(_) => property.is_color(),
    }
}

fn validate(from: Option<&Props>, to: &Props, options: &TweenOptions) -> Result<(), MotionError> {
    if to.is_empty() {
        return Err(MotionError::EmptyTween);
    }
    if options.repeat == Repeat::Forever && options.duration.is_zero() {
        return Err(MotionError::EndlessWithoutDuration);
    }
    let props = to.iter().chain(from.into_iter().flat_map(|f| f.iter()));
    for (property, value) in props {
        match value {
            Value::Scalar(_) if property.is_color() => {
                return Err(MotionError::KindMismatch(property))
            }
            Value::Color(_) if !property.is_color() => {
                return Err(MotionError::KindMismatch(property))
            }
            Value::Scalar(v) if !v.is_finite() => return Err(MotionError::NonFinite(property)),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::Rgb;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn setup() -> (Scene, TransitionEngine, ElementId) {
        let mut scene = Scene::new();
        let el = scene.insert("el");
        (scene, TransitionEngine::new(), el)
    }

    fn opacity(scene: &Scene, el: ElementId) -> f64 {
        scene.visual(el).unwrap().opacity
    }

    #[test]
    fn test_tween_interpolates_and_finishes() {
        let (mut scene, mut engine, el) = setup();
        let handle = engine
            .animate(
                &mut scene,
                el,
                Some(&Props::new().opacity(0.0)),
                &Props::new().opacity(1.0),
                TweenOptions::millis(100).easing(Easing::Linear),
            )
            .unwrap();

        assert_eq!(opacity(&scene, el), 0.0);
        assert!(engine.tick(&mut scene, ms(50)).is_empty());
        assert!((opacity(&scene, el) - 0.5).abs() < 1e-9);

        assert_eq!(engine.tick(&mut scene, ms(100)), vec![handle]);
        assert_eq!(opacity(&scene, el), 1.0);
        assert!(!engine.is_active(handle));
    }

    #[test]
    fn test_delay_holds_from_values() {
        let (mut scene, mut engine, el) = setup();
        engine.animate(
            &mut scene,
            el,
            Some(&Props::new().x(-50.0)),
            &Props::new().x(0.0),
            TweenOptions::millis(100).delay(ms(300)).easing(Easing::Linear),
        );
        engine.tick(&mut scene, ms(200));
        assert_eq!(scene.visual(el).unwrap().translate_x, -50.0);
        engine.tick(&mut scene, ms(350));
        assert!((scene.visual(el).unwrap().translate_x + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_same_property_last_write_wins() {
        let (mut scene, mut engine, el) = setup();
        let first = engine
            .animate(&mut scene, el, None, &Props::new().rotation(180.0), TweenOptions::millis(400))
            .unwrap();
        engine.tick(&mut scene, ms(100));
        let second = engine
            .animate(&mut scene, el, None, &Props::new().rotation(0.0), TweenOptions::millis(300))
            .unwrap();

        assert!(!engine.is_active(first));
        assert_eq!(engine.owner(el, Property::Rotation), Some(second));
        assert_eq!(engine.active_on(el), 1);

        let done = engine.tick(&mut scene, ms(400));
        assert_eq!(done, vec![second]);
        assert_eq!(scene.visual(el).unwrap().rotation, 0.0);
    }

    #[test]
    fn test_partial_override_keeps_other_properties() {
        let (mut scene, mut engine, el) = setup();
        let both = engine
            .animate(
                &mut scene,
                el,
                None,
                &Props::new().opacity(0.0).scale(2.0),
                TweenOptions::millis(100),
            )
            .unwrap();
        let opacity_only = engine
            .animate(&mut scene, el, None, &Props::new().opacity(1.0), TweenOptions::millis(100))
            .unwrap();

        assert!(engine.is_active(both));
        assert_eq!(engine.owner(el, Property::Scale), Some(both));
        assert_eq!(engine.owner(el, Property::Opacity), Some(opacity_only));

        engine.tick(&mut scene, ms(100));
        let visual = scene.visual(el).unwrap();
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.scale, 2.0);
    }

    #[test]
    fn test_yoyo_bounce_returns_exactly() {
        let (mut scene, mut engine, el) = setup();
        engine.animate(
            &mut scene,
            el,
            Some(&Props::new().scale(1.0)),
            &Props::new().scale(1.02),
            TweenOptions::millis(150).repeat(Repeat::Count(1)).yoyo(true),
        );
        engine.tick(&mut scene, ms(150));
        assert!(scene.visual(el).unwrap().scale > 1.0);
        let done = engine.tick(&mut scene, ms(300));
        assert_eq!(done.len(), 1);
        assert_eq!(scene.visual(el).unwrap().scale, 1.0);
    }

    #[test]
    fn test_color_tween() {
        let (mut scene, mut engine, el) = setup();
        let accent = Rgb::new(0x8b, 0x5c, 0xf6);
        engine.animate(&mut scene, el, None, &Props::new().color(accent), TweenOptions::millis(200));
        engine.tick(&mut scene, ms(0));
        engine.tick(&mut scene, ms(100));
        let mid = scene.visual(el).unwrap().color;
        assert_ne!(mid, Rgb::BLACK);
        assert_ne!(mid, accent);
        engine.tick(&mut scene, ms(200));
        assert_eq!(scene.visual(el).unwrap().color, accent);
    }

    #[test]
    fn test_malformed_tween_snaps_and_reports() {
        let (mut scene, mut engine, el) = setup();
        let bad = Props::new().opacity(0.25).scale(f64::NAN);
        let handle = engine
            .animate(&mut scene, el, None, &bad, TweenOptions::millis(400))
            .unwrap();
        assert_eq!(opacity(&scene, el), 0.25);
        assert_eq!(scene.visual(el).unwrap().scale, 1.0);
        assert!(!engine.is_active(handle));
        assert_eq!(engine.tick(&mut scene, ms(16)), vec![handle]);

        let mismatch = Props::new().with(Property::Color, 1.0);
        assert_eq!(
            engine.try_animate(&mut scene, el, None, &mismatch, TweenOptions::millis(1)),
            Err(MotionError::KindMismatch(Property::Color))
        );
    }

    #[test]
    fn test_missing_target_is_noop() {
        let (mut scene, mut engine, el) = setup();
        scene.remove(el);
        assert!(engine
            .animate(&mut scene, el, None, &Props::new().opacity(0.0), TweenOptions::millis(10))
            .is_none());
        assert_eq!(engine.active_count(), 0);
    }

    #[test]
    fn test_target_removed_mid_flight_is_dropped() {
        let (mut scene, mut engine, el) = setup();
        engine.animate(&mut scene, el, None, &Props::new().opacity(0.0), TweenOptions::millis(100));
        engine.tick(&mut scene, ms(10));
        scene.remove(el);
        assert!(engine.tick(&mut scene, ms(200)).is_empty());
        assert_eq!(engine.active_count(), 0);
        assert_eq!(engine.owner(el, Property::Opacity), None);
    }

    #[test]
    fn test_kill_all_silences_target() {
        let (mut scene, mut engine, el) = setup();
        engine.animate(&mut scene, el, None, &Props::new().opacity(0.0), TweenOptions::millis(100));
        engine.animate(
            &mut scene,
            el,
            None,
            &Props::new().y(-8.0),
            TweenOptions::millis(1500).repeat(Repeat::Forever).yoyo(true),
        );
        assert_eq!(engine.kill_all(el), 2);
        assert!(engine.tick(&mut scene, ms(5000)).is_empty());
        assert_eq!(opacity(&scene, el), 1.0);
    }

    #[test]
    fn test_fast_forward_lands_on_final_values() {
        let (mut scene, mut engine, el) = setup();
        let handle = engine
            .animate(
                &mut scene,
                el,
                Some(&Props::new().opacity(0.0).x(-50.0)),
                &Props::new().opacity(1.0).x(0.0),
                TweenOptions::millis(700).delay(ms(450)),
            )
            .unwrap();
        assert_eq!(engine.fast_forward(&mut scene, el), vec![handle]);
        let visual = scene.visual(el).unwrap();
        assert_eq!(visual.opacity, 1.0);
        assert_eq!(visual.translate_x, 0.0);
        assert_eq!(engine.tick(&mut scene, ms(1)), vec![handle]);
    }

    #[test]
    fn test_set_releases_slot() {
        let (mut scene, mut engine, el) = setup();
        let handle = engine
            .animate(&mut scene, el, None, &Props::new().height(0.0), TweenOptions::millis(100))
            .unwrap();
        engine.set(&mut scene, el, &Props::new().height(40.0));
        assert!(!engine.is_active(handle));
        engine.tick(&mut scene, ms(100));
        assert_eq!(scene.read(el, Property::Height), Some(Value::Scalar(40.0)));
    }

    #[test]
    fn test_tween_started_between_ticks_begins_at_advanced_clock() {
        let (mut scene, mut engine, el) = setup();
        engine.tick(&mut scene, ms(2000));
        engine.advance_to(ms(2090));
        engine.animate(
            &mut scene,
            el,
            Some(&Props::new().opacity(0.0)),
            &Props::new().opacity(1.0),
            TweenOptions::millis(100).easing(Easing::Linear),
        );
        engine.tick(&mut scene, ms(2100));
        assert!((opacity(&scene, el) - 0.1).abs() < 1e-9);

        // the clock never runs backwards
        engine.advance_to(ms(50));
        assert_eq!(engine.now(), ms(2100));
    }

    #[test]
    fn test_kill_all_drops_pending_completions() {
        let (mut scene, mut engine, el) = setup();
        let other = scene.insert("other");
        engine.animate(&mut scene, el, None, &Props::new().opacity(0.5), TweenOptions::millis(0));
        let kept = engine
            .animate(&mut scene, other, None, &Props::new().opacity(0.5), TweenOptions::millis(0))
            .unwrap();
        engine.animate(&mut scene, el, None, &Props::new().x(10.0), TweenOptions::millis(100));
        engine.fast_forward(&mut scene, el);

        assert_eq!(engine.kill_all(el), 0);
        assert_eq!(engine.tick(&mut scene, ms(16)), vec![kept]);
        assert_eq!(scene.visual(el).unwrap().opacity, 0.5);
    }
}
