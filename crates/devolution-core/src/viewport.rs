//! Scroll-position trigger table
//!
//! The host polls the observer once per frame with the current viewport; the
//! observer reports the payloads of every registration whose element crossed
//! its threshold since the last poll. It never touches application state.

use std::collections::BTreeMap;

use tracing::trace;

use crate::scene::{ElementId, Scene};

/// Visible window over the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }

    /// Whether a document-space top edge sits at or above `fraction` of the
    /// viewport height
    pub fn reached(&self, top: f64, fraction: f64) -> bool {
        top - self.scroll_top <= fraction * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerMode {
    /// Deregister after the first firing
    Once,
    /// Fire on every entry into the zone
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

#[derive(Debug, Clone)]
struct Registration<T> {
    element: ElementId,
    threshold: f64,
    payload: T,
    mode: TriggerMode,
    inside: bool,
}

#[derive(Debug)]
pub struct ViewportObserver<T> {
    registrations: BTreeMap<RegistrationId, Registration<T>>,
    next_id: u64,
}

impl<T> Default for ViewportObserver<T> {
    fn default() -> Self {
        Self {
            registrations: BTreeMap::new(),
            next_id: 0,
        }
    }
}

impl<T: Clone> ViewportObserver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `payload` to fire when `element`'s top reaches
    /// `threshold` (fraction of viewport height, 0 = top edge, 1 = bottom)
    pub fn observe(
        &mut self,
        element: ElementId,
        threshold: f64,
        payload: T,
        mode: TriggerMode,
    ) -> RegistrationId {
        let threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let id = RegistrationId(self.next_id);
        self.next_id += 1;
        self.registrations.insert(
            id,
            Registration {
                element,
                threshold,
                payload,
                mode,
                inside: false,
            },
        );
        id
    }

    /// Drop every registration on `element`; safe to repeat
    pub fn unobserve(&mut self, element: ElementId) -> usize {
        let before = self.registrations.len();
        self.registrations.retain(|_, r| r.element != element);
        before - self.registrations.len()
    }

    /// Drop a single registration; safe to repeat
    pub fn release(&mut self, id: RegistrationId) -> bool {
        self.registrations.remove(&id).is_some()
    }

    pub fn is_registered(&self, id: RegistrationId) -> bool {
        self.registrations.contains_key(&id)
    }

    pub fn is_observing(&self, element: ElementId) -> bool {
        self.registrations.values().any(|r| r.element == element)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Evaluate every registration against `viewport`
    ///
    /// Elements missing from the scene are skipped and stay registered.
    pub fn poll(&mut self, scene: &Scene, viewport: Viewport) -> Vec<T> {
        let mut fired = Vec::new();
        let mut spent = Vec::new();

        for (id, registration) in self.registrations.iter_mut() {
            let Some(element) = scene.get(registration.element) else {
                continue;
            };
            let inside = viewport.reached(element.layout.top, registration.threshold);
            if inside && !registration.inside {
                trace!(element = %registration.element, "trigger fired");
                fired.push(registration.payload.clone());
                if registration.mode == TriggerMode::Once {
                    spent.push(*id);
                }
            }
            registration.inside = inside;
        }

        for id in spent {
            self.registrations.remove(&id);
        }
        fired
    }
}
