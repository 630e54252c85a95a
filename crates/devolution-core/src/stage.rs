//! Per-page runtime
//!
//! A [`Stage`] owns everything the sections animate against. The host drives
//! it with one [`Stage::frame`] call per rendered frame:
//!
//! ```text
//! poll triggers -> start cued entrances -> advance tweens -> route completions
//! ```

use std::time::Duration;

use tracing::trace;

use crate::capability::MotionProfile;
use crate::config::MotionConfig;
use crate::motion::{AnimationHandle, TransitionEngine};
use crate::reveal::{MountHandle, RevealChoreographer, RevealCue, RevealTargets};
use crate::scene::Scene;
use crate::viewport::{Viewport, ViewportObserver};

#[derive(Debug)]
pub struct Stage {
    pub scene: Scene,
    pub engine: TransitionEngine,
    pub observer: ViewportObserver<RevealCue>,
    pub choreographer: RevealChoreographer,
    profile: MotionProfile,
    viewport: Option<Viewport>,
}

impl Stage {
    pub fn new(motion: MotionConfig, profile: MotionProfile) -> Self {
        Self {
            scene: Scene::new(),
            engine: TransitionEngine::new(),
            observer: ViewportObserver::new(),
            choreographer: RevealChoreographer::new(motion),
            profile,
            viewport: None,
        }
    }

    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    pub fn motion(&self) -> &MotionConfig {
        self.choreographer.config()
    }

    /// Viewport of the most recent frame
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.engine.now()
    }

    /// Bring the stage clock up to `now` before acting between frames, so
    /// tweens started by input begin when the input arrived
    pub fn set_now(&mut self, now: Duration) {
        self.engine.advance_to(now);
    }

    /// Mount an entrance; when a viewport is already known, targets sitting
    /// inside their zone fire right away instead of waiting for a scroll
    pub fn mount_reveal(&mut self, targets: RevealTargets) -> MountHandle {
        let handle = self.choreographer.mount(
            &mut self.scene,
            &mut self.engine,
            &mut self.observer,
            targets,
            self.profile,
        );
        if let Some(viewport) = self.viewport {
            self.dispatch_cues(viewport);
        }
        handle
    }

    pub fn teardown_reveal(&mut self, handle: MountHandle) -> bool {
        self.choreographer
            .teardown(&mut self.engine, &mut self.observer, handle)
    }

    /// Run one frame at stage time `now`
    ///
    /// Returns the finished handles the choreographer did not consume, so
    /// sections can advance their own state machines.
    pub fn frame(&mut self, viewport: Viewport, now: Duration) -> Vec<AnimationHandle> {
        self.viewport = Some(viewport);
        self.set_now(now);
        self.dispatch_cues(viewport);

        let finished = self.engine.tick(&mut self.scene, now);
        if !finished.is_empty() {
            trace!(count = finished.len(), ?now, "tweens finished");
        }
        for handle in &finished {
            self.choreographer
                .on_finished(&mut self.scene, &mut self.engine, *handle);
        }
        finished
    }

    fn dispatch_cues(&mut self, viewport: Viewport) {
        for cue in self.observer.poll(&self.scene, viewport) {
            self.choreographer
                .on_cue(&mut self.scene, &mut self.engine, cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reveal::RevealStep;

    #[test]
    fn test_mount_after_first_frame_fires_visible_targets() {
        let mut stage = Stage::new(MotionConfig::default(), MotionProfile::Full);
        stage.frame(Viewport::new(0.0, 800.0), Duration::ZERO);

        let section = stage.scene.insert("section");
        let container = stage.scene.insert("container");
        stage.scene.set_layout(section, 100.0, 400.0);
        stage.scene.set_layout(container, 120.0, 380.0);
        let handle = stage.mount_reveal(RevealTargets::new(section, container));

        assert!(stage.choreographer.has_fired(handle, RevealStep::Container));
        assert_eq!(stage.engine.active_on(container), 1);
    }

    #[test]
    fn test_frame_drives_entrance_to_completion() {
        let mut stage = Stage::new(MotionConfig::default(), MotionProfile::Lite);
        let section = stage.scene.insert("section");
        let container = stage.scene.insert("container");
        stage.scene.set_layout(section, 2000.0, 400.0);
        stage.scene.set_layout(container, 2020.0, 380.0);
        let handle = stage.mount_reveal(RevealTargets::new(section, container));

        let top = Viewport::new(0.0, 800.0);
        stage.frame(top, Duration::ZERO);
        assert!(!stage.choreographer.has_fired(handle, RevealStep::Container));

        let scrolled = Viewport::new(1500.0, 800.0);
        stage.frame(scrolled, Duration::from_millis(100));
        let finished = stage.frame(scrolled, Duration::from_millis(1200));
        assert_eq!(finished.len(), 1);
        assert_eq!(stage.scene.visual(container).unwrap().opacity, 1.0);

        assert!(stage.teardown_reveal(handle));
        assert!(!stage.teardown_reveal(handle));
    }

    #[test]
    fn test_cued_entrance_starts_at_frame_time() {
        let mut stage = Stage::new(MotionConfig::default(), MotionProfile::Lite);
        let section = stage.scene.insert("section");
        let container = stage.scene.insert("container");
        stage.scene.set_layout(section, 2000.0, 400.0);
        stage.scene.set_layout(container, 2020.0, 380.0);
        stage.mount_reveal(RevealTargets::new(section, container));

        stage.frame(Viewport::new(0.0, 800.0), Duration::ZERO);
        // a long idle gap, then the scroll that reveals the container
        stage.frame(Viewport::new(1500.0, 800.0), Duration::from_millis(5000));
        assert_eq!(stage.now(), Duration::from_millis(5000));
        assert_eq!(stage.scene.visual(container).unwrap().opacity, 0.0);
        assert_eq!(stage.engine.active_on(container), 1);
    }
}
