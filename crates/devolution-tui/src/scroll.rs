//! Smooth page scrolling
//!
//! The page scroll position (in rows) is the viewport the reveal triggers are
//! polled against, so every scroll request goes through [`ScrollAnimator`].
//! Multiple requests within one frame are batched into a single animation.

use std::time::{Duration, Instant};

use devolution_core::motion::timing::{lerp, progress};
use devolution_core::{Easing, ScrollConfig};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: u16,
    to: u16,
    duration: Duration,
    easing: Easing,
}

/// Scroll animation controller
///
/// Call `scroll_by()` / `scroll_to()` to request movement, then `update()`
/// each frame to get the current interpolated row.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ScrollConfig,
    current_scroll: u16,
    /// Pending delta, batched until the next update
    pending_delta: i32,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    fn is_smooth(&self) -> bool {
        self.config.smooth_enabled && self.config.animation_duration_ms > 0
    }

    fn duration(&self) -> Duration {
        Duration::from_millis(self.config.animation_duration_ms)
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Whether the next frame has scrolling work to do
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.animation.is_some() || self.pending_delta != 0
    }

    /// Final position once the running animation lands
    pub fn target_scroll(&self) -> u16 {
        self.animation
            .as_ref()
            .map(|a| a.to)
            .unwrap_or(self.current_scroll)
    }

    #[inline]
    pub fn current_scroll(&self) -> u16 {
        self.current_scroll
    }

    /// Jump without animating
    pub fn set_scroll(&mut self, scroll: u16) {
        self.animation = None;
        self.current_scroll = scroll;
        self.pending_delta = 0;
    }

    pub fn scroll_to(&mut self, target: u16, max_scroll: u16) {
        let target = target.min(max_scroll);
        self.pending_delta = 0;

        if !self.is_smooth() {
            self.current_scroll = target;
            self.animation = None;
            return;
        }
        if self.current_scroll == target {
            self.animation = None;
            return;
        }
        self.start(target);
    }

    /// Scroll by `delta` rows (positive = down)
    pub fn scroll_by(&mut self, delta: i32, max_scroll: u16) {
        if !self.is_smooth() {
            self.current_scroll = clamp_row(self.current_scroll as i32 + delta, max_scroll);
            self.animation = None;
            return;
        }
        self.pending_delta += delta;
    }

    pub fn scroll_lines(&mut self, lines: i32, max_scroll: u16) {
        let step = i32::from(self.config.scroll_lines.max(1));
        self.scroll_by(lines * step, max_scroll);
    }

    pub fn scroll_half_page(&mut self, down: bool, viewport_height: u16, max_scroll: u16) {
        let half_page = i32::from((viewport_height / 2).max(1));
        self.scroll_by(if down { half_page } else { -half_page }, max_scroll);
    }

    /// Advance the animation and return the current row
    pub fn update(&mut self, max_scroll: u16) -> u16 {
        if self.pending_delta != 0 {
            let new_target =
                clamp_row(self.target_scroll() as i32 + self.pending_delta, max_scroll);
            self.pending_delta = 0;
            if new_target != self.current_scroll {
                self.start(new_target);
            }
        }

        if let Some(anim) = &self.animation {
            let elapsed = anim.start.elapsed();
            if elapsed >= anim.duration {
                self.current_scroll = anim.to.min(max_scroll);
                self.animation = None;
            } else {
                let t = anim.easing.apply(progress(elapsed, anim.duration));
                let row = lerp(anim.from as f64, anim.to as f64, t).round();
                self.current_scroll = (row.max(0.0) as u16).min(max_scroll);
            }
        }
        self.current_scroll = self.current_scroll.min(max_scroll);
        self.current_scroll
    }

    fn start(&mut self, target: u16) {
        self.animation = Some(ActiveAnimation {
            start: Instant::now(),
            from: self.current_scroll,
            to: target,
            duration: self.duration(),
            easing: self.config.easing,
        });
    }
}

fn clamp_row(row: i32, max_scroll: u16) -> u16 {
    row.clamp(0, i32::from(max_scroll)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instant_config() -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_instant_scroll_when_disabled() {
        let mut animator = ScrollAnimator::new(instant_config());
        animator.scroll_to(100, 200);
        assert_eq!(animator.current_scroll(), 100);
        assert!(!animator.is_animating());

        animator.scroll_by(-150, 200);
        assert_eq!(animator.current_scroll(), 0);
    }

    #[test]
    fn test_animation_starts() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            animation_duration_ms: 10_000,
            ..Default::default()
        });
        animator.scroll_to(100, 200);
        assert!(animator.is_animating());
        assert_eq!(animator.target_scroll(), 100);
    }

    #[test]
    fn test_scroll_by_batching() {
        let mut animator = ScrollAnimator::new(ScrollConfig {
            animation_duration_ms: 10_000,
            ..Default::default()
        });
        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);
        animator.scroll_by(10, 200);
        assert!(animator.needs_update());
        animator.update(200);
        assert_eq!(animator.target_scroll(), 30);
    }

    #[test]
    fn test_scroll_clamps_to_max() {
        let mut animator = ScrollAnimator::new(instant_config());
        animator.set_scroll(50);
        animator.scroll_to(300, 100);
        assert_eq!(animator.update(100), 100);
        assert_eq!(animator.update(40), 40);
    }
}
