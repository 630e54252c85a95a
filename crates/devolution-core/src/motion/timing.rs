//! L4 Atomic Layer: Time calculation utilities for tweens
//!
//! Pure functions over elapsed time. The engine works on a virtual clock
//! (`Duration` since the stage started), so nothing here reads `Instant`.

use std::time::Duration;

/// Calculate linear progress (0.0 to 1.0) of a single cycle
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Linear interpolation between two values
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Where a repeating tween currently sits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePosition {
    /// Linear progress within the current cycle, already mirrored for yoyo
    pub progress: f64,
    /// Whether every cycle has played out
    pub finished: bool,
}

/// Resolve the position of a tween that plays `repeat` extra cycles
/// (`None` = forever), optionally reversing direction every other cycle.
pub fn cycle_position(
    elapsed: Duration,
    duration: Duration,
    repeat: Option<u32>,
    yoyo: bool,
) -> CyclePosition {
    let end_of = |cycle: u64| -> f64 {
        if yoyo && cycle % 2 == 1 {
            0.0
        } else {
            1.0
        }
    };

    if duration.is_zero() {
        let last = repeat.map(u64::from).unwrap_or(0);
        return CyclePosition {
            progress: end_of(last),
            finished: true,
        };
    }

    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    let cycle = ratio.floor().max(0.0) as u64;

    if let Some(repeat) = repeat {
        let total = u64::from(repeat) + 1;
        if cycle >= total {
            return CyclePosition {
                progress: end_of(total - 1),
                finished: true,
            };
        }
    }

    let local = (ratio - cycle as f64).clamp(0.0, 1.0);
    let progress = if yoyo && cycle % 2 == 1 { 1.0 - local } else { local };
    CyclePosition {
        progress,
        finished: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_lerp() {
        assert!((lerp(0.0, 100.0, 0.0) - 0.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 0.5) - 50.0).abs() < 0.001);
        assert!((lerp(0.0, 100.0, 1.0) - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_progress_zero_duration() {
        assert!((progress(ms(5), Duration::ZERO) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_single_cycle() {
        let pos = cycle_position(ms(50), ms(100), Some(0), false);
        assert!((pos.progress - 0.5).abs() < 0.001);
        assert!(!pos.finished);

        let pos = cycle_position(ms(100), ms(100), Some(0), false);
        assert!(pos.finished);
        assert!((pos.progress - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_yoyo_returns_to_start() {
        // bounce: one repeat with yoyo plays forward then backward
        let mid_back = cycle_position(ms(150), ms(100), Some(1), true);
        assert!((mid_back.progress - 0.5).abs() < 0.001);
        assert!(!mid_back.finished);

        let done = cycle_position(ms(200), ms(100), Some(1), true);
        assert!(done.finished);
        assert!(done.progress.abs() < 0.001);
    }

    #[test]
    fn test_infinite_never_finishes() {
        let pos = cycle_position(ms(10_050), ms(100), None, true);
        assert!(!pos.finished);
        assert!((pos.progress - 0.5).abs() < 0.001);
    }
}
