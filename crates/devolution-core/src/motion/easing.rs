//! L4 Atomic Layer: Pure easing functions for choreographed transitions
//!
//! Maps input progress [0, 1] to eased progress. Every curve starts at 0 and
//! ends at 1; `BackOut` overshoots past 1 before settling.

use serde::{Deserialize, Serialize};

/// Easing curve applied to a tween's progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Jump to the end value when the tween completes
    None,
    Linear,
    /// Quadratic ease-out
    Power1Out,
    /// Cubic ease-out: f(t) = 1 - (1-t)³
    Power2Out,
    /// Cubic ease-in-out
    Power2InOut,
    /// Quartic ease-out
    Power3Out,
    /// Quartic ease-in-out
    Power3InOut,
    /// Quintic ease-out: f(t) = 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: f(t) = 1 - 2^(-10t)
    ExpoOut,
    /// Ease-out that overshoots the target by the given strength, then settles
    BackOut(f64),
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Power2Out
    }
}

impl Easing {
    /// Apply the easing function to a progress value
    ///
    /// # Arguments
    /// * `t` - Progress value, clamped to [0, 1]
    ///
    /// # Returns
    /// Eased value; in [0, 1] for every curve except `BackOut`
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::None => {
                if t < 1.0 {
                    0.0
                } else {
                    1.0
                }
            }
            Easing::Linear => t,
            Easing::Power1Out => ease_out_pow(t, 2),
            Easing::Power2Out => ease_out_pow(t, 3),
            Easing::Power2InOut => ease_in_out_pow(t, 3),
            Easing::Power3Out => ease_out_pow(t, 4),
            Easing::Power3InOut => ease_in_out_pow(t, 4),
            Easing::Quintic => ease_out_pow(t, 5),
            Easing::ExpoOut => exponential_ease_out(t),
            Easing::BackOut(strength) => back_ease_out(t, strength),
        }
    }

    /// Whether the curve can leave the [0, 1] range
    pub fn overshoots(&self) -> bool {
        matches!(self, Easing::BackOut(s) if *s > 0.0)
    }
}

#[inline]
fn ease_out_pow(t: f64, power: i32) -> f64 {
    1.0 - (1.0 - t).powi(power)
}

#[inline]
fn ease_in_out_pow(t: f64, power: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(power - 1) * t.powi(power)
    } else {
        1.0 - (-2.0 * t + 2.0).powi(power) / 2.0
    }
}

#[inline]
fn exponential_ease_out(t: f64) -> f64 {
    if t >= 1.0 {
        1.0
    } else {
        1.0 - 2.0_f64.powf(-10.0 * t)
    }
}

/// f(t) = 1 + (s+1)(t-1)³ + s(t-1)²
#[inline]
fn back_ease_out(t: f64, strength: f64) -> f64 {
    let p = t - 1.0;
    p * p * ((strength + 1.0) * p + strength) + 1.0
}
