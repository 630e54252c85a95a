//! Transition engine shared by the reveal choreographer and the accordion
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (power, expo, back-out overshoot)
//! - `timing` - Progress, interpolation and repeat/yoyo cycle math
//! - `props` - Animatable properties, values and colors
//!
//! ## L3 Molecular Layer
//! - `engine` - Tween scheduler with per-(element, property) slots
//!
//! # Usage
//!
//! ```ignore
//! use devolution_core::motion::{Easing, Props, TransitionEngine, TweenOptions};
//!
//! let mut engine = TransitionEngine::new();
//! engine.animate(
//!     &mut scene,
//!     icon,
//!     None,
//!     &Props::new().rotation(180.0),
//!     TweenOptions::millis(400).easing(Easing::BackOut(1.5)),
//! );
//!
//! // once per frame
//! let finished = engine.tick(&mut scene, now);
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod props;
pub mod timing;

// L3 Molecular Layer
pub mod engine;

pub use easing::Easing;
pub use engine::{AnimationHandle, MotionError, Repeat, TransitionEngine, TweenOptions};
pub use props::{Property, Props, Rgb, Value};
