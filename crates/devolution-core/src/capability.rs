//! Device capability gate
//!
//! Detection itself belongs to the host; the core only consumes the two
//! answers, once per mount, to pick a [`MotionProfile`].

use crate::config::MotionConfig;

/// Read-only capability queries supplied by the host
pub trait CapabilityProbe {
    fn is_low_end_device(&self) -> bool;
    fn prefers_reduced_motion(&self) -> bool;
}

/// Fixed answers, for tests and headless runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    pub low_end_device: bool,
    pub reduced_motion: bool,
}

impl DeviceCapabilities {
    pub fn full() -> Self {
        Self::default()
    }

    pub fn reduced() -> Self {
        Self {
            low_end_device: false,
            reduced_motion: true,
        }
    }
}

impl CapabilityProbe for DeviceCapabilities {
    fn is_low_end_device(&self) -> bool {
        self.low_end_device
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}

/// A probe whose answers can be pinned by configuration
#[derive(Debug, Clone)]
pub struct ConfiguredProbe<P> {
    inner: P,
    low_end_device: Option<bool>,
    reduced_motion: Option<bool>,
}

impl<P: CapabilityProbe> ConfiguredProbe<P> {
    pub fn new(inner: P, motion: &MotionConfig) -> Self {
        Self {
            inner,
            low_end_device: motion.low_end_device,
            reduced_motion: motion.reduced_motion,
        }
    }
}

impl<P: CapabilityProbe> CapabilityProbe for ConfiguredProbe<P> {
    fn is_low_end_device(&self) -> bool {
        self.low_end_device
            .unwrap_or_else(|| self.inner.is_low_end_device())
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
            .unwrap_or_else(|| self.inner.prefers_reduced_motion())
    }
}

/// Animation intensity chosen at mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionProfile {
    Full,
    /// No idle loops, no bounce, no 3D tilt or depth rotation
    Lite,
}

impl MotionProfile {
    pub fn detect(probe: &dyn CapabilityProbe) -> Self {
        if probe.is_low_end_device() || probe.prefers_reduced_motion() {
            MotionProfile::Lite
        } else {
            MotionProfile::Full
        }
    }

    pub fn idle_loops(self) -> bool {
        self == MotionProfile::Full
    }

    pub fn bounce(self) -> bool {
        self == MotionProfile::Full
    }

    pub fn depth_effects(self) -> bool {
        self == MotionProfile::Full
    }
}
