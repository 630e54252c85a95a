//! Capability answers derived from the process environment

use devolution_core::CapabilityProbe;

/// Reads the environment once at construction
///
/// Reduced motion is requested with `DEVOLUTION_REDUCED_MOTION` or the
/// conventional `NO_MOTION`; terminals without cursor addressing worth
/// animating (`dumb`, the Linux console, plain vt100) count as low end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvProbe {
    low_end: bool,
    reduced_motion: bool,
}

impl EnvProbe {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let reduced_motion = ["DEVOLUTION_REDUCED_MOTION", "NO_MOTION"]
            .iter()
            .any(|key| lookup(key).is_some_and(|v| is_truthy(&v)));
        let low_end = lookup("TERM")
            .map(|term| matches!(term.as_str(), "dumb" | "linux" | "vt100" | "vt102"))
            .unwrap_or(false);
        Self {
            low_end,
            reduced_motion,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

impl CapabilityProbe for EnvProbe {
    fn is_low_end_device(&self) -> bool {
        self.low_end
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }
}
