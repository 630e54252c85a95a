pub mod capability;
pub mod config;
pub mod content;
pub mod disclosure;
pub mod error;
pub mod motion;
pub mod reveal;
pub mod scene;
pub mod section;
pub mod stage;
pub mod viewport;

pub use capability::{CapabilityProbe, ConfiguredProbe, DeviceCapabilities, MotionProfile};
pub use config::{AppConfig, EventConfig, MotionConfig, ScrollConfig, UiConfig};
pub use content::{FaqEntry, SectionCopy};
pub use disclosure::{AccordionState, DisclosureController, PanelPhase, ToggleOutcome};
pub use error::{Error, Result};
pub use motion::{Easing, Rgb};
pub use section::{LandingPage, RevealKind};
pub use stage::Stage;
pub use viewport::Viewport;
