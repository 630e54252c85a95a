use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::{default_faq, FaqEntry};
use crate::motion::{Easing, Rgb};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub event: EventConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Timings and offsets of every choreographed transition
///
/// Offsets are in layout pixels, angles in degrees, thresholds are fractions
/// of the viewport height measured from its top edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    // Scroll triggers
    #[serde(default = "default_container_threshold")]
    pub container_threshold: f64,
    #[serde(default = "default_heading_threshold")]
    pub heading_threshold: f64,
    #[serde(default = "default_item_threshold")]
    pub item_threshold: f64,

    // Container entrance
    #[serde(default = "default_container_duration")]
    pub container_duration_ms: u64,
    #[serde(default = "default_rise_offset")]
    pub rise_offset: f64,
    /// Initial tilt around the horizontal axis
    #[serde(default = "default_container_tilt")]
    pub container_tilt: f64,
    #[serde(default = "default_container_scale")]
    pub container_scale: f64,

    // Heading wipe
    #[serde(default = "default_heading_duration")]
    pub heading_duration_ms: u64,

    // Item entrance
    #[serde(default = "default_item_duration")]
    pub item_duration_ms: u64,
    /// Delay added per item index
    #[serde(default = "default_stagger")]
    pub stagger_ms: u64,
    #[serde(default = "default_slide_offset")]
    pub slide_offset: f64,
    #[serde(default = "default_item_depth_rotation")]
    pub item_depth_rotation: f64,

    // Decorations
    #[serde(default = "default_decoration_duration")]
    pub decoration_duration_ms: u64,
    #[serde(default = "default_decoration_stagger")]
    pub decoration_stagger_ms: u64,
    #[serde(default = "default_decoration_overshoot")]
    pub decoration_overshoot: f64,
    #[serde(default = "default_float_amplitude")]
    pub float_amplitude: f64,
    /// One leg of the idle float (up or down)
    #[serde(default = "default_float_period")]
    pub float_period_ms: u64,

    // Accordion
    #[serde(default = "default_open_duration")]
    pub open_duration_ms: u64,
    #[serde(default = "default_close_duration")]
    pub close_duration_ms: u64,
    /// Close duration for the item displaced by opening another one
    #[serde(default = "default_close_previous_duration")]
    pub close_previous_duration_ms: u64,
    #[serde(default = "default_icon_open_duration")]
    pub icon_open_duration_ms: u64,
    #[serde(default = "default_icon_close_duration")]
    pub icon_close_duration_ms: u64,
    #[serde(default = "default_icon_open_degrees")]
    pub icon_open_degrees: f64,
    #[serde(default = "default_icon_overshoot")]
    pub icon_overshoot: f64,
    #[serde(default = "default_label_duration")]
    pub label_duration_ms: u64,
    #[serde(default = "default_emphasis_color")]
    pub emphasis_color: Rgb,
    #[serde(default = "default_label_color")]
    pub label_color: Rgb,
    #[serde(default = "default_bounce_scale")]
    pub bounce_scale: f64,
    #[serde(default = "default_bounce_duration")]
    pub bounce_duration_ms: u64,

    // Capability overrides (unset = detect)
    #[serde(default)]
    pub reduced_motion: Option<bool>,
    #[serde(default)]
    pub low_end_device: Option<bool>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            container_threshold: default_container_threshold(),
            heading_threshold: default_heading_threshold(),
            item_threshold: default_item_threshold(),
            container_duration_ms: default_container_duration(),
            rise_offset: default_rise_offset(),
            container_tilt: default_container_tilt(),
            container_scale: default_container_scale(),
            heading_duration_ms: default_heading_duration(),
            item_duration_ms: default_item_duration(),
            stagger_ms: default_stagger(),
            slide_offset: default_slide_offset(),
            item_depth_rotation: default_item_depth_rotation(),
            decoration_duration_ms: default_decoration_duration(),
            decoration_stagger_ms: default_decoration_stagger(),
            decoration_overshoot: default_decoration_overshoot(),
            float_amplitude: default_float_amplitude(),
            float_period_ms: default_float_period(),
            open_duration_ms: default_open_duration(),
            close_duration_ms: default_close_duration(),
            close_previous_duration_ms: default_close_previous_duration(),
            icon_open_duration_ms: default_icon_open_duration(),
            icon_close_duration_ms: default_icon_close_duration(),
            icon_open_degrees: default_icon_open_degrees(),
            icon_overshoot: default_icon_overshoot(),
            label_duration_ms: default_label_duration(),
            emphasis_color: default_emphasis_color(),
            label_color: default_label_color(),
            bounce_scale: default_bounce_scale(),
            bounce_duration_ms: default_bounce_duration(),
            reduced_motion: None,
            low_end_device: None,
        }
    }
}

impl MotionConfig {
    /// Delay before item `index` starts its entrance
    pub fn stagger_delay(&self, index: usize) -> Duration {
        Duration::from_millis(self.stagger_ms.saturating_mul(index as u64))
    }

    fn validate(&self) -> crate::Result<()> {
        let thresholds = [
            ("container_threshold", self.container_threshold),
            ("heading_threshold", self.heading_threshold),
            ("item_threshold", self.item_threshold),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!(
                    "motion.{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }
        if self.float_period_ms == 0 {
            return Err(crate::Error::Config(
                "motion.float_period_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate while anything is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Accent color used for borders and highlights
    #[serde(default = "default_accent")]
    pub accent: Rgb,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            accent: default_accent(),
            scroll: ScrollConfig::default(),
        }
    }
}

/// Smooth page scrolling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default = "default_scroll_easing")]
    pub easing: Easing,
    /// Rows moved per line scroll
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: default_scroll_easing(),
            scroll_lines: default_scroll_lines(),
        }
    }
}

/// Page copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    #[serde(default = "default_event_name")]
    pub name: String,
    #[serde(default = "default_hashtag")]
    pub hashtag: String,
    #[serde(default = "default_tickets_url")]
    pub tickets_url: String,
    #[serde(default = "default_faq")]
    pub faq: Vec<FaqEntry>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: default_event_name(),
            hashtag: default_hashtag(),
            tickets_url: default_tickets_url(),
            faq: default_faq(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("devolution")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_container_threshold() -> f64 {
    0.85
}

fn default_heading_threshold() -> f64 {
    0.80
}

fn default_item_threshold() -> f64 {
    0.90
}

fn default_container_duration() -> u64 {
    1000
}

fn default_rise_offset() -> f64 {
    80.0
}

fn default_container_tilt() -> f64 {
    10.0
}

fn default_container_scale() -> f64 {
    0.95
}

fn default_heading_duration() -> u64 {
    800
}

fn default_item_duration() -> u64 {
    700
}

fn default_stagger() -> u64 {
    150
}

fn default_slide_offset() -> f64 {
    50.0
}

fn default_item_depth_rotation() -> f64 {
    5.0
}

fn default_decoration_duration() -> u64 {
    400
}

fn default_decoration_stagger() -> u64 {
    100
}

fn default_decoration_overshoot() -> f64 {
    2.0
}

fn default_float_amplitude() -> f64 {
    6.0
}

fn default_float_period() -> u64 {
    1600
}

fn default_open_duration() -> u64 {
    500
}

fn default_close_duration() -> u64 {
    400
}

fn default_close_previous_duration() -> u64 {
    300
}

fn default_icon_open_duration() -> u64 {
    400
}

fn default_icon_close_duration() -> u64 {
    300
}

fn default_icon_open_degrees() -> f64 {
    180.0
}

fn default_icon_overshoot() -> f64 {
    1.5
}

fn default_label_duration() -> u64 {
    200
}

fn default_emphasis_color() -> Rgb {
    Rgb::new(0x8b, 0x5c, 0xf6)
}

fn default_label_color() -> Rgb {
    Rgb::BLACK
}

fn default_bounce_scale() -> f64 {
    1.02
}

fn default_bounce_duration() -> u64 {
    150
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_accent() -> Rgb {
    Rgb::new(0xf4, 0x72, 0xb6)
}

fn default_scroll_duration() -> u64 {
    150
}

fn default_scroll_easing() -> Easing {
    Easing::Power2Out
}

fn default_scroll_lines() -> u16 {
    1
}

fn default_event_name() -> String {
    "DEVOLUTION 2026".to_string()
}

fn default_hashtag() -> String {
    "#dev_o_lution".to_string()
}

fn default_tickets_url() -> String {
    "https://unstop.com".to_string()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };
        Ok(config)
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.motion.validate()?;
        if self.event.faq.is_empty() {
            return Err(crate::Error::Config(
                "event.faq must contain at least one entry".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/devolution/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("devolution")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Log file used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("devolution.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.motion.stagger_ms, 150);
        assert_eq!(config.motion.container_threshold, 0.85);
        assert_eq!(config.motion.emphasis_color, Rgb::new(0x8b, 0x5c, 0xf6));
        assert_eq!(config.event.faq.len(), 4);
        assert!(config.ui.scroll.smooth_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r##"
            [motion]
            stagger_ms = 200
            emphasis_color = "#ff0000"
            reduced_motion = true

            [[event.faq]]
            question = "Where?"
            answer = "On campus."
            "##,
        )
        .unwrap();
        assert_eq!(config.motion.stagger_ms, 200);
        assert_eq!(config.motion.emphasis_color, Rgb::new(0xff, 0, 0));
        assert_eq!(config.motion.reduced_motion, Some(true));
        assert_eq!(config.motion.close_duration_ms, 400);
        assert_eq!(config.event.faq.len(), 1);
        assert_eq!(config.event.hashtag, "#dev_o_lution");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = AppConfig::from_toml("[motion]\nitem_threshold = 1.5\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_invalid_color_rejected() {
        assert!(AppConfig::from_toml("[motion]\nlabel_color = \"nope\"\n").is_err());
    }

    #[test]
    fn test_stagger_delay() {
        let motion = MotionConfig::default();
        assert_eq!(motion.stagger_delay(0), Duration::ZERO);
        assert_eq!(motion.stagger_delay(3), Duration::from_millis(450));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("devolution-config-does-not-exist.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig::default();
        let text = config.to_toml().unwrap();
        let back = AppConfig::from_toml(&text).unwrap();
        assert_eq!(back.motion.emphasis_color, config.motion.emphasis_color);
        assert_eq!(back.event.faq, config.event.faq);
    }

    #[test]
    fn test_bad_color_names_the_value() {
        let err = AppConfig::from_toml("[motion]\nemphasis_color = \"purple\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Toml(_)));
        assert!(err.to_string().contains("Invalid color: purple"));
    }
}
