use devolution_core::{Rgb, UiConfig};
use ratatui::style::Color;

/// Page palette
///
/// Colors are kept as [`Rgb`] so faded elements can be blended toward the
/// page background before they reach the terminal.
#[derive(Debug, Clone)]
pub struct Theme {
    pub page_bg: Rgb,
    pub ink: Rgb,
    pub muted: Rgb,

    // Card fills
    pub faq_card: Rgb,
    pub faq_heading: Rgb,
    pub join_card: Rgb,
    pub partner_card: Rgb,
    pub partner_heading: Rgb,

    // Window controls
    pub control_close: Rgb,
    pub control_minimize: Rgb,
    pub control_expand: Rgb,

    pub selection: Rgb,
    pub accent: Rgb,
    pub status_bg: Rgb,
    pub status_fg: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            page_bg: Rgb::new(0xfe, 0xf9, 0xc3),
            ink: Rgb::BLACK,
            muted: Rgb::new(0x52, 0x52, 0x52),
            faq_card: Rgb::new(0xfa, 0xcc, 0x15),
            faq_heading: Rgb::new(0xf4, 0x72, 0xb6),
            join_card: Rgb::new(0xfa, 0xcc, 0x15),
            partner_card: Rgb::new(0xa3, 0xe6, 0x35),
            partner_heading: Rgb::new(0xfb, 0x92, 0x3c),
            control_close: Rgb::new(0xef, 0x44, 0x44),
            control_minimize: Rgb::new(0xfa, 0xcc, 0x15),
            control_expand: Rgb::new(0x22, 0xc5, 0x5e),
            selection: Rgb::new(0xec, 0x48, 0x99),
            accent: Rgb::new(0xf4, 0x72, 0xb6),
            status_bg: Rgb::BLACK,
            status_fg: Rgb::WHITE,
        }
    }
}

impl Theme {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            accent: ui.accent,
            ..Self::default()
        }
    }

    /// Colors of the three window-control dots, left to right
    pub fn controls(&self) -> [Rgb; 3] {
        [self.control_close, self.control_minimize, self.control_expand]
    }
}

pub fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// `fg` blended toward `bg` as opacity drops
pub fn faded(fg: Rgb, bg: Rgb, opacity: f64) -> Color {
    color(bg.mix(fg, opacity.clamp(0.0, 1.0)))
}
