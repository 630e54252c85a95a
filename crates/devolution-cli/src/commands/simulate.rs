//! Headless replay of a toggle sequence against the landing page.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use devolution_core::scene::HeightValue;
use devolution_core::{AppConfig, LandingPage, MotionProfile, PanelPhase, ToggleOutcome, Viewport};
use devolution_tui::layout::{self, lay_out};

const PAGE_WIDTH: u16 = 80;
const VIEWPORT_ROWS: u16 = 40;
const FRAME_MS: u64 = 16;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PanelReport {
    pub index: usize,
    pub phase: &'static str,
    /// Content height in px, `None` while sized to content
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StepReport {
    pub toggle: usize,
    pub outcome: String,
    pub open: Option<usize>,
    pub panels: Vec<PanelReport>,
}

fn phase_name(phase: PanelPhase) -> &'static str {
    match phase {
        PanelPhase::Closed => "closed",
        PanelPhase::Measuring => "measuring",
        PanelPhase::Animating { .. } => "opening",
        PanelPhase::Open => "open",
        PanelPhase::Closing { .. } => "closing",
    }
}

fn outcome_name(outcome: ToggleOutcome) -> String {
    match outcome {
        ToggleOutcome::Opened {
            index,
            displaced: Some(prev),
        } => format!("opened {} (closed {})", index, prev),
        ToggleOutcome::Opened { index, .. } => format!("opened {}", index),
        ToggleOutcome::Closed(index) => format!("closed {}", index),
        ToggleOutcome::Ignored => "ignored".to_string(),
    }
}

struct Replay {
    page: LandingPage,
    now: u64,
}

impl Replay {
    fn advance(&mut self, ms: u64) {
        let viewport = Viewport::new(0.0, layout::px(VIEWPORT_ROWS));
        let until = self.now + ms;
        while self.now <= until {
            lay_out(&mut self.page, PAGE_WIDTH);
            self.page.frame(viewport, Duration::from_millis(self.now));
            self.now += FRAME_MS;
        }
    }

    fn panels(&self) -> Vec<PanelReport> {
        let scene = &self.page.stage.scene;
        self.page
            .faq
            .accordion()
            .items()
            .iter()
            .enumerate()
            .map(|(index, item)| PanelReport {
                index,
                phase: phase_name(item.phase()),
                height: match scene.visual(item.elements.content).map(|v| v.height) {
                    Some(HeightValue::Px(px)) => Some(px),
                    _ => None,
                },
            })
            .collect()
    }
}

/// Mount the page, let the entrance play, then apply each toggle and let
/// the page settle for `settle_ms` after it.
pub fn simulate(
    config: &AppConfig,
    toggles: &[usize],
    settle_ms: u64,
    profile: MotionProfile,
) -> Vec<StepReport> {
    let mut replay = Replay {
        page: LandingPage::mount(config, profile),
        now: 0,
    };
    replay.advance(settle_ms);

    let mut reports = Vec::with_capacity(toggles.len());
    for &index in toggles {
        let outcome = replay.page.toggle(index);
        replay.advance(settle_ms);
        reports.push(StepReport {
            toggle: index,
            outcome: outcome_name(outcome),
            open: replay.page.faq.accordion().open_index(),
            panels: replay.panels(),
        });
    }
    replay.page.teardown();
    reports
}

pub fn run(config: &AppConfig, toggles: &[usize], settle_ms: u64, lite: bool, json: bool) -> Result<()> {
    let profile = if lite {
        MotionProfile::Lite
    } else {
        MotionProfile::Full
    };
    info!(?toggles, settle_ms, ?profile, "simulating");
    let reports = simulate(config, toggles, settle_ms, profile);

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        let open = report
            .open
            .map(|i| format!("open: {:02}", i + 1))
            .unwrap_or_else(|| "all closed".to_string());
        println!("toggle {:<3} {:<24} {}", report.toggle, report.outcome, open);
        for panel in &report.panels {
            let height = panel
                .height
                .map(|h| format!("{:.0}px", h))
                .unwrap_or_else(|| "auto".to_string());
            println!("    {:02} {:<10} {}", panel.index + 1, panel.phase, height);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_close_sequence_ends_closed() {
        let config = AppConfig::default();
        let reports = simulate(&config, &[0, 2, 2], 1500, MotionProfile::Full);
        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].open, Some(0));
        assert_eq!(reports[1].outcome, "opened 2 (closed 0)");
        assert_eq!(reports[2].outcome, "closed 2");
        assert_eq!(reports[2].open, None);
        for panel in &reports[2].panels {
            assert_eq!(panel.phase, "closed");
            assert_eq!(panel.height, Some(0.0));
        }
    }

    #[test]
    fn test_open_panel_reaches_measured_height() {
        let config = AppConfig::default();
        let reports = simulate(&config, &[1], 1500, MotionProfile::Lite);
        let panel = &reports[0].panels[1];
        assert_eq!(panel.phase, "open");
        assert!(panel.height.unwrap() >= layout::ROW_PX);
        assert_eq!(reports[0].panels[0].height, Some(0.0));
    }

    #[test]
    fn test_out_of_range_toggle_is_ignored() {
        let config = AppConfig::default();
        let reports = simulate(&config, &[9], 100, MotionProfile::Full);
        assert_eq!(reports[0].outcome, "ignored");
        assert_eq!(reports[0].open, None);
    }
}
