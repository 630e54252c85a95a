use std::sync::Arc;
use std::time::Duration;

use devolution_core::{
    AppConfig, LandingPage, MotionProfile, PanelPhase, ToggleOutcome, Viewport,
};
use tracing::{debug, info};

use crate::event::OpenResult;
use crate::input::Action;
use crate::layout::{self, PageLayout};
use crate::scroll::ScrollAnimator;
use crate::theme::Theme;

const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

/// Work the app hands back to the run loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenUrl(String),
}

pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub page: LandingPage,
    pub layout: PageLayout,
    pub scroll: ScrollAnimator,
    /// Selected FAQ card
    pub selected: usize,
    /// Terminal width in columns
    pub width: u16,
    /// Rows available to the page (terminal height minus the status bar)
    pub viewport_rows: u16,
    pub status_message: Option<String>,
    pub should_quit: bool,
    profile: MotionProfile,
}

impl App {
    pub fn new(config: Arc<AppConfig>, profile: MotionProfile, theme: Theme) -> Self {
        let mut page = LandingPage::mount(&config, profile);
        let layout = layout::lay_out(&mut page, DEFAULT_WIDTH);
        let scroll = ScrollAnimator::new(config.ui.scroll.clone());
        Self {
            config,
            theme,
            page,
            layout,
            scroll,
            selected: 0,
            width: DEFAULT_WIDTH,
            viewport_rows: DEFAULT_HEIGHT - 1,
            status_message: None,
            should_quit: false,
            profile,
        }
    }

    pub fn profile(&self) -> MotionProfile {
        self.profile
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.viewport_rows = height.saturating_sub(1).max(1);
        self.relayout();
        let max = self.max_scroll();
        if self.scroll.current_scroll() > max {
            self.scroll.set_scroll(max);
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.layout.max_scroll(self.viewport_rows)
    }

    /// Document-space window the reveal triggers are polled against
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            layout::px(self.scroll.current_scroll()),
            layout::px(self.viewport_rows),
        )
    }

    /// Advance one frame at stage time `now`
    pub fn tick(&mut self, now: Duration) {
        let max = self.max_scroll();
        self.scroll.update(max);
        self.page.frame(self.viewport(), now);
        self.relayout();
    }

    /// Move the stage clock to `now` ahead of input handled between frames
    pub fn advance_clock(&mut self, now: Duration) {
        self.page.stage.set_now(now);
    }

    /// Whether the run loop should poll at the animation frame rate
    pub fn needs_fast_update(&self) -> bool {
        if self.page.is_animating() || self.scroll.needs_update() {
            return true;
        }
        self.page
            .faq
            .accordion()
            .items()
            .iter()
            .any(|item| item.phase() == PanelPhase::Measuring)
    }

    pub fn handle_action(&mut self, action: Action) -> Option<AppCommand> {
        let max = self.max_scroll();
        match action {
            Action::Quit => self.quit(),
            Action::MoveDown => self.select(self.selected.saturating_add(1)),
            Action::MoveUp => self.select(self.selected.saturating_sub(1)),
            Action::Toggle => self.toggle(self.selected),
            Action::ScrollLines(lines) => self.scroll.scroll_lines(lines, max),
            Action::ScrollHalfPageDown => {
                self.scroll.scroll_half_page(true, self.viewport_rows, max)
            }
            Action::ScrollHalfPageUp => {
                self.scroll.scroll_half_page(false, self.viewport_rows, max)
            }
            Action::JumpToTop => self.scroll.scroll_to(0, max),
            Action::JumpToBottom => self.scroll.scroll_to(max, max),
            Action::OpenTickets => {
                let url = self.config.event.tickets_url.clone();
                self.set_status(format!("Opening {}...", url));
                return Some(AppCommand::OpenUrl(url));
            }
            Action::Click { row, .. } => self.click(row),
            Action::None => {}
        }
        None
    }

    pub fn handle_open_result(&mut self, result: OpenResult) {
        match result {
            OpenResult::Opened { url } => self.set_status(format!("Opened {}", url)),
            OpenResult::Failed { url, error } => {
                self.set_status(format!("Failed to open {}: {}", url, error))
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Tear the page down before leaving
    pub fn quit(&mut self) {
        self.page.teardown();
        self.should_quit = true;
        info!("quitting");
    }

    fn select(&mut self, index: usize) {
        let last = self.page.faq.accordion().len().saturating_sub(1);
        self.selected = index.min(last);
        self.ensure_visible(self.selected);
    }

    fn toggle(&mut self, index: usize) {
        let outcome = self.page.toggle(index);
        debug!(index, ?outcome, "card toggled");
        if matches!(outcome, ToggleOutcome::Opened { .. }) {
            self.status_message = None;
        }
        self.ensure_visible(index);
    }

    fn click(&mut self, screen_row: u16) {
        if screen_row >= self.viewport_rows {
            return;
        }
        let doc_row = self.scroll.current_scroll().saturating_add(screen_row);
        if let Some(index) = self.layout.card_at(doc_row) {
            self.selected = index;
            self.toggle(index);
        }
    }

    /// Scroll just enough to show card `index`
    fn ensure_visible(&mut self, index: usize) {
        let Some(card) = self.layout.faq.cards.get(index).map(|c| c.card) else {
            return;
        };
        let max = self.max_scroll();
        let top = self.scroll.target_scroll();
        if card.top < top {
            self.scroll.scroll_to(card.top, max);
        } else if card.bottom() > top + self.viewport_rows {
            let target = card.bottom().saturating_sub(self.viewport_rows).min(card.top);
            self.scroll.scroll_to(target, max);
        }
    }

    fn relayout(&mut self) {
        self.layout = layout::lay_out(&mut self.page, self.width);
    }
}
