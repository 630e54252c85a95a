use devolution_core::content::question_badge;
use devolution_core::{AccordionState, MotionProfile};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::color;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let base = Style::default()
            .fg(color(theme.status_fg))
            .bg(color(theme.status_bg));

        let status_text = match &app.status_message {
            Some(msg) => format!(" {}", msg),
            None => {
                let accordion = app.page.faq.accordion();
                let state = match accordion.state() {
                    AccordionState::Closed => "all closed".to_string(),
                    AccordionState::OpenAt(i) => format!("open: {}", question_badge(i)),
                };
                let motion = match app.profile() {
                    MotionProfile::Full => "full",
                    MotionProfile::Lite => "lite",
                };
                format!(
                    " {} | FAQ {}/{} | {} | motion: {}",
                    app.config.event.name,
                    app.selected + 1,
                    accordion.len(),
                    state,
                    motion
                )
            }
        };

        let help_hint = " q:quit j/k:move enter:toggle o:tickets ";
        let padding_len = usize::from(area.width)
            .saturating_sub(status_text.width() + help_hint.width());

        let line = Line::from(vec![
            Span::styled(status_text, base),
            Span::styled(" ".repeat(padding_len), base),
            Span::styled(help_hint, base.fg(color(theme.accent))),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}
