mod page;
mod paint;
mod status_bar;

pub use page::PageWidget;
pub use status_bar::StatusBarWidget;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

/// Draw the whole screen: the page above a one-line status bar
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    PageWidget::render(frame.buffer_mut(), chunks[0], app);
    StatusBarWidget::render(frame, chunks[1], app);
}
