use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Rows moved per mouse wheel notch
const WHEEL_LINES: i32 = 3;

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    Toggle,
    ScrollLines(i32),
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    JumpToTop,
    JumpToBottom,
    OpenTickets,
    /// Left click at a screen cell
    Click { column: u16, row: u16 },
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Card selection
        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Enter, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => Action::Toggle,

        // Scrolling
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollHalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollHalfPageUp,
        (KeyCode::Char('e'), KeyModifiers::CONTROL) => Action::ScrollLines(1),
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::ScrollLines(-1),
        (KeyCode::PageDown, _) => Action::ScrollHalfPageDown,
        (KeyCode::PageUp, _) => Action::ScrollHalfPageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => Action::JumpToBottom,

        (KeyCode::Char('o'), KeyModifiers::NONE) => Action::OpenTickets,

        _ => Action::None,
    }
}

/// Handle wheel and button events
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollLines(WHEEL_LINES),
        MouseEventKind::ScrollUp => Action::ScrollLines(-WHEEL_LINES),
        MouseEventKind::Down(MouseButton::Left) => Action::Click {
            column: mouse.column,
            row: mouse.row,
        },
        _ => Action::None,
    }
}
