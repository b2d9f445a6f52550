use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    TogglePause,
    /// Change velocity by this many cells per second
    Accelerate(f64),
    /// Change card width by this many cells
    Widen(i16),
    Reset,
    None,
}

/// Velocity step for `+` / `-`
pub const VELOCITY_STEP: f64 = 2.0;

/// Card width step for `[` / `]`
pub const WIDTH_STEP: i16 = 2;

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Pause / resume
        (KeyCode::Char(' '), _) => Action::TogglePause,
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::TogglePause,

        // Speed ('+' arrives with SHIFT on most layouts)
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => {
            Action::Accelerate(VELOCITY_STEP)
        }
        (KeyCode::Char('-'), _) => Action::Accelerate(-VELOCITY_STEP),

        (KeyCode::Char(']'), KeyModifiers::NONE) => Action::Widen(WIDTH_STEP),
        (KeyCode::Char('['), KeyModifiers::NONE) => Action::Widen(-WIDTH_STEP),

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Reset,

        _ => Action::None,
    }
}
