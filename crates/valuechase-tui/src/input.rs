use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    RaiseTarget,
    LowerTarget,
    FrictionUp,
    FrictionDown,
    ToleranceUp,
    ToleranceDown,
    /// Jump straight to the target without interpolating
    Jump,
    None,
}

/// Map a key press to an action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Right, _) | (KeyCode::Up, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => {
            Action::RaiseTarget
        }
        (KeyCode::Left, _) | (KeyCode::Down, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
            Action::LowerTarget
        }

        (KeyCode::Char('F'), _) => Action::FrictionUp,
        (KeyCode::Char('f'), KeyModifiers::NONE) => Action::FrictionDown,
        (KeyCode::Char('T'), _) => Action::ToleranceUp,
        (KeyCode::Char('t'), KeyModifiers::NONE) => Action::ToleranceDown,

        (KeyCode::Char(' '), _) | (KeyCode::Enter, _) => Action::Jump,

        _ => Action::None,
    }
}
