use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    ClearInput,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Submit,
    CopyLastReply,
    NewConversation,
    Save,
    InsertChar(char),
    DeleteChar,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

pub(crate) fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::ClearInput,

        (KeyCode::Up, _) => Action::ScrollUp,
        (KeyCode::Down, _) => Action::ScrollDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,

        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyLastReply,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::NewConversation,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::Save,

        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::InsertChar(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Action {
        key_to_action(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_quit_and_clear() {
        assert_eq!(key(KeyCode::Char('c'), KeyModifiers::CONTROL), Action::Quit);
        assert_eq!(key(KeyCode::Esc, KeyModifiers::NONE), Action::ClearInput);
    }

    #[test]
    fn test_scrolling() {
        assert_eq!(key(KeyCode::Up, KeyModifiers::NONE), Action::ScrollUp);
        assert_eq!(key(KeyCode::Down, KeyModifiers::NONE), Action::ScrollDown);
        assert_eq!(key(KeyCode::PageUp, KeyModifiers::NONE), Action::PageUp);
        assert_eq!(key(KeyCode::PageDown, KeyModifiers::NONE), Action::PageDown);
    }

    #[test]
    fn test_control_shortcuts() {
        assert_eq!(key(KeyCode::Enter, KeyModifiers::NONE), Action::Submit);
        assert_eq!(key(KeyCode::Char('y'), KeyModifiers::CONTROL), Action::CopyLastReply);
        assert_eq!(key(KeyCode::Char('n'), KeyModifiers::CONTROL), Action::NewConversation);
        assert_eq!(key(KeyCode::Char('s'), KeyModifiers::CONTROL), Action::Save);
    }

    #[test]
    fn test_typing() {
        assert_eq!(key(KeyCode::Char('a'), KeyModifiers::NONE), Action::InsertChar('a'));
        assert_eq!(key(KeyCode::Char('A'), KeyModifiers::SHIFT), Action::InsertChar('A'));
        assert_eq!(key(KeyCode::Char('/'), KeyModifiers::NONE), Action::InsertChar('/'));
        assert_eq!(key(KeyCode::Char('ñ'), KeyModifiers::NONE), Action::InsertChar('ñ'));
        assert_eq!(key(KeyCode::Backspace, KeyModifiers::NONE), Action::DeleteChar);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(key(KeyCode::F(1), KeyModifiers::NONE), Action::None);
        assert_eq!(key(KeyCode::Char('x'), KeyModifiers::ALT), Action::None);
    }
}
