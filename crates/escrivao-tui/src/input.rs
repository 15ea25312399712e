use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::TextInput => map_key_text_input(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('u') => Action::EditUrl,
        KeyCode::Char('v') => Action::Verify,
        KeyCode::Char('p') => Action::ReportPendencias,
        KeyCode::Char('f') => Action::ReportFinal,
        KeyCode::Char('o') => Action::GenerateOitivas,
        KeyCode::Char(' ') | KeyCode::Enter => Action::SelectPerson,
        KeyCode::Char('t') => Action::CycleInterviewType,
        KeyCode::Char('n') => Action::EditQuestionCount,
        KeyCode::Char('c') => Action::ToggleCredentialPanel,
        KeyCode::Char('K') => Action::EditApiKey,
        KeyCode::Char('e') => Action::Export,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_text_input(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Enter => Action::InputConfirm,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Left => Action::CursorLeft,
        KeyCode::Right => Action::CursorRight,
        KeyCode::Home => Action::CursorHome,
        KeyCode::End => Action::CursorEnd,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn normal_mode_letters_are_commands() {
        assert_eq!(map_event(&press(KeyCode::Char('v')), &InputMode::Normal), Action::Verify);
        assert_eq!(
            map_event(&press(KeyCode::Char('p')), &InputMode::Normal),
            Action::ReportPendencias
        );
        assert_eq!(map_event(&press(KeyCode::Char('K')), &InputMode::Normal), Action::EditApiKey);
    }

    #[test]
    fn text_mode_letters_are_input() {
        assert_eq!(
            map_event(&press(KeyCode::Char('q')), &InputMode::TextInput),
            Action::InputChar('q')
        );
        assert_eq!(
            map_event(&press(KeyCode::Backspace), &InputMode::TextInput),
            Action::InputBackspace
        );
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(map_event(&ctrl_c, &InputMode::TextInput), Action::Quit);
        assert_eq!(map_event(&ctrl_c, &InputMode::Normal), Action::Quit);
    }
}
