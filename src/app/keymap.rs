//! Translation of terminal key presses into session events.
//!
//! The same physical key means different things per mode (`j` moves the
//! cursor while browsing but types a `j` into the add form), so mapping needs
//! a read-only look at the state. Keeping it out of the reducer lets the
//! reducer be driven by plain [`Event`]s in tests.

use crate::app::handler::Event;
use crate::app::modes::{InputMode, ViewMode};
use crate::app::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Maps a key press to an event for the current mode.
///
/// Returns `None` for keys with no meaning in the current mode and for key
/// release/repeat notifications.
///
/// # Example
///
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use modstash::app::{keymap::map_key, AppState, Event};
/// use modstash::ui::Theme;
///
/// let state = AppState::new(Theme::default());
/// let key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
/// assert_eq!(map_key(&state, key), Some(Event::Down));
/// ```
#[must_use]
pub fn map_key(state: &AppState, key: KeyEvent) -> Option<Event> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Event::HardQuit);
    }

    match state.input_mode {
        InputMode::Normal => map_normal(state.view_mode, key.code),
        InputMode::Adding => map_adding(key.code, ctrl),
        InputMode::Searching => map_searching(key.code),
        InputMode::Assigning => map_assigning(key.code),
        InputMode::CreatingGroup => map_text_prompt(key.code),
    }
}

fn map_normal(view: ViewMode, code: KeyCode) -> Option<Event> {
    let event = match code {
        KeyCode::Char('q') | KeyCode::Esc => Event::Back,
        KeyCode::Up | KeyCode::Char('k') => Event::Up,
        KeyCode::Down | KeyCode::Char('j') => Event::Down,
        KeyCode::Enter | KeyCode::Char(' ') => Event::Activate,
        KeyCode::Char('f') => Event::SortByFrequency,
        KeyCode::Char('l') => Event::SortByLastUsed,
        KeyCode::Char('c') => Event::StartCreatingGroup,
        KeyCode::Char('i') => Event::Install,
        KeyCode::Char('x') => Event::Delete,
        KeyCode::Char('g') if view == ViewMode::Packages => Event::ShowGroups,
        KeyCode::Char('+') if view != ViewMode::Groups => Event::StartAdding,
        KeyCode::Char('/') if view != ViewMode::Groups => Event::StartSearch,
        KeyCode::Char('a') if view != ViewMode::Groups => Event::StartAssigning,
        KeyCode::Char('d') if view == ViewMode::GroupPackages => Event::RemoveFromGroup,
        _ => return None,
    };
    Some(event)
}

fn map_adding(code: KeyCode, ctrl: bool) -> Option<Event> {
    let event = match code {
        KeyCode::Char('g') if ctrl => Event::ToggleInstallFlag,
        KeyCode::Char('f') if ctrl => Event::ToggleForceFlag,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Tab | KeyCode::Down => Event::NextField,
        KeyCode::BackTab | KeyCode::Up => Event::PrevField,
        _ => return map_text_prompt(code),
    };
    Some(event)
}

fn map_searching(code: KeyCode) -> Option<Event> {
    match code {
        KeyCode::Up => Some(Event::Up),
        KeyCode::Down => Some(Event::Down),
        _ => map_text_prompt(code),
    }
}

fn map_assigning(code: KeyCode) -> Option<Event> {
    let event = match code {
        KeyCode::Up | KeyCode::Char('k') => Event::Up,
        KeyCode::Down | KeyCode::Char('j') => Event::Down,
        KeyCode::Enter => Event::Submit,
        KeyCode::Esc | KeyCode::Char('q') => Event::Cancel,
        _ => return None,
    };
    Some(event)
}

fn map_text_prompt(code: KeyCode) -> Option<Event> {
    let event = match code {
        KeyCode::Char(c) => Event::Char(c),
        KeyCode::Backspace => Event::Backspace,
        KeyCode::Enter => Event::Submit,
        KeyCode::Esc => Event::Cancel,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::Theme;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn ctrl_c_is_hard_quit_in_every_mode() {
        let mut state = AppState::new(Theme::default());
        for mode in [
            InputMode::Normal,
            InputMode::Adding,
            InputMode::Searching,
            InputMode::Assigning,
            InputMode::CreatingGroup,
        ] {
            state.input_mode = mode;
            assert_eq!(map_key(&state, ctrl('c')), Some(Event::HardQuit));
        }
    }

    #[test]
    fn letters_are_text_inside_prompts() {
        let mut state = AppState::new(Theme::default());
        state.input_mode = InputMode::Searching;
        assert_eq!(map_key(&state, press(KeyCode::Char('q'))), Some(Event::Char('q')));
        state.input_mode = InputMode::Adding;
        assert_eq!(map_key(&state, press(KeyCode::Char('j'))), Some(Event::Char('j')));
    }

    #[test]
    fn add_form_toggles_need_ctrl() {
        let mut state = AppState::new(Theme::default());
        state.input_mode = InputMode::Adding;
        assert_eq!(map_key(&state, ctrl('g')), Some(Event::ToggleInstallFlag));
        assert_eq!(map_key(&state, ctrl('f')), Some(Event::ToggleForceFlag));
        assert_eq!(map_key(&state, press(KeyCode::Tab)), Some(Event::NextField));
    }

    #[test]
    fn view_specific_keys() {
        let mut state = AppState::new(Theme::default());
        assert_eq!(map_key(&state, press(KeyCode::Char('g'))), Some(Event::ShowGroups));
        assert_eq!(map_key(&state, press(KeyCode::Char('d'))), None);

        state.view_mode = ViewMode::GroupPackages;
        assert_eq!(map_key(&state, press(KeyCode::Char('g'))), None);
        assert_eq!(map_key(&state, press(KeyCode::Char('d'))), Some(Event::RemoveFromGroup));

        state.view_mode = ViewMode::Groups;
        assert_eq!(map_key(&state, press(KeyCode::Char('+'))), None);
        assert_eq!(map_key(&state, press(KeyCode::Enter)), Some(Event::Activate));
    }

    #[test]
    fn releases_are_ignored() {
        let state = AppState::new(Theme::default());
        let mut key = press(KeyCode::Char('j'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(&state, key), None);
    }
}
