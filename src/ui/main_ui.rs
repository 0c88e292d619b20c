// src/ui/main_ui.rs

use crate::state::{AppState, Tab};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind,
};

pub fn handle_event(state: &mut AppState, event: Event) {
    match event {
        Event::Key(k) => handle_key(state, k),
        Event::Mouse(m) => handle_mouse(state, m),
        _ => {}
    }
}

fn body_scroll_up(state: &mut AppState, step: usize) {
    let cur = state.ui.body_scroll.min(state.ui.body_max_scroll);
    state.ui.body_scroll = cur.saturating_sub(step);
}

fn body_scroll_down(state: &mut AppState, step: usize) {
    let cur = state.ui.body_scroll.min(state.ui.body_max_scroll);
    let next = cur.saturating_add(step);
    state.ui.body_scroll = if next >= state.ui.body_max_scroll {
        usize::MAX // follow tail again
    } else {
        next
    };
}

fn handle_key(state: &mut AppState, k: KeyEvent) {
    match k.code {
        // bare digits switch tabs; inside a command they are ordinary input
        KeyCode::Char(c @ '1'..='3') if state.ui.input.is_empty() => {
            state.ui.tab = match c {
                '1' => Tab::Setup,
                '2' => Tab::Scenarios,
                _ => Tab::Automation,
            };
            state.ui.body_scroll = usize::MAX;
        }

        KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            state.push_char(c);
        }

        KeyCode::Backspace => {
            state.backspace();
        }

        KeyCode::Enter => {
            if state.ui.execution_pending {
                return; // prevent double-trigger
            }

            if state.ui.input.trim().is_empty() {
                return;
            }

            state.ui.execution_pending = true;
        }

        KeyCode::Up if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            state.history_prev();
        }

        KeyCode::Down if !k.modifiers.contains(KeyModifiers::CONTROL) => {
            state.history_next();
        }

        KeyCode::Tab => {
            if let Some(ac) = &state.ui.autocomplete {
                if ac.starts_with(&state.ui.input) {
                    let suffix = ac[state.ui.input.len()..].to_string();
                    state.ui.input.push_str(&suffix);
                } else {
                    state.ui.input = ac.clone();
                }
            }
        }

        KeyCode::BackTab => {
            state.ui.tab = state.ui.tab.next();
            state.ui.body_scroll = usize::MAX;
        }

        KeyCode::PageUp => {
            body_scroll_up(state, 5);
        }

        KeyCode::PageDown => {
            body_scroll_down(state, 5);
        }

        KeyCode::Up if k.modifiers.contains(KeyModifiers::CONTROL) => {
            let cur = state.ui.log_scroll.min(state.ui.log_max_scroll);
            state.ui.log_scroll = cur.saturating_sub(1);
        }

        KeyCode::Down if k.modifiers.contains(KeyModifiers::CONTROL) => {
            let cur = state.ui.log_scroll.min(state.ui.log_max_scroll);
            let next = cur.saturating_add(1);
            state.ui.log_scroll = if next >= state.ui.log_max_scroll {
                usize::MAX
            } else {
                next
            };
        }

        KeyCode::Esc => {
            state.ui.should_exit = true;
        }

        _ => {}
    }
}

fn handle_mouse(state: &mut AppState, m: MouseEvent) {
    match m.kind {
        MouseEventKind::ScrollUp => {
            body_scroll_up(state, 3);
        }

        MouseEventKind::ScrollDown => {
            body_scroll_down(state, 3);
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn digits_switch_tabs_only_when_input_is_empty() {
        let mut state = AppState::new();

        handle_key(&mut state, key(KeyCode::Char('2')));
        assert_eq!(state.ui.tab, Tab::Scenarios);

        state.ui.input = "/name case ".into();
        handle_key(&mut state, key(KeyCode::Char('2')));
        assert_eq!(state.ui.tab, Tab::Scenarios);
        assert_eq!(state.ui.input, "/name case 2");
    }

    #[test]
    fn enter_marks_execution_pending_once() {
        let mut state = AppState::new();
        state.ui.input = "/files".into();

        handle_key(&mut state, key(KeyCode::Enter));
        assert!(state.ui.execution_pending);

        // a second enter while pending leaves the input untouched
        handle_key(&mut state, key(KeyCode::Enter));
        assert_eq!(state.ui.input, "/files");
    }

    #[test]
    fn enter_on_empty_input_does_nothing() {
        let mut state = AppState::new();
        handle_key(&mut state, key(KeyCode::Enter));
        assert!(!state.ui.execution_pending);
    }

    #[test]
    fn tab_completes_from_autocomplete() {
        let mut state = AppState::new();
        state.ui.input = "/gen".into();
        state.ui.autocomplete = Some("/generate".into());

        handle_key(&mut state, key(KeyCode::Tab));
        assert_eq!(state.ui.input, "/generate");
    }

    #[test]
    fn page_keys_scroll_within_the_rendered_range() {
        let mut state = AppState::new();
        state.ui.body_max_scroll = 40;
        state.ui.body_scroll = usize::MAX;

        handle_key(&mut state, key(KeyCode::PageUp));
        assert_eq!(state.ui.body_scroll, 35);

        handle_key(&mut state, key(KeyCode::PageDown));
        assert_eq!(state.ui.body_scroll, usize::MAX);
    }

    #[test]
    fn esc_requests_exit() {
        let mut state = AppState::new();
        handle_key(&mut state, key(KeyCode::Esc));
        assert!(state.ui.should_exit);
    }
}
